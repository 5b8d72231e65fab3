//! Core library for synrank.
//!
//! Finds the single-word synonyms of a word and ranks them by how often they
//! are used, according to the Google Books Ngram corpus.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//! - [`lexicon`] - Synonym candidates from WordNet
//! - [`frequency`] - Usage frequencies from the n-gram service
//! - [`rank`] - The two ranking views built on top of both
//!
//! # Quick Start
//!
//! ```no_run
//! use synrank_core::{ConfigLoader, NgramClient, Ranker, WordNet};
//!
//! let (config, _sources) = ConfigLoader::new()
//!     .with_user_config(true)
//!     .load()
//!     .expect("Failed to load configuration");
//!
//! let wordnet = WordNet::new(config.resolved_wordnet_dir().expect("no data directory"));
//! let client = NgramClient::from_config(&config.ngram, &config.api_key).expect("HTTP client");
//! let ranker = Ranker::new(wordnet, client);
//!
//! let ranking = ranker.most_frequent("tryout", Some(0.25));
//! println!("{:?} out of {:?}", ranking.ranked, ranking.complete);
//! ```
#![deny(unsafe_code)]

pub mod config;

pub mod error;

pub mod frequency;

pub mod lexicon;

pub mod rank;

pub use config::{Config, ConfigLoader, LogLevel, NgramConfig};

pub use error::{ClientError, ConfigError, ConfigResult, FetchError, LexiconError, LexiconResult};

pub use frequency::{FrequencySource, NgramClient};

pub use lexicon::{MemorySynsets, Strategy, SynsetSource, WordNet};

pub use rank::{DominationRate, RankedSynonym, Ranker, Ranking};
