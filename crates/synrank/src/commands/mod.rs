//! Command implementations.

use std::time::Duration;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use synrank_core::{Config, NgramClient, Ranker, Ranking, WordNet};

pub mod frequency;
pub mod info;
pub mod more;
pub mod most;
pub mod synonyms;

/// The ranker every ranking command runs against.
pub type CliRanker = Ranker<WordNet, NgramClient>;

/// Overrides for where the WordNet database lives.
#[derive(Args, Debug, Default, Clone)]
pub struct WordNetArgs {
    /// WordNet database directory (overrides config)
    #[arg(long, value_name = "DIR")]
    pub wordnet_dir: Option<Utf8PathBuf>,
}

impl WordNetArgs {
    /// Open the WordNet database, failing if it cannot be read.
    pub fn open(&self, config: &Config) -> anyhow::Result<WordNet> {
        let dir = self
            .wordnet_dir
            .clone()
            .or_else(|| config.resolved_wordnet_dir())
            .context("no WordNet directory configured; pass --wordnet-dir or set wordnet_dir")?;
        let wordnet = WordNet::new(dir);
        wordnet
            .ensure_loaded()
            .with_context(|| format!("failed to load WordNet from {}", wordnet.dir()))?;
        Ok(wordnet)
    }
}

/// Overrides for the n-gram frequency service.
#[derive(Args, Debug, Default, Clone)]
pub struct NgramArgs {
    /// API key sent with n-gram requests (overrides config)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// N-gram corpus, e.g. en, en-US, fr, ru (overrides config)
    #[arg(long, value_name = "CORPUS")]
    pub corpus: Option<String>,
}

impl NgramArgs {
    /// Build an n-gram client from the config with these overrides applied.
    pub fn client(&self, config: &Config) -> anyhow::Result<NgramClient> {
        let mut ngram = config.ngram.clone();
        if let Some(ref corpus) = self.corpus {
            ngram.corpus.clone_from(corpus);
        }
        let api_key = self.api_key.as_deref().unwrap_or(&config.api_key);
        NgramClient::from_config(&ngram, api_key).context("failed to build the n-gram client")
    }
}

/// Build a ranker from config plus command-line overrides.
pub fn build_ranker(
    config: &Config,
    wordnet: &WordNetArgs,
    ngram: &NgramArgs,
) -> anyhow::Result<CliRanker> {
    let lexicon = wordnet.open(config)?;
    let client = ngram.client(config)?;
    Ok(Ranker::new(lexicon, client).with_parallel_fetch(config.parallel_fetch))
}

/// A spinner on stderr while frequencies are fetched.
///
/// Hidden when `enabled` is false. indicatif also hides it when stderr is
/// not a terminal.
pub fn spinner(enabled: bool, message: String) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// JSON shape shared by `most` and `more`.
#[derive(Serialize)]
pub(crate) struct RankingReport<'a> {
    pub word: &'a str,
    #[serde(flatten)]
    pub ranking: &'a Ranking,
}

/// Print a ranking as text.
pub(crate) fn print_ranking(heading: &str, ranking: &Ranking, places: usize) {
    println!("{}", heading.bold());
    if ranking.complete.is_empty() {
        println!("  {}", "no synonyms found".yellow());
        return;
    }
    if ranking.ranked.is_empty() {
        println!("  {}", "no frequency data".yellow());
    } else {
        let width = ranking
            .ranked
            .iter()
            .map(|r| r.word.chars().count())
            .max()
            .unwrap_or(0);
        for entry in &ranking.ranked {
            println!(
                "  {:<width$}  {}",
                entry.word,
                format!("{:.places$}", entry.ratio).green()
            );
        }
    }
    println!();
    println!(
        "{}: {}",
        "All synonyms".dimmed(),
        ranking.complete.join(", ")
    );
}
