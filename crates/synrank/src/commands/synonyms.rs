//! Synonyms command implementation

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use synrank_core::lexicon::{self, Strategy};
use synrank_core::Config;
use tracing::{debug, instrument};

use super::WordNetArgs;

/// Arguments for the `synonyms` subcommand.
#[derive(Args, Debug)]
pub struct SynonymsArgs {
    /// Word to look up
    pub word: String,

    /// How much of WordNet to draw candidates from
    #[arg(long, value_enum, default_value_t)]
    pub strategy: Strategy,

    #[command(flatten)]
    pub wordnet: WordNetArgs,
}

#[derive(Serialize)]
struct SynonymsReport<'a> {
    word: &'a str,
    strategy: &'static str,
    synonyms: Vec<String>,
}

/// Print the synonym candidates of a word. No frequencies are fetched.
#[instrument(name = "cmd_synonyms", skip_all, fields(word = %args.word))]
pub fn cmd_synonyms(args: SynonymsArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let wordnet = args.wordnet.open(config)?;
    let found = lexicon::synonyms(&wordnet, &args.word, args.strategy);
    debug!(count = found.len(), json_output = global_json, "executing synonyms command");

    let report = SynonymsReport {
        word: &args.word,
        strategy: args.strategy.as_str(),
        synonyms: found.into_iter().collect(),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.synonyms.is_empty() {
        println!("{}", "no synonyms found".yellow());
    } else {
        for synonym in &report.synonyms {
            println!("{synonym}");
        }
    }

    Ok(())
}
