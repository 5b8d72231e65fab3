//! Frequency command implementation

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use synrank_core::Config;
use synrank_core::lexicon;
use tracing::{debug, instrument, warn};

use super::{NgramArgs, spinner};

/// Arguments for the `frequency` subcommand.
#[derive(Args, Debug)]
pub struct FrequencyArgs {
    /// Word to measure
    pub word: String,

    /// Fail instead of reporting 0 when the lookup fails
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub ngram: NgramArgs,
}

#[derive(Serialize)]
struct FrequencyReport<'a> {
    word: &'a str,
    corpus: &'a str,
    frequency: f64,
}

/// Print the mean usage frequency of one word.
#[instrument(name = "cmd_frequency", skip_all, fields(word = %args.word))]
pub fn cmd_frequency(
    args: FrequencyArgs,
    global_json: bool,
    progress: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let client = args.ngram.client(config)?;
    let word = lexicon::normalize(&args.word);
    let corpus = args.ngram.corpus.as_deref().unwrap_or(&config.ngram.corpus);
    debug!(corpus, strict = args.strict, "executing frequency command");

    let bar = spinner(progress, format!("fetching frequency for '{word}'"));
    let result = client.try_frequency(&word);
    bar.finish_and_clear();

    let frequency = match result {
        Ok(frequency) => frequency,
        Err(err) if args.strict => {
            return Err(anyhow::Error::new(err).context(format!("lookup of '{word}' failed")));
        }
        Err(err) => {
            warn!(error = %err, "frequency lookup failed, reporting 0");
            0.0
        }
    };

    let report = FrequencyReport {
        word: &word,
        corpus,
        frequency,
    };
    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} ({}): {}",
            report.word.bold(),
            report.corpus.dimmed(),
            format!("{:e}", report.frequency).green()
        );
    }

    Ok(())
}
