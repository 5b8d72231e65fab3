//! Most command implementation

use clap::Args;
use synrank_core::Config;
use synrank_core::rank::MOST_FREQUENT_PLACES;
use tracing::{debug, instrument};

use super::{NgramArgs, RankingReport, WordNetArgs, build_ranker, print_ranking, spinner};

/// Arguments for the `most` subcommand.
#[derive(Args, Debug)]
pub struct MostArgs {
    /// Word to find synonyms for
    pub word: String,

    /// Keep only synonyms at least this share of the top one, in (0, 1]
    #[arg(short = 'r', long, value_name = "RATE")]
    pub domination_rate: Option<f64>,

    #[command(flatten)]
    pub wordnet: WordNetArgs,

    #[command(flatten)]
    pub ngram: NgramArgs,
}

/// Rank the synonyms of a word against the most frequent one.
#[instrument(name = "cmd_most", skip_all, fields(word = %args.word))]
pub fn cmd_most(
    args: MostArgs,
    global_json: bool,
    progress: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let ranker = build_ranker(config, &args.wordnet, &args.ngram)?;
    let rate = args.domination_rate.or(config.domination_rate);
    debug!(?rate, json_output = global_json, "executing most command");

    let bar = spinner(progress, format!("fetching frequencies for '{}'", args.word));
    let ranking = ranker.most_frequent(&args.word, rate);
    bar.finish_and_clear();

    if global_json {
        let report = RankingReport {
            word: &args.word,
            ranking: &ranking,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_ranking(
            &format!("Most frequent synonyms of '{}'", args.word),
            &ranking,
            MOST_FREQUENT_PLACES,
        );
    }

    Ok(())
}
