//! More command implementation

use clap::Args;
use synrank_core::Config;
use synrank_core::rank::MORE_FREQUENT_PLACES;
use tracing::{debug, instrument};

use super::{NgramArgs, RankingReport, WordNetArgs, build_ranker, print_ranking, spinner};

/// Arguments for the `more` subcommand.
#[derive(Args, Debug)]
pub struct MoreArgs {
    /// Word to find synonyms for
    pub word: String,

    #[command(flatten)]
    pub wordnet: WordNetArgs,

    #[command(flatten)]
    pub ngram: NgramArgs,
}

/// List the synonyms used more often than the word itself.
#[instrument(name = "cmd_more", skip_all, fields(word = %args.word))]
pub fn cmd_more(
    args: MoreArgs,
    global_json: bool,
    progress: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let ranker = build_ranker(config, &args.wordnet, &args.ngram)?;
    debug!(json_output = global_json, "executing more command");

    let bar = spinner(progress, format!("fetching frequencies for '{}'", args.word));
    let ranking = ranker.more_frequent(&args.word);
    bar.finish_and_clear();

    if global_json {
        let report = RankingReport {
            word: &args.word,
            ranking: &ranking,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_ranking(
            &format!("Synonyms more frequent than '{}'", args.word),
            &ranking,
            MORE_FREQUENT_PLACES,
        );
    }

    Ok(())
}
