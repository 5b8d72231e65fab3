//! Argument parsing and command implementations for the `synrank` binary.
//!
//! [`Cli`] is the clap root, [`Commands`] the subcommands, and [`commands`]
//! holds one module per subcommand. `main.rs` wires them to config and logging.

pub mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// When to colorize output.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Let owo-colors decide.
    #[default]
    Auto,
    /// Force colors on.
    Always,
    /// Force colors off.
    Never,
}

impl ColorChoice {
    /// Install the choice as the process-wide override.
    pub fn apply(self) {
        match self {
            Self::Auto => owo_colors::unset_override(),
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG               Log filter (e.g., debug, synrank=trace)
    SYNRANK_LOG_PATH       Explicit log file path
    SYNRANK_LOG_DIR        Log directory
    SYNRANK_API_KEY        Google Books API key
    SYNRANK_WORDNET_DIR    WordNet database directory
    SYNRANK_NGRAM__CORPUS  N-gram corpus (en, en-US, en-GB, fr, ru, ...)
";
/// synrank command line.
#[derive(Parser)]
#[command(name = "synrank")]
#[command(about = "Rank single-word synonyms by real-world usage frequency", long_about = None)]
#[command(version, arg_required_else_help = true)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// What to do.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print the bare version number and exit
    #[arg(long)]
    pub version_only: bool,

    /// Extra config file, merged over discovered ones
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Log errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// When to use colors
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Print results as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,
}

/// synrank subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Rank synonyms against the most frequent one
    Most(commands::most::MostArgs),

    /// List synonyms used more often than the word itself
    More(commands::more::MoreArgs),

    /// List synonym candidates without fetching frequencies
    Synonyms(commands::synonyms::SynonymsArgs),

    /// Show the mean usage frequency of a single word
    Frequency(commands::frequency::FrequencyArgs),

    /// Show package information
    Info(commands::info::InfoArgs),
}

/// The clap command tree, for man pages and completions.
pub fn command() -> clap::Command {
    Cli::command()
}
