//! synrank CLI
#![deny(unsafe_code)]

use std::path::Path;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use synrank::{Cli, Commands, commands};
use synrank_core::config::{Config, ConfigLoader, ConfigSources};

mod observability;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();

    if cli.version_only {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    // clap's arg_required_else_help has already handled a bare invocation
    let Some(command) = cli.command else {
        return Ok(());
    };

    if let Some(ref dir) = cli.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }
    let (config, sources) = load_config(cli.config.as_deref())?;

    let _guard = observability::init_observability(
        &observability::ObservabilityConfig::from_env_with_overrides(
            config.log_dir.clone().map(Utf8PathBuf::into_std_path_buf),
        ),
        observability::env_filter(cli.quiet, cli.verbose, config.log_level.as_str()),
    )
    .context("failed to initialize logging")?;
    tracing::debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        json = cli.json,
        color = ?cli.color,
        config_file = ?sources.primary_file(),
        "CLI initialized"
    );

    let progress = !cli.json && !cli.quiet;
    let result = match command {
        Commands::Most(args) => commands::most::cmd_most(args, cli.json, progress, &config),
        Commands::More(args) => commands::more::cmd_more(args, cli.json, progress, &config),
        Commands::Synonyms(args) => commands::synonyms::cmd_synonyms(args, cli.json, &config),
        Commands::Frequency(args) => {
            commands::frequency::cmd_frequency(args, cli.json, progress, &config)
        }
        Commands::Info(args) => commands::info::cmd_info(args, cli.json, &config, &sources),
    };
    if let Err(ref err) = result {
        tracing::error!(error = %err, "fatal error");
    }
    result
}

/// Discover config from the working directory, then apply `--config`.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<(Config, ConfigSources)> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let mut loader = ConfigLoader::new().with_project_search(utf8(cwd, "current directory")?);
    if let Some(path) = explicit {
        loader = loader.with_file(utf8(path.to_path_buf(), "config path")?);
    }
    loader.load().context("failed to load configuration")
}

fn utf8(path: std::path::PathBuf, what: &str) -> anyhow::Result<Utf8PathBuf> {
    Utf8PathBuf::try_from(path)
        .map_err(|e| anyhow::anyhow!("{what} is not valid UTF-8: {}", e.into_path_buf().display()))
}
