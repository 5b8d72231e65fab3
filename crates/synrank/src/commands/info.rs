//! Info command implementation

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use synrank_core::config::{Config, ConfigSources};
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wordnet_dir: Option<String>,
    api_key_set: bool,
    corpus: String,
    endpoint: String,
    years: [u16; 2],
    smoothing: u32,
    max_attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    domination_rate: Option<f64>,
    parallel_fetch: bool,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            wordnet_dir: config.resolved_wordnet_dir().map(|p| p.to_string()),
            api_key_set: !config.api_key.is_empty(),
            corpus: config.ngram.corpus.clone(),
            endpoint: config.ngram.endpoint.clone(),
            years: [config.ngram.year_start, config.ngram.year_end],
            smoothing: config.ngram.smoothing,
            max_attempts: config.ngram.max_attempts,
            domination_rate: config.domination_rate,
            parallel_fetch: config.parallel_fetch,
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print the package and the effective configuration.
#[instrument(name = "cmd_info", skip_all)]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");
    let info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print_text(&info);
    }
    Ok(())
}

fn print_text(info: &FullInfo) {
    let package = &info.package;
    println!("{} {}", package.name.bold(), package.version.green());
    for (label, value) in [
        ("", package.description),
        ("License", package.license),
        ("Repository", package.repository),
    ] {
        match (label, value) {
            (_, "") => {}
            ("", text) => println!("{text}"),
            (label, text) => row(label, text),
        }
    }

    let cfg = &info.config;
    section("Configuration");
    match cfg.config_file {
        Some(ref path) => row("Config file", path.cyan()),
        None => row("Config file", "none loaded".yellow()),
    }
    row("Log level", &cfg.log_level);
    row_opt("Log directory", cfg.log_dir.as_ref());
    row_opt("WordNet directory", cfg.wordnet_dir.as_ref());

    section("Frequency Service");
    row("Endpoint", cfg.endpoint.cyan());
    row("Corpus", &cfg.corpus);
    row("Years", format!("{}-{}", cfg.years[0], cfg.years[1]));
    row("Smoothing", cfg.smoothing);
    row("Attempts", cfg.max_attempts);
    row("API key", if cfg.api_key_set { "set" } else { "not set" });
    row_opt("Domination rate", cfg.domination_rate.as_ref());
    row("Parallel fetch", cfg.parallel_fetch);
}

fn section(title: &str) {
    println!();
    println!("{}", title.bold().underline());
}

fn row(label: &str, value: impl std::fmt::Display) {
    println!("{}: {value}", label.dimmed());
}

fn row_opt<T: std::fmt::Display>(label: &str, value: Option<&T>) {
    match value {
        Some(v) => row(label, v),
        None => row(label, "(not set)".dimmed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmd_info_text_succeeds() {
        let result = cmd_info(
            InfoArgs::default(),
            false,
            &Config::default(),
            &ConfigSources::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_cmd_info_json_via_global() {
        let result = cmd_info(
            InfoArgs::default(),
            true,
            &Config::default(),
            &ConfigSources::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_info_no_file() {
        let info = ConfigInfo::from_config(&Config::default(), &ConfigSources::default());
        assert!(info.config_file.is_none());
        assert_eq!(info.log_level, "info");
        assert_eq!(info.corpus, "ru");
        assert!(!info.api_key_set);
    }

    #[test]
    fn test_config_info_hides_key_value() {
        let config = Config {
            api_key: "secret".to_string(),
            ..Config::default()
        };
        let info = ConfigInfo::from_config(&config, &ConfigSources::default());
        assert!(info.api_key_set);
        let json = serde_json::to_string(&info).unwrap();
        assert!(!json.contains("secret"));
    }
}
