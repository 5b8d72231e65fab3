//! Layered configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. the user file, `<config dir>/synrank/config.<ext>`
//! 3. project files, from the closest directory at or above the search root
//!    that has any (`.synrank.<ext>` then `synrank.<ext>`)
//! 4. explicit files, in the order given
//! 5. `SYNRANK_*` environment variables
//!
//! `<ext>` is `toml`, `yaml`, `yml` or `json`; in one directory they merge in
//! that order. The upward walk stops at a directory holding the boundary
//! marker (`.git` by default), after checking that directory itself.
//!
//! Nested n-gram settings take a double underscore in the environment:
//! `SYNRANK_NGRAM__CORPUS=en`.
//!
//! ```no_run
//! use camino::Utf8PathBuf;
//! use synrank_core::config::ConfigLoader;
//!
//! let cwd = Utf8PathBuf::try_from(std::env::current_dir()?)?;
//! let (config, sources) = ConfigLoader::new().with_project_search(&cwd).load()?;
//! println!("corpus {} from {:?}", config.ngram.corpus, sources.primary_file());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default n-gram service endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://books.google.com/ngrams/json";

const APP_NAME: &str = "synrank";
const ENV_PREFIX: &str = "SYNRANK_";
const EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

/// Settings for the n-gram frequency service.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NgramConfig {
    /// Base URL of the JSON endpoint.
    pub endpoint: String,
    /// Corpus identifier (e.g. `en`, `en-US`, `en-GB`, `fr`, `ru`).
    pub corpus: String,
    /// First year of the requested time series.
    pub year_start: u16,
    /// Last year of the requested time series.
    pub year_end: u16,
    /// Smoothing window passed to the service.
    pub smoothing: u32,
    /// Total attempts per word, counting the first one.
    pub max_attempts: u32,
    /// Seconds allowed for establishing a connection.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for the server to produce the response.
    pub read_timeout_secs: u64,
}

impl Default for NgramConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            corpus: "ru".to_string(),
            year_start: 1800,
            year_end: 2024,
            smoothing: 3,
            max_attempts: 3,
            connect_timeout_secs: 3,
            read_timeout_secs: 8,
        }
    }
}

/// The configuration for synrank.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files (no file logging if unset).
    pub log_dir: Option<Utf8PathBuf>,
    /// API key sent with every n-gram request. Empty is allowed.
    pub api_key: String,
    /// WordNet database directory (the one holding `index.noun`, `data.noun`, ...).
    ///
    /// Falls back to `<user data dir>/wordnet` when unset.
    pub wordnet_dir: Option<Utf8PathBuf>,
    /// N-gram service settings.
    pub ngram: NgramConfig,
    /// Default domination rate for the `most` command.
    pub domination_rate: Option<f64>,
    /// Fetch candidate frequencies concurrently.
    pub parallel_fetch: bool,
}

impl Config {
    /// Resolve the WordNet directory, applying the platform default.
    pub fn resolved_wordnet_dir(&self) -> Option<Utf8PathBuf> {
        self.wordnet_dir
            .clone()
            .or_else(|| user_data_dir().map(|dir| dir.join("wordnet")))
    }

    /// Reject values that deserialize but cannot be used.
    pub fn validate(&self) -> ConfigResult<()> {
        let ngram = &self.ngram;
        if ngram.year_start > ngram.year_end {
            return Err(ConfigError::Invalid {
                field: "ngram.year_start",
                reason: format!(
                    "{} is after ngram.year_end ({})",
                    ngram.year_start, ngram.year_end
                ),
            });
        }
        if ngram.corpus.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "ngram.corpus",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Which files went into a loaded [`Config`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project files from the closest directory that had any, low to high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// The user file, if one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Files passed explicitly (e.g. `--config`).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// The file with the final say: last explicit, else last project, else user.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .or_else(|| self.project_files.last())
            .or(self.user_file.as_ref())
            .map(Utf8PathBuf::as_path)
    }
}

/// Builder over the configuration sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    search_root: Option<Utf8PathBuf>,
    user_config: bool,
    boundary: Option<String>,
    files: Vec<Utf8PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Defaults plus user config; no project search; `.git` boundary.
    pub fn new() -> Self {
        Self {
            search_root: None,
            user_config: true,
            boundary: Some(".git".to_string()),
            files: Vec::new(),
        }
    }

    /// Look for project files from `path` upward.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Include or skip the user config file.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.user_config = include;
        self
    }

    /// Stop the upward walk at a directory containing `marker`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary = Some(marker.into());
        self
    }

    /// Walk all the way to the filesystem root.
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary = None;
        self
    }

    /// Merge `path` after discovered files. Later calls win.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.files.push(path.as_ref().to_path_buf());
        self
    }

    /// Merge every source and validate the result.
    #[tracing::instrument(skip(self), fields(search_root = ?self.search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        let mut sources = ConfigSources::default();
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if self.user_config {
            sources.user_file = user_config_file();
        }
        if let Some(ref root) = self.search_root {
            sources.project_files = self.project_files(root);
        }
        sources.explicit_files = self.files;

        let files = sources
            .user_file
            .iter()
            .chain(&sources.project_files)
            .chain(&sources.explicit_files);
        for file in files {
            tracing::debug!(%file, "merging config file");
            figment = merge_file(figment, file);
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment.extract().map_err(Box::new)?;
        config.validate()?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            corpus = %config.ngram.corpus,
            "configuration loaded"
        );
        Ok((config, sources))
    }

    fn project_files(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        for dir in start.ancestors() {
            let found: Vec<Utf8PathBuf> = candidate_names()
                .map(|name| dir.join(name))
                .filter(|path| path.is_file())
                .collect();
            if !found.is_empty() {
                return found;
            }
            let at_boundary = self
                .boundary
                .as_ref()
                .is_some_and(|marker| dir != start && dir.join(marker).exists());
            if at_boundary {
                break;
            }
        }
        Vec::new()
    }
}

/// `.synrank.<ext>` for every extension, then `synrank.<ext>`.
fn candidate_names() -> impl Iterator<Item = String> {
    let dotfiles = EXTENSIONS.iter().map(|ext| format!(".{APP_NAME}.{ext}"));
    let regular = EXTENSIONS.iter().map(|ext| format!("{APP_NAME}.{ext}"));
    dotfiles.chain(regular)
}

/// Unknown extensions are read as TOML.
fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
    match path.extension() {
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
        Some("json") => figment.merge(Json::file_exact(path.as_str())),
        _ => figment.merge(Toml::file_exact(path.as_str())),
    }
}

fn user_config_file() -> Option<Utf8PathBuf> {
    let dir = user_config_dir()?;
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("config.{ext}")))
        .find(|path| path.is_file())
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// Per-user config directory, e.g. `~/.config/synrank` on Linux.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(project_dirs()?.config_dir().to_path_buf()).ok()
}

/// Per-user data directory, e.g. `~/.local/share/synrank` on Linux.
pub fn user_data_dir() -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(project_dirs()?.data_dir().to_path_buf()).ok()
}
