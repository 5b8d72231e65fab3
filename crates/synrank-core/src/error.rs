//! Error types for synrank-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// A setting deserialized fine but its value is unusable.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the setting.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading the lexical database.
#[derive(Error, Debug)]
pub enum LexiconError {
    /// No database directory was configured or it does not exist.
    #[error("wordnet database not found at {0}")]
    MissingDatabase(Utf8PathBuf),

    /// A database file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that failed to read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A database line did not match the expected layout.
    #[error("{path}:{line}: {reason}")]
    Malformed {
        /// The file containing the bad line.
        path: Utf8PathBuf,
        /// One-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}

/// Result type alias using [`LexiconError`].
pub type LexiconResult<T> = Result<T, LexiconError>;

/// Reasons a frequency lookup degraded to zero.
///
/// These never escape [`FrequencySource::frequency`](crate::frequency::FrequencySource);
/// they are logged and available through
/// [`NgramClient::try_frequency`](crate::frequency::NgramClient::try_frequency).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Every attempt timed out.
    #[error("timed out after {attempts} attempts")]
    Timeout {
        /// Number of attempts made.
        attempts: u32,
    },

    /// A non-timeout network failure (DNS, refused connection, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service returned status {0}")]
    Status(u16),

    /// The response body was not the expected JSON.
    #[error("decoding JSON has failed: {0}")]
    Payload(String),
}

/// Result type alias using [`FetchError`].
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors that can occur when constructing the n-gram client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),

    /// The configured endpoint is not a valid URL.
    #[error("invalid n-gram endpoint {endpoint:?}: {reason}")]
    Endpoint {
        /// The endpoint as configured.
        endpoint: String,
        /// Why it failed to parse.
        reason: String,
    },
}
