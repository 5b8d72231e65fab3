//! Google Books Ngram client with bounded retries.

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use super::{FrequencySource, zero_aware_mean};
use crate::config::NgramConfig;
use crate::error::{ClientError, FetchError, FetchResult};

/// A raw HTTP answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl Reply {
    /// Anything below 400 counts as a usable answer.
    pub const fn is_ok(&self) -> bool {
        self.status < 400
    }
}

/// Why a single GET produced no reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connecting or reading took too long. Worth retrying.
    Timeout(String),
    /// Anything else: DNS, refused connection, TLS. Not retried.
    Other(String),
}

/// One blocking HTTP GET.
pub trait Transport {
    /// Fetch `url`.
    fn get(&self, url: &Url) -> Result<Reply, TransportError>;
}

/// [`Transport`] over a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build a client with the given connect and read timeouts.
    ///
    /// The read budget starts once the connection is up, so the overall
    /// per-request limit is their sum.
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(connect_timeout + read_timeout)
            .user_agent(concat!("synrank/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

fn classify(err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> Result<Reply, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| classify(&e))?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| classify(&e))?;
        Ok(Reply { status, body })
    }
}

/// Where a fetch stands.
#[derive(Debug)]
enum FetchState {
    Attempting { attempt: u32 },
    TimedOut { attempt: u32 },
    Failed(String),
    Succeeded(Reply),
}

/// One element of the service's JSON array.
#[derive(Debug, Deserialize)]
struct NgramSeries {
    timeseries: Vec<f64>,
}

/// Frequency lookups against the n-gram service.
#[derive(Debug, Clone)]
pub struct NgramClient<T = HttpTransport> {
    transport: T,
    endpoint: Url,
    api_key: String,
    corpus: String,
    year_start: u16,
    year_end: u16,
    smoothing: u32,
    max_attempts: u32,
}

impl NgramClient<HttpTransport> {
    /// Build a client that talks HTTP, using the configured timeouts.
    pub fn from_config(config: &NgramConfig, api_key: &str) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(
            Duration::from_secs(config.connect_timeout_secs),
            Duration::from_secs(config.read_timeout_secs),
        )?;
        Self::with_transport(config, api_key, transport)
    }
}

impl<T: Transport> NgramClient<T> {
    /// Build a client over any transport.
    pub fn with_transport(
        config: &NgramConfig,
        api_key: &str,
        transport: T,
    ) -> Result<Self, ClientError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| ClientError::Endpoint {
            endpoint: config.endpoint.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            transport,
            endpoint,
            api_key: api_key.to_string(),
            corpus: config.corpus.clone(),
            year_start: config.year_start,
            year_end: config.year_end,
            smoothing: config.smoothing,
            max_attempts: config.max_attempts.max(1),
        })
    }

    /// The URL requested for `word`.
    pub fn request_url(&self, word: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("content", word)
            .append_pair("year_start", &self.year_start.to_string())
            .append_pair("year_end", &self.year_end.to_string())
            .append_pair("corpus", &self.corpus)
            .append_pair("smoothing", &self.smoothing.to_string())
            .append_pair("key", &self.api_key);
        url
    }

    /// Run the retry loop until it settles.
    fn fetch(&self, url: &Url) -> FetchResult<Reply> {
        let mut state = FetchState::Attempting { attempt: 1 };
        loop {
            state = match state {
                FetchState::Attempting { attempt } => match self.transport.get(url) {
                    Ok(reply) => FetchState::Succeeded(reply),
                    Err(TransportError::Timeout(reason)) => {
                        tracing::debug!(attempt, %reason, "attempt timed out");
                        FetchState::TimedOut { attempt }
                    }
                    Err(TransportError::Other(reason)) => FetchState::Failed(reason),
                },
                FetchState::TimedOut { attempt } if attempt < self.max_attempts => {
                    FetchState::Attempting {
                        attempt: attempt + 1,
                    }
                }
                FetchState::TimedOut { attempt } => {
                    return Err(FetchError::Timeout { attempts: attempt });
                }
                FetchState::Failed(reason) => return Err(FetchError::Transport(reason)),
                FetchState::Succeeded(reply) => return Ok(reply),
            };
        }
    }

    /// Fetch and reduce the frequency of `word`, reporting why it failed.
    #[tracing::instrument(skip(self))]
    pub fn try_frequency(&self, word: &str) -> FetchResult<f64> {
        let reply = self.fetch(&self.request_url(word))?;
        if !reply.is_ok() {
            return Err(FetchError::Status(reply.status));
        }

        let payload = |e: serde_json::Error| FetchError::Payload(e.to_string());
        // Only the first entry is read; later ones may carry other shapes.
        let entries: Vec<serde_json::Value> = serde_json::from_str(&reply.body).map_err(payload)?;
        let frequency = match entries.first() {
            Some(first) => {
                let series = NgramSeries::deserialize(first).map_err(payload)?;
                zero_aware_mean(&series.timeseries)
            }
            None => 0.0,
        };
        tracing::debug!(frequency, entries = entries.len(), "frequency fetched");
        Ok(frequency)
    }
}

impl<T: Transport> FrequencySource for NgramClient<T> {
    fn frequency(&self, word: &str) -> f64 {
        match self.try_frequency(word) {
            Ok(frequency) => frequency,
            Err(err) => {
                tracing::warn!(word, error = %err, "failed to fetch frequency");
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned transport outcomes and counts calls.
    #[derive(Debug)]
    struct Scripted {
        outcomes: Mutex<VecDeque<Result<Reply, TransportError>>>,
        urls: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(outcomes: Vec<Result<Reply, TransportError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                urls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.urls.lock().unwrap().len()
        }
    }

    impl Transport for Scripted {
        fn get(&self, url: &Url) -> Result<Reply, TransportError> {
            self.urls.lock().unwrap().push(url.to_string());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Other("script exhausted".into())))
        }
    }

    fn ok(body: &str) -> Result<Reply, TransportError> {
        Ok(Reply {
            status: 200,
            body: body.to_string(),
        })
    }

    fn timeout() -> Result<Reply, TransportError> {
        Err(TransportError::Timeout("operation timed out".into()))
    }

    fn client(outcomes: Vec<Result<Reply, TransportError>>) -> NgramClient<Scripted> {
        NgramClient::with_transport(&NgramConfig::default(), "", Scripted::new(outcomes)).unwrap()
    }

    #[test]
    fn reduces_first_series_ignoring_zeros() {
        let c = client(vec![ok(
            r#"[{"ngram":"test","parent":"","type":"NGRAM","timeseries":[0.0,0.0,3.0,5.0]},
                {"ngram":"Test","timeseries":[100.0]}]"#,
        )]);
        assert_eq!(c.try_frequency("test"), Ok(4.0));
    }

    #[test]
    fn empty_array_is_zero() {
        let c = client(vec![ok("[]")]);
        assert_eq!(c.try_frequency("zzyzx"), Ok(0.0));
    }

    #[test]
    fn all_zero_series_is_zero() {
        let c = client(vec![ok(r#"[{"timeseries":[0,0,0]}]"#)]);
        assert_eq!(c.frequency("newword"), 0.0);
    }

    #[test]
    fn timeouts_are_retried_until_success() {
        let c = client(vec![timeout(), timeout(), ok(r#"[{"timeseries":[2.0]}]"#)]);
        assert_eq!(c.try_frequency("test"), Ok(2.0));
        assert_eq!(c.transport.calls(), 3);
    }

    #[test]
    fn timeouts_exhaust_the_attempt_budget() {
        let c = client(vec![timeout(), timeout(), timeout(), ok("[]")]);
        assert_eq!(
            c.try_frequency("test"),
            Err(FetchError::Timeout { attempts: 3 })
        );
        assert_eq!(c.transport.calls(), 3);
        assert_eq!(c.frequency("test"), 0.0);
    }

    #[test]
    fn other_failures_stop_retrying() {
        let c = client(vec![
            Err(TransportError::Other("dns error".into())),
            ok(r#"[{"timeseries":[2.0]}]"#),
        ]);
        assert_eq!(
            c.try_frequency("test"),
            Err(FetchError::Transport("dns error".into()))
        );
        assert_eq!(c.transport.calls(), 1);
    }

    #[test]
    fn failure_status_is_zero() {
        let c = client(vec![Ok(Reply {
            status: 429,
            body: "quota".into(),
        })]);
        assert_eq!(c.try_frequency("test"), Err(FetchError::Status(429)));
    }

    #[test]
    fn bad_json_is_zero() {
        let c = client(vec![ok("<html>nope</html>"), ok(r#"[{"ngram":"x"}]"#)]);
        assert!(matches!(c.try_frequency("test"), Err(FetchError::Payload(_))));
        assert!(matches!(c.try_frequency("test"), Err(FetchError::Payload(_))));
    }

    #[test]
    fn later_entries_are_not_decoded() {
        let c = client(vec![ok(
            r#"[{"ngram":"test","timeseries":[2.0,4.0]},{"ngram":"Test (All)"}]"#,
        )]);
        assert_eq!(c.try_frequency("test"), Ok(3.0));
    }

    #[test]
    fn first_entry_without_series_is_payload_error() {
        let c = client(vec![ok(r#"[{"ngram":"x"},{"timeseries":[1.0]}]"#)]);
        assert!(matches!(c.try_frequency("x"), Err(FetchError::Payload(_))));
    }

    #[test]
    fn at_least_one_attempt_is_made() {
        let config = NgramConfig {
            max_attempts: 0,
            ..NgramConfig::default()
        };
        let c = NgramClient::with_transport(&config, "", Scripted::new(vec![timeout()])).unwrap();
        assert_eq!(
            c.try_frequency("test"),
            Err(FetchError::Timeout { attempts: 1 })
        );
    }

    #[test]
    fn request_url_carries_all_parameters() {
        let c = NgramClient::with_transport(&NgramConfig::default(), "k3y", Scripted::new(vec![]))
            .unwrap();
        let url = c.request_url("tryout");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(url.host_str(), Some("books.google.com"));
        assert_eq!(url.path(), "/ngrams/json");
        assert_eq!(
            pairs,
            vec![
                ("content".to_string(), "tryout".to_string()),
                ("year_start".to_string(), "1800".to_string()),
                ("year_end".to_string(), "2024".to_string()),
                ("corpus".to_string(), "ru".to_string()),
                ("smoothing".to_string(), "3".to_string()),
                ("key".to_string(), "k3y".to_string()),
            ]
        );
    }

    #[test]
    fn request_url_encodes_the_word() {
        let c = client(vec![]);
        let url = c.request_url("a&b");
        assert!(url.as_str().contains("content=a%26b"));
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let config = NgramConfig {
            endpoint: "not a url".into(),
            ..NgramConfig::default()
        };
        let err = NgramClient::with_transport(&config, "", Scripted::new(vec![])).unwrap_err();
        assert!(matches!(err, ClientError::Endpoint { .. }));
    }

    #[test]
    fn http_transport_builds() {
        assert!(HttpTransport::new(Duration::from_secs(3), Duration::from_secs(8)).is_ok());
    }
}
