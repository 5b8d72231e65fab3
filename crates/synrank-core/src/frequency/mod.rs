//! Word usage frequency.
//!
//! [`FrequencySource`] is what the ranking engine consumes. [`NgramClient`]
//! implements it against the Google Books Ngram JSON endpoint.

mod ngram;

pub use ngram::{HttpTransport, NgramClient, Reply, Transport, TransportError};

/// A source of mean historical usage frequencies.
///
/// `0.0` means "no data": the word is absent from the corpus or the lookup
/// failed. Implementations never fail otherwise.
pub trait FrequencySource {
    /// Mean usage frequency of `word`.
    fn frequency(&self, word: &str) -> f64;
}

impl<T: FrequencySource + ?Sized> FrequencySource for &T {
    fn frequency(&self, word: &str) -> f64 {
        (**self).frequency(word)
    }
}

/// Mean of a time series, ignoring zero entries.
///
/// Years before a word appeared report zero; averaging them in would
/// understate newer words. A series with no non-zero entry reduces to `0.0`.
pub fn zero_aware_mean(series: &[f64]) -> f64 {
    let (sum, non_zero) = series
        .iter()
        .fold((0.0_f64, 0_usize), |(sum, count), &value| {
            (sum + value, count + usize::from(value != 0.0))
        });
    if non_zero == 0 {
        0.0
    } else {
        sum / non_zero as f64
    }
}
