//! Test doubles shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use url::Url;

use crate::fetch::{FetchOptions, Fetcher};
use crate::retry::{FetchError, RetryPolicy};

/// Serves fixed bodies by URL; unknown URLs answer 404.
pub(crate) struct MapFetcher {
    bodies: HashMap<String, Vec<u8>>,
    calls: AtomicUsize,
}

impl MapFetcher {
    pub(crate) fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            bodies: pairs
                .iter()
                .map(|(u, b)| (u.to_string(), b.as_bytes().to_vec()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fetcher for MapFetcher {
    fn fetch(&self, url: &Url, _options: &FetchOptions) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bodies
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Http {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Options with millisecond backoff so retry paths stay fast.
pub(crate) fn quick_options(max_attempts: u32) -> FetchOptions {
    FetchOptions {
        timeout: Duration::from_secs(1),
        retry: RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
        },
        abort: None,
    }
}
