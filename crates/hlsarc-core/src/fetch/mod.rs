//! HTTP retrieval over libcurl.
//!
//! [`Fetcher`] is one attempt; [`fetch_with_retry`] wraps any fetcher in the
//! retry policy carried by [`FetchOptions`].

mod headers;

use std::time::Duration;

use url::Url;

use crate::config::{ArchiveConfig, FetchConfig};
use crate::control::AbortToken;
use crate::retry::{run_with_retry, FetchError, RetryPolicy};

pub use headers::{parse_header_file, parse_headers, Headers};

/// Per-request settings. Manifest and resource fetches build theirs separately.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub abort: Option<AbortToken>,
}

impl FetchOptions {
    pub fn from_config(fetch: &FetchConfig, cfg: &ArchiveConfig) -> Self {
        Self {
            timeout: fetch.timeout(),
            retry: RetryPolicy::from_config(fetch, cfg.retry.as_ref()),
            abort: None,
        }
    }

    pub fn manifest(cfg: &ArchiveConfig) -> Self {
        Self::from_config(&cfg.manifest, cfg)
    }

    pub fn resource(cfg: &ArchiveConfig) -> Self {
        Self::from_config(&cfg.resource, cfg)
    }

    pub fn with_abort(mut self, token: AbortToken) -> Self {
        self.abort = Some(token);
        self
    }

    fn is_aborted(&self) -> bool {
        self.abort.as_ref().is_some_and(AbortToken::is_aborted)
    }
}

/// One GET of `url`, returning the response body.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &Url, options: &FetchOptions) -> Result<Vec<u8>, FetchError>;
}

/// Run `fetcher` under the retry policy in `options`. An aborted token stops
/// before the next attempt.
pub fn fetch_with_retry(
    fetcher: &dyn Fetcher,
    url: &Url,
    options: &FetchOptions,
) -> Result<Vec<u8>, FetchError> {
    run_with_retry(&options.retry, || {
        if options.is_aborted() {
            return Err(FetchError::Aborted {
                url: url.to_string(),
            });
        }
        fetcher.fetch(url, options)
    })
}

/// Fetcher using one `curl::easy::Easy` per request, with fixed extra headers.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    headers: Headers,
}

impl CurlFetcher {
    pub fn new(headers: Headers) -> Self {
        Self { headers }
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &Url, options: &FetchOptions) -> Result<Vec<u8>, FetchError> {
        let curl_err = |source| FetchError::Curl {
            url: url.to_string(),
            source,
        };
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str()).map_err(curl_err)?;
        easy.follow_location(true).map_err(curl_err)?;
        easy.max_redirections(10).map_err(curl_err)?;
        easy.timeout(options.timeout).map_err(curl_err)?;
        easy.progress(options.abort.is_some()).map_err(curl_err)?;

        let mut list = curl::easy::List::new();
        for (k, v) in &self.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))
                .map_err(curl_err)?;
        }
        if !self.headers.is_empty() {
            easy.http_headers(list).map_err(curl_err)?;
        }

        let result = {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(curl_err)?;
            let abort = options.abort.clone();
            transfer
                .progress_function(move |_, _, _, _| {
                    !abort.as_ref().is_some_and(AbortToken::is_aborted)
                })
                .map_err(curl_err)?;
            transfer.perform()
        };
        if let Err(e) = result {
            if e.is_aborted_by_callback() || options.is_aborted() {
                return Err(FetchError::Aborted {
                    url: url.to_string(),
                });
            }
            return Err(curl_err(e));
        }

        let code = easy.response_code().map_err(curl_err)?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: code,
            });
        }
        tracing::debug!(url = %url, bytes = body.len(), "fetched");
        Ok(body)
    }
}
