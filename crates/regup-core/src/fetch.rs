//! HTTP fetching with a per-run response cache.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use thiserror::Error;

/// Timeout applied to every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A fetch failure.
///
/// Cloneable so cached outcomes can be replayed to later callers within the
/// same run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("could not build http client: {0}")]
    Client(String),

    /// The request failed below the HTTP layer (DNS, connect, timeout) or
    /// while reading the body.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// The requested URL.
        url: String,
        /// Transport-level detail.
        message: String,
    },

    /// The server answered with something other than 200 OK.
    #[error("unexpected response status {status} for {url}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status code received.
        status: u16,
    },

    /// The response body could not be decoded as what the caller expected.
    #[error("could not decode response from {url}: {message}")]
    Decode {
        /// The requested URL.
        url: String,
        /// Decoder detail.
        message: String,
    },

    /// A request URL could not be parsed or joined.
    #[error("invalid url {url}: {message}")]
    Url {
        /// The offending URL or base.
        url: String,
        /// Parser detail.
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    url: String,
    accept_json: bool,
    insecure: bool,
}

type Cache = HashMap<CacheKey, Result<String, FetchError>>;

/// HTTP fetch handle shared by every rule invocation in a run.
///
/// Holds two preconfigured clients (one with TLS verification disabled, for
/// vendors with broken certificate chains) and a response cache so repeated
/// requests for the same URL hit the network once per run. The cache stores
/// terminal outcomes, failures included, and lives until the fetcher is
/// dropped.
#[derive(Debug)]
pub struct Fetcher {
    client: reqwest::Client,
    insecure_client: reqwest::Client,
    cache: Mutex<Cache>,
}

impl Fetcher {
    /// Builds both clients with the standard timeout and user agent.
    ///
    /// # Errors
    /// Returns [`FetchError::Client`] if the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(crate::USER_AGENT)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        let insecure_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(crate::USER_AGENT)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self {
            client,
            insecure_client,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Fetches `url` as text, expecting a 200 response.
    ///
    /// `accept_json` sends an `Accept: application/json` header and caches
    /// under a separate slot; `insecure` selects the verification-disabled
    /// client.
    ///
    /// # Errors
    /// Returns the first failure observed for this URL within the run, which
    /// may have been cached by an earlier caller.
    pub async fn get(
        &self,
        url: &str,
        accept_json: bool,
        insecure: bool,
    ) -> Result<String, FetchError> {
        let key = CacheKey {
            url: url.to_string(),
            accept_json,
            insecure,
        };
        if let Some(outcome) = self.lock_cache().get(&key) {
            tracing::trace!("cache hit for {url}");
            return outcome.clone();
        }
        let outcome = self.fetch_uncached(&key).await;
        self.lock_cache().insert(key, outcome.clone());
        outcome
    }

    async fn fetch_uncached(&self, key: &CacheKey) -> Result<String, FetchError> {
        let client = if key.insecure {
            &self.insecure_client
        } else {
            &self.client
        };
        let mut request = client.get(&key.url);
        if key.accept_json {
            request = request.header(reqwest::header::ACCEPT, "application/json");
        }
        tracing::debug!("GET {}", key.url);
        let response = request.send().await.map_err(|e| FetchError::Transport {
            url: key.url.clone(),
            message: e.to_string(),
        })?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status {
                url: key.url.clone(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(|e| FetchError::Transport {
            url: key.url.clone(),
            message: e.to_string(),
        })
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, Cache> {
        // Cached values are plain strings; a panic while holding the lock
        // cannot leave them inconsistent.
        match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
