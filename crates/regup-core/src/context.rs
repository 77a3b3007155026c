//! Per-invocation state shared between a rule's version and download steps.

use serde::de::DeserializeOwned;

use crate::fetch::{FetchError, Fetcher};

/// State scoped to a single package's reconciliation attempt.
///
/// A fresh context is created before a rule runs and dropped afterwards. It
/// carries the shared fetch handle, the TLS-verification toggle the insecure
/// wrappers flip, and whatever one extraction step wants to hand to the
/// next. Today that is only the AppVeyor job IDs recorded by the branch
/// versioner so the artifact downloader does not resolve the build twice.
#[derive(Debug)]
pub struct RuleContext<'a> {
    fetcher: &'a Fetcher,
    insecure: bool,
    /// Job IDs of the AppVeyor build resolved while extracting the version.
    pub appveyor_job_ids: Option<Vec<String>>,
}

impl<'a> RuleContext<'a> {
    /// A fresh context for one package.
    pub fn new(fetcher: &'a Fetcher) -> Self {
        Self {
            fetcher,
            insecure: false,
            appveyor_job_ids: None,
        }
    }

    /// Fetches a page as text through the shared cache.
    ///
    /// # Errors
    /// Propagates any [`FetchError`] from the underlying request.
    pub async fn page(&self, url: &str) -> Result<String, FetchError> {
        self.fetcher.get(url, false, self.insecure).await
    }

    /// Fetches and decodes a JSON API response.
    ///
    /// # Errors
    /// Propagates fetch failures; a body that does not deserialize as `T`
    /// becomes [`FetchError::Decode`].
    pub async fn json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let body = self.fetcher.get(url, true, self.insecure).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Sets whether subsequent fetches skip TLS verification, returning the
    /// previous setting so wrappers can restore it.
    pub fn set_insecure(&mut self, insecure: bool) -> bool {
        std::mem::replace(&mut self.insecure, insecure)
    }
}
