//! Wrappers that adjust another extractor's behavior or output.

use std::fmt;

use async_trait::async_trait;
use regup_schema::{Arch, LinkMap};

use crate::context::RuleContext;
use crate::error::ExtractError;
use crate::rule::{Downloader, Versioner};

/// Applies `transform` to the wrapped versioner's output.
pub fn map_version(
    inner: impl Versioner + 'static,
    transform: impl Fn(String) -> String + Send + Sync + 'static,
) -> MapVersion {
    MapVersion {
        inner: Box::new(inner),
        transform: Box::new(transform),
    }
}

/// Replaces underscores with dots in the wrapped versioner's output, for
/// vendors that tag `4_3_1` while shipping `4.3.1`.
pub fn underscore_to_dot(inner: impl Versioner + 'static) -> MapVersion {
    map_version(inner, |version| version.replace('_', "."))
}

/// Versioner returned by [`map_version`] and [`underscore_to_dot`].
pub struct MapVersion {
    inner: Box<dyn Versioner>,
    transform: Box<dyn Fn(String) -> String + Send + Sync>,
}

impl fmt::Debug for MapVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapVersion").finish_non_exhaustive()
    }
}

#[async_trait]
impl Versioner for MapVersion {
    async fn version(&self, cx: &mut RuleContext<'_>) -> Result<String, ExtractError> {
        let version = self.inner.version(cx).await?;
        Ok((self.transform)(version))
    }
}

/// Disables TLS certificate verification while the wrapped versioner runs,
/// restoring the previous setting afterwards.
pub fn insecure_version(inner: impl Versioner + 'static) -> InsecureVersion {
    InsecureVersion {
        inner: Box::new(inner),
    }
}

/// Versioner returned by [`insecure_version`].
pub struct InsecureVersion {
    inner: Box<dyn Versioner>,
}

impl fmt::Debug for InsecureVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsecureVersion").finish_non_exhaustive()
    }
}

#[async_trait]
impl Versioner for InsecureVersion {
    async fn version(&self, cx: &mut RuleContext<'_>) -> Result<String, ExtractError> {
        let previous = cx.set_insecure(true);
        let result = self.inner.version(cx).await;
        cx.set_insecure(previous);
        result
    }
}

/// Disables TLS certificate verification while the wrapped downloader runs,
/// restoring the previous setting afterwards.
pub fn insecure_download(inner: impl Downloader + 'static) -> InsecureDownload {
    InsecureDownload {
        inner: Box::new(inner),
    }
}

/// Downloader returned by [`insecure_download`].
pub struct InsecureDownload {
    inner: Box<dyn Downloader>,
}

impl fmt::Debug for InsecureDownload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsecureDownload").finish_non_exhaustive()
    }
}

#[async_trait]
impl Downloader for InsecureDownload {
    async fn links(
        &self,
        version: &str,
        cx: &mut RuleContext<'_>,
    ) -> Result<LinkMap, ExtractError> {
        let previous = cx.set_insecure(true);
        let result = self.inner.links(version, cx).await;
        cx.set_insecure(previous);
        result
    }
}

/// Appends `suffix` to every link the wrapped downloader produces.
pub fn append_to_links(inner: impl Downloader + 'static, suffix: &str) -> AppendToLinks {
    AppendToLinks {
        inner: Box::new(inner),
        suffix: suffix.to_string(),
    }
}

/// Downloader returned by [`append_to_links`].
pub struct AppendToLinks {
    inner: Box<dyn Downloader>,
    suffix: String,
}

impl fmt::Debug for AppendToLinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppendToLinks")
            .field("suffix", &self.suffix)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Downloader for AppendToLinks {
    async fn links(
        &self,
        version: &str,
        cx: &mut RuleContext<'_>,
    ) -> Result<LinkMap, ExtractError> {
        let mut links = self.inner.links(version, cx).await?;
        for arch in [Arch::X86, Arch::X86_64] {
            if let Some(link) = links.take(arch) {
                links.insert(arch, format!("{link}{}", self.suffix));
            }
        }
        Ok(links)
    }
}

/// Runs two downloaders and keeps the x86 link from the first and the
/// x86_64 link from the second, for vendors that split architectures across
/// separate pages.
pub fn split_download(
    x86: impl Downloader + 'static,
    x86_64: impl Downloader + 'static,
) -> SplitDownload {
    SplitDownload {
        x86: Box::new(x86),
        x86_64: Box::new(x86_64),
    }
}

/// Downloader returned by [`split_download`].
pub struct SplitDownload {
    x86: Box<dyn Downloader>,
    x86_64: Box<dyn Downloader>,
}

impl fmt::Debug for SplitDownload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitDownload").finish_non_exhaustive()
    }
}

#[async_trait]
impl Downloader for SplitDownload {
    async fn links(
        &self,
        version: &str,
        cx: &mut RuleContext<'_>,
    ) -> Result<LinkMap, ExtractError> {
        let mut links = LinkMap::new();
        let mut first = self.x86.links(version, cx).await?;
        if let Some(link) = first.take(Arch::X86) {
            links.insert(Arch::X86, link);
        }
        let mut second = self.x86_64.links(version, cx).await?;
        if let Some(link) = second.take(Arch::X86_64) {
            links.insert(Arch::X86_64, link);
        }
        Ok(links)
    }
}
