//! Extractors for GitHub release and tag pages.
//!
//! These scrape the public HTML pages rather than the REST API, which keeps
//! unauthenticated runs clear of the API rate limit.

use async_trait::async_trait;
use regex::Regex;
use regup_schema::{Arch, LinkMap};
use scraper::{Html, Selector};

use crate::context::RuleContext;
use crate::error::{ExtractError, Target};
use crate::extract::{capture_one, resolve, sel};
use crate::rule::{Downloader, Versioner};

const GITHUB_BASE: &str = "https://github.com";

/// Asset names with these suffixes are never installers.
const SKIPPED_SUFFIXES: [&str; 4] = [".sig", ".sha1", ".sha256", ".md5"];

/// Extracts the version from `repo`'s latest-release page by applying
/// `tag_pattern`'s single capture group to the release's tag name.
///
/// # Panics
/// Panics if `tag_pattern` is invalid.
pub fn release_version(repo: &str, tag_pattern: &str) -> TagPageVersion {
    release_version_at(GITHUB_BASE, repo, tag_pattern)
}

/// [`release_version`] against a custom base URL.
pub fn release_version_at(base: &str, repo: &str, tag_pattern: &str) -> TagPageVersion {
    TagPageVersion {
        url: format!("{base}/{repo}/releases/latest"),
        selector: sel(".release .tag-references .octicon-tag+span"),
        pattern: super::re(tag_pattern),
    }
}

/// Extracts the version from `repo`'s tags page, for repositories that tag
/// releases without publishing them.
///
/// # Panics
/// Panics if `tag_pattern` is invalid.
pub fn tag_version(repo: &str, tag_pattern: &str) -> TagPageVersion {
    tag_version_at(GITHUB_BASE, repo, tag_pattern)
}

/// [`tag_version`] against a custom base URL.
pub fn tag_version_at(base: &str, repo: &str, tag_pattern: &str) -> TagPageVersion {
    TagPageVersion {
        url: format!("{base}/{repo}/tags"),
        selector: sel(".releases-tag-list .tag-info .tag-name"),
        pattern: super::re(tag_pattern),
    }
}

/// Versioner returned by [`release_version`] and [`tag_version`]: reads the
/// newest tag name off the page and applies the tag pattern.
#[derive(Debug)]
pub struct TagPageVersion {
    url: String,
    selector: Selector,
    pattern: Regex,
}

impl TagPageVersion {
    fn extract(&self, body: &str) -> Result<String, ExtractError> {
        let document = Html::parse_document(body);
        let element = document
            .select(&self.selector)
            .next()
            .ok_or(ExtractError::NoSelectorMatch(Target::Version))?;
        let tag = element.text().collect::<String>().trim().to_string();
        if tag.is_empty() {
            return Err(ExtractError::EmptyAttribute(Target::Version));
        }
        Ok(capture_one(&self.pattern, &tag, Target::Version)?.to_string())
    }
}

#[async_trait]
impl Versioner for TagPageVersion {
    async fn version(&self, cx: &mut RuleContext<'_>) -> Result<String, ExtractError> {
        let body = cx.page(&self.url).await?;
        self.extract(&body)
    }
}

/// Extracts download links from the assets of `repo`'s latest release.
///
/// Each architecture's pattern is matched against the asset file name (the
/// last path segment of its URL); the first matching asset wins. Signature
/// and checksum files are skipped. An architecture with a pattern but no
/// matching asset is an error.
///
/// # Panics
/// Panics if both patterns are `None` or a pattern is invalid.
pub fn release_links(repo: &str, x86: Option<&str>, x86_64: Option<&str>) -> ReleaseLinks {
    release_links_at(GITHUB_BASE, repo, x86, x86_64)
}

/// [`release_links`] against a custom base URL.
pub fn release_links_at(
    base: &str,
    repo: &str,
    x86: Option<&str>,
    x86_64: Option<&str>,
) -> ReleaseLinks {
    assert!(
        x86.is_some() || x86_64.is_some(),
        "at least one architecture pattern is required"
    );
    ReleaseLinks {
        url: format!("{base}/{repo}/releases/latest"),
        release: sel(".release"),
        assets: sel(".f3+.mt-2 .d-block.py-2 a[href]"),
        x86: x86.map(super::re),
        x86_64: x86_64.map(super::re),
    }
}

/// Downloader returned by [`release_links`].
#[derive(Debug)]
pub struct ReleaseLinks {
    url: String,
    release: Selector,
    assets: Selector,
    x86: Option<Regex>,
    x86_64: Option<Regex>,
}

impl ReleaseLinks {
    /// Collects `(url, file name)` pairs for the newest release's assets,
    /// skipping signatures and checksums.
    fn assets(&self, body: &str) -> Result<Vec<(String, String)>, ExtractError> {
        let document = Html::parse_document(body);
        let release = document
            .select(&self.release)
            .next()
            .ok_or(ExtractError::NoAssets)?;
        let mut files = Vec::new();
        for anchor in release.select(&self.assets) {
            let href = anchor.value().attr("href").unwrap_or("").trim();
            if href.is_empty() {
                return Err(ExtractError::AssetHref);
            }
            let href = resolve(&self.url, href)?;
            let name = href.rsplit('/').next().unwrap_or("").to_string();
            if name.is_empty() {
                return Err(ExtractError::AssetHref);
            }
            if SKIPPED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
                continue;
            }
            files.push((href, name));
        }
        if files.is_empty() {
            return Err(ExtractError::NoAssets);
        }
        Ok(files)
    }
}

fn pick(files: &[(String, String)], pattern: &Regex, arch: Arch) -> Result<String, ExtractError> {
    files
        .iter()
        .find(|(_, name)| pattern.is_match(name))
        .map(|(href, _)| href.clone())
        .ok_or(ExtractError::MissingAsset(arch))
}

#[async_trait]
impl Downloader for ReleaseLinks {
    async fn links(
        &self,
        _version: &str,
        cx: &mut RuleContext<'_>,
    ) -> Result<LinkMap, ExtractError> {
        let body = cx.page(&self.url).await?;
        let files = self.assets(&body)?;
        let mut links = LinkMap::new();
        if let Some(pattern) = &self.x86 {
            links.insert(Arch::X86, pick(&files, pattern, Arch::X86)?);
        }
        if let Some(pattern) = &self.x86_64 {
            links.insert(Arch::X86_64, pick(&files, pattern, Arch::X86_64)?);
        }
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Fetcher;

    const RELEASE_PAGE: &str = r##"
<html><body>
<div class="release">
  <div class="tag-references">
    <svg class="octicon octicon-tag"></svg><span>v2.4.1</span>
  </div>
  <div class="f3">Assets</div>
  <div class="mt-2">
    <div class="d-block py-2"><a href="/geek1011/app/releases/download/v2.4.1/app-2.4.1.exe.sha256">checksum</a></div>
    <div class="d-block py-2"><a href="/geek1011/app/releases/download/v2.4.1/app-2.4.1.exe">x86</a></div>
    <div class="d-block py-2"><a href="/geek1011/app/releases/download/v2.4.1/app-2.4.1-x64.exe">x64</a></div>
  </div>
</div>
<div class="release">
  <div class="tag-references">
    <svg class="octicon octicon-tag"></svg><span>v2.4.0</span>
  </div>
</div>
</body></html>
"##;

    const TAGS_PAGE: &str = r#"
<html><body>
<div class="releases-tag-list">
  <div class="tag-info"><a class="tag-name" href="/x/y/releases/tag/win-1.9">win-1.9</a></div>
  <div class="tag-info"><a class="tag-name" href="/x/y/releases/tag/win-1.8">win-1.8</a></div>
</div>
</body></html>
"#;

    #[tokio::test]
    async fn release_version_reads_the_newest_tag() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/geek1011/app/releases/latest")
            .with_body(RELEASE_PAGE)
            .create_async()
            .await;

        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);
        let versioner = release_version_at(&server.url(), "geek1011/app", "v([0-9.]+)");
        assert_eq!(versioner.version(&mut cx).await.unwrap(), "2.4.1");
    }

    #[tokio::test]
    async fn tag_version_reads_the_tags_page() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/x/y/tags")
            .with_body(TAGS_PAGE)
            .create_async()
            .await;

        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);
        let versioner = tag_version_at(&server.url(), "x/y", "win-([0-9.]+)");
        assert_eq!(versioner.version(&mut cx).await.unwrap(), "1.9");
    }

    #[tokio::test]
    async fn release_links_match_asset_names_and_skip_checksums() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/geek1011/app/releases/latest")
            .with_body(RELEASE_PAGE)
            .create_async()
            .await;

        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);
        // The plain ".exe" pattern would match the checksum's base name if
        // checksums were not skipped first.
        let downloader = release_links_at(
            &server.url(),
            "geek1011/app",
            Some("app-[0-9.]+\\.exe"),
            Some("app-[0-9.]+-x64\\.exe"),
        );
        let map = downloader.links("2.4.1", &mut cx).await.unwrap();
        assert!(
            map.get(Arch::X86)
                .unwrap()
                .ends_with("/v2.4.1/app-2.4.1.exe")
        );
        assert!(
            map.get(Arch::X86_64)
                .unwrap()
                .ends_with("/v2.4.1/app-2.4.1-x64.exe")
        );
    }

    #[tokio::test]
    async fn missing_architecture_asset_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/geek1011/app/releases/latest")
            .with_body(RELEASE_PAGE)
            .create_async()
            .await;

        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);
        let downloader =
            release_links_at(&server.url(), "geek1011/app", Some("nothing-like-this"), None);
        assert!(matches!(
            downloader.links("2.4.1", &mut cx).await,
            Err(ExtractError::MissingAsset(Arch::X86))
        ));
    }

    #[tokio::test]
    async fn page_without_releases_reports_no_assets() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/x/empty/releases/latest")
            .with_body("<html><body>no releases yet</body></html>")
            .create_async()
            .await;

        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);
        let downloader = release_links_at(&server.url(), "x/empty", None, Some(".*\\.msi"));
        assert!(matches!(
            downloader.links("1.0", &mut cx).await,
            Err(ExtractError::NoAssets)
        ));
    }
}
