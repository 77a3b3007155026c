//! Extractors that run a pattern over the raw text of a page.

use async_trait::async_trait;
use regex::Regex;
use regup_schema::{Arch, LinkMap};

use crate::context::RuleContext;
use crate::error::{ExtractError, Target};
use crate::extract::{capture_one, resolve, template};
use crate::rule::{Downloader, Versioner};

/// Extracts the version as the single capture group of `pattern` in the
/// text of the page at `url`.
///
/// # Panics
/// Panics if `pattern` is invalid or does not have exactly one capture
/// group.
pub fn version(url: impl Into<String>, pattern: &str) -> RegexpVersion {
    let pattern = super::re(pattern);
    assert!(
        pattern.captures_len() == 2,
        "version pattern needs exactly one capture group"
    );
    RegexpVersion {
        url: url.into(),
        pattern,
    }
}

/// Versioner returned by [`version`].
#[derive(Debug)]
pub struct RegexpVersion {
    url: String,
    pattern: Regex,
}

#[async_trait]
impl Versioner for RegexpVersion {
    async fn version(&self, cx: &mut RuleContext<'_>) -> Result<String, ExtractError> {
        let body = cx.page(&self.url).await?;
        Ok(capture_one(&self.pattern, &body, Target::Version)?.to_string())
    }
}

/// Extracts download links as the single capture group of per-architecture
/// patterns in the text of the page at `url`, resolving relative captures
/// against it.
///
/// Patterns may reference the extracted version through the placeholders
/// accepted by [`template::links`]; substituted values are regex-escaped and
/// the pattern is compiled per call.
///
/// # Panics
/// Panics if both patterns are `None`, or if a pattern's fixed part has
/// invalid syntax.
pub fn links(url: impl Into<String>, x86: Option<&str>, x86_64: Option<&str>) -> RegexpLinks {
    assert!(
        x86.is_some() || x86_64.is_some(),
        "at least one architecture pattern is required"
    );
    // Substituted values are escaped, so syntax errors are independent of
    // the version; expanding with a fixed one validates the fixed part now.
    for pattern in [x86, x86_64].into_iter().flatten() {
        let expanded = template::expand_escaped(pattern, "0.0");
        if let Err(e) = Regex::new(&expanded) {
            panic!("invalid pattern {pattern:?}: {e}");
        }
    }
    RegexpLinks {
        url: url.into(),
        x86: x86.map(str::to_string),
        x86_64: x86_64.map(str::to_string),
    }
}

/// Downloader returned by [`links`].
#[derive(Debug)]
pub struct RegexpLinks {
    url: String,
    x86: Option<String>,
    x86_64: Option<String>,
}

impl RegexpLinks {
    fn extract(
        &self,
        body: &str,
        pattern: &str,
        version: &str,
        arch: Arch,
    ) -> Result<String, ExtractError> {
        let target = Target::Link(arch);
        let expanded = template::expand_escaped(pattern, version);
        let re =
            Regex::new(&expanded).map_err(|e| ExtractError::BadPattern(e.to_string()))?;
        let link = capture_one(&re, body, target)?;
        resolve(&self.url, link)
    }
}

#[async_trait]
impl Downloader for RegexpLinks {
    async fn links(
        &self,
        version: &str,
        cx: &mut RuleContext<'_>,
    ) -> Result<LinkMap, ExtractError> {
        let body = cx.page(&self.url).await?;
        let mut links = LinkMap::new();
        if let Some(pattern) = &self.x86 {
            links.insert(Arch::X86, self.extract(&body, pattern, version, Arch::X86)?);
        }
        if let Some(pattern) = &self.x86_64 {
            links.insert(
                Arch::X86_64,
                self.extract(&body, pattern, version, Arch::X86_64)?,
            );
        }
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Fetcher;

    #[tokio::test]
    async fn version_captures_from_page_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/download.html")
            .with_body("<b>Download 7-Zip 18.06 (2018-12-30) for Windows</b>")
            .create_async()
            .await;

        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);
        let versioner = version(
            format!("{}/download.html", server.url()),
            "Download 7-Zip ([0-9.]+)",
        );
        assert_eq!(versioner.version(&mut cx).await.unwrap(), "18.06");
    }

    #[tokio::test]
    async fn version_errors_when_pattern_misses() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/page")
            .with_body("nothing to see")
            .create_async()
            .await;

        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);
        let versioner = version(format!("{}/page", server.url()), "release ([0-9.]+)");
        assert!(matches!(
            versioner.version(&mut cx).await,
            Err(ExtractError::NoRegexMatch(Target::Version))
        ));
    }

    #[test]
    #[should_panic(expected = "exactly one capture group")]
    fn version_rejects_multi_group_patterns() {
        let _ = version("https://example.com", "(a)(b)");
    }

    #[tokio::test]
    async fn links_substitute_version_and_resolve_relative_captures() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/files.html")
            .with_body(r#"<a href="/dl/app-1.2.3.exe">get</a> <a href="/dl/app-1.2.3-x64.exe">get</a>"#)
            .create_async()
            .await;

        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);
        let downloader = links(
            format!("{}/files.html", server.url()),
            Some("\"(/dl/app-{version}\\.exe)\""),
            Some("\"(/dl/app-{version}-x64\\.exe)\""),
        );
        let map = downloader.links("1.2.3", &mut cx).await.unwrap();
        assert_eq!(
            map.get(Arch::X86),
            Some(format!("{}/dl/app-1.2.3.exe", server.url()).as_str())
        );
        assert_eq!(
            map.get(Arch::X86_64),
            Some(format!("{}/dl/app-1.2.3-x64.exe", server.url()).as_str())
        );
    }

    #[tokio::test]
    async fn substituted_version_is_escaped_literally() {
        let mut server = mockito::Server::new_async().await;
        // "1x2x3" would match "1.2.3" if dots were left as metacharacters.
        server
            .mock("GET", "/files.html")
            .with_body(r#"<a href="/dl/app-1x2x3.exe">get</a>"#)
            .create_async()
            .await;

        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);
        let downloader = links(
            format!("{}/files.html", server.url()),
            Some("\"(/dl/app-{version}\\.exe)\""),
            None,
        );
        assert!(matches!(
            downloader.links("1.2.3", &mut cx).await,
            Err(ExtractError::NoRegexMatch(Target::Link(Arch::X86)))
        ));
    }

    #[test]
    #[should_panic(expected = "invalid pattern")]
    fn links_rejects_broken_fixed_parts_up_front() {
        let _ = links("https://example.com", Some("([unclosed-{version}"), None);
    }
}
