//! CSS-selector extractors over fetched HTML.
//!
//! The parsed document is not `Send`, so pages are parsed and queried inside
//! synchronous helpers after the fetch completes, never across an await.

use async_trait::async_trait;
use regex::Regex;
use regup_schema::{Arch, LinkMap};
use scraper::{ElementRef, Html, Selector};

use crate::context::RuleContext;
use crate::error::{ExtractError, Target};
use crate::extract::{capture_one, resolve, sel};
use crate::rule::{Downloader, Versioner};

/// Where to read a matched element's value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr {
    /// The element's text content, trimmed.
    Text,
    /// A named attribute, trimmed.
    Named(&'static str),
}

impl Attr {
    fn read(self, element: ElementRef<'_>) -> String {
        match self {
            Self::Text => element.text().collect::<String>().trim().to_string(),
            Self::Named(name) => element
                .value()
                .attr(name)
                .unwrap_or("")
                .trim()
                .to_string(),
        }
    }
}

/// Tries every element `selector` matches, in document order, until `accept`
/// produces a value. Zero matches is an error; if every match is rejected,
/// the last rejection is reported.
fn select_value(
    document: &Html,
    selector: &Selector,
    attr: Attr,
    target: Target,
    mut accept: impl FnMut(String) -> Result<String, ExtractError>,
) -> Result<String, ExtractError> {
    let mut last = ExtractError::NoSelectorMatch(target);
    for element in document.select(selector) {
        let value = attr.read(element);
        if value.is_empty() {
            last = ExtractError::EmptyAttribute(target);
            continue;
        }
        match accept(value) {
            Ok(found) => return Ok(found),
            Err(e) => last = e,
        }
    }
    Err(last)
}

/// Extracts the version from the page at `url`: reads `attr` from elements
/// matching `selector` and, when `pattern` is given, refines the value
/// through its single capture group.
///
/// # Panics
/// Panics if the selector or pattern is invalid.
pub fn version(
    url: impl Into<String>,
    selector: &str,
    attr: Attr,
    pattern: Option<&str>,
) -> HtmlVersion {
    HtmlVersion {
        url: url.into(),
        selector: sel(selector),
        attr,
        pattern: pattern.map(super::re),
    }
}

/// Versioner returned by [`version`].
#[derive(Debug)]
pub struct HtmlVersion {
    url: String,
    selector: Selector,
    attr: Attr,
    pattern: Option<Regex>,
}

impl HtmlVersion {
    fn extract(&self, body: &str) -> Result<String, ExtractError> {
        let document = Html::parse_document(body);
        select_value(
            &document,
            &self.selector,
            self.attr,
            Target::Version,
            |value| match &self.pattern {
                Some(re) => Ok(capture_one(re, &value, Target::Version)?.to_string()),
                None => Ok(value),
            },
        )
    }
}

#[async_trait]
impl Versioner for HtmlVersion {
    async fn version(&self, cx: &mut RuleContext<'_>) -> Result<String, ExtractError> {
        let body = cx.page(&self.url).await?;
        self.extract(&body)
    }
}

/// One architecture's link query: a selector, the attribute to read, and an
/// optional refinement pattern applied to the resolved URL.
#[derive(Debug)]
pub struct LinkQuery {
    selector: Selector,
    attr: Attr,
    pattern: Option<Regex>,
}

impl LinkQuery {
    /// A query reading `attr` from the selector's matches.
    ///
    /// # Panics
    /// Panics if the selector is invalid.
    pub fn new(selector: &str, attr: Attr) -> Self {
        Self {
            selector: sel(selector),
            attr,
            pattern: None,
        }
    }

    /// A query reading `href` from the selector's matches.
    ///
    /// # Panics
    /// Panics if the selector is invalid.
    pub fn href(selector: &str) -> Self {
        Self::new(selector, Attr::Named("href"))
    }

    /// Replaces the final URL with the single capture group of `pattern`
    /// applied to it.
    ///
    /// # Panics
    /// Panics if the pattern is invalid.
    #[must_use]
    pub fn refine(mut self, pattern: &str) -> Self {
        self.pattern = Some(super::re(pattern));
        self
    }
}

/// Extracts download links from the page at `url`, one query per
/// architecture. Matched values are resolved against the page URL before any
/// refinement pattern runs.
///
/// # Panics
/// Panics if both queries are `None`.
pub fn links(
    url: impl Into<String>,
    x86: Option<LinkQuery>,
    x86_64: Option<LinkQuery>,
) -> HtmlLinks {
    assert!(
        x86.is_some() || x86_64.is_some(),
        "at least one architecture query is required"
    );
    HtmlLinks {
        url: url.into(),
        x86,
        x86_64,
    }
}

/// Shorthand for [`links`] with plain `href` queries.
///
/// # Panics
/// Panics if a selector is invalid.
pub fn href_links(url: impl Into<String>, x86: &str, x86_64: Option<&str>) -> HtmlLinks {
    links(url, Some(LinkQuery::href(x86)), x86_64.map(LinkQuery::href))
}

/// Downloader returned by [`links`].
#[derive(Debug)]
pub struct HtmlLinks {
    url: String,
    x86: Option<LinkQuery>,
    x86_64: Option<LinkQuery>,
}

impl HtmlLinks {
    fn extract_one(
        &self,
        document: &Html,
        query: &LinkQuery,
        arch: Arch,
    ) -> Result<String, ExtractError> {
        let target = Target::Link(arch);
        select_value(document, &query.selector, query.attr, target, |value| {
            let resolved = resolve(&self.url, &value)?;
            match &query.pattern {
                Some(re) => Ok(capture_one(re, &resolved, target)?.to_string()),
                None => Ok(resolved),
            }
        })
    }
}

#[async_trait]
impl Downloader for HtmlLinks {
    async fn links(
        &self,
        _version: &str,
        cx: &mut RuleContext<'_>,
    ) -> Result<LinkMap, ExtractError> {
        let body = cx.page(&self.url).await?;
        let document = Html::parse_document(&body);
        let mut links = LinkMap::new();
        if let Some(query) = &self.x86 {
            links.insert(Arch::X86, self.extract_one(&document, query, Arch::X86)?);
        }
        if let Some(query) = &self.x86_64 {
            links.insert(
                Arch::X86_64,
                self.extract_one(&document, query, Arch::X86_64)?,
            );
        }
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Fetcher;

    async fn serve(body: &str) -> (mockito::ServerGuard, String) {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/page")
            .with_body(body)
            .create_async()
            .await;
        let url = format!("{}/page", server.url());
        (server, url)
    }

    #[tokio::test]
    async fn version_reads_element_text() {
        let (_server, url) =
            serve(r#"<div class="release"><span id="ver"> 4.3.1 </span></div>"#).await;
        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);

        let versioner = version(&url, "#ver", Attr::Text, None);
        assert_eq!(versioner.version(&mut cx).await.unwrap(), "4.3.1");
    }

    #[tokio::test]
    async fn version_reads_named_attribute_and_refines() {
        let (_server, url) =
            serve(r#"<meta itemprop="softwareVersion" content="Version 1.4.15">"#).await;
        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);

        let versioner = version(
            &url,
            "meta[itemprop='softwareVersion']",
            Attr::Named("content"),
            Some("([0-9.]+)"),
        );
        assert_eq!(versioner.version(&mut cx).await.unwrap(), "1.4.15");
    }

    #[tokio::test]
    async fn version_errors_when_selector_matches_nothing() {
        let (_server, url) = serve("<p>hello</p>").await;
        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);

        let versioner = version(&url, "#missing", Attr::Text, None);
        assert!(matches!(
            versioner.version(&mut cx).await,
            Err(ExtractError::NoSelectorMatch(Target::Version))
        ));
    }

    #[tokio::test]
    async fn version_errors_when_every_match_is_blank() {
        let (_server, url) = serve(r#"<span class="v"></span><span class="v">  </span>"#).await;
        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);

        let versioner = version(&url, ".v", Attr::Text, None);
        assert!(matches!(
            versioner.version(&mut cx).await,
            Err(ExtractError::EmptyAttribute(Target::Version))
        ));
    }

    #[tokio::test]
    async fn later_matches_are_tried_until_one_satisfies() {
        let (_server, url) = serve(concat!(
            r#"<a class="dl" href="">broken</a>"#,
            r#"<a class="dl" href="/beta/app.exe">beta</a>"#,
            r#"<a class="dl" href="/stable/app-2.0.exe">stable</a>"#,
        ))
        .await;
        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);

        let downloader = links(
            &url,
            Some(LinkQuery::href("a.dl").refine("(http.+/stable/.+\\.exe)")),
            None,
        );
        let map = downloader.links("2.0", &mut cx).await.unwrap();
        let link = map.get(Arch::X86).unwrap();
        assert!(link.ends_with("/stable/app-2.0.exe"), "got {link}");
    }

    #[tokio::test]
    async fn relative_hrefs_resolve_against_the_page() {
        let (_server, url) = serve(r#"<a id="dl" href="cdbxp_setup_4.5.8.msi">x</a>"#).await;
        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);

        let downloader = href_links(&url, "#dl", None);
        let map = downloader.links("4.5.8", &mut cx).await.unwrap();
        let link = map.get(Arch::X86).unwrap();
        assert!(
            link.starts_with("http") && link.ends_with("/cdbxp_setup_4.5.8.msi"),
            "got {link}"
        );
    }

    #[tokio::test]
    async fn refinement_rejecting_all_matches_reports_the_pattern() {
        let (_server, url) = serve(r#"<a class="dl" href="/app.zip">x</a>"#).await;
        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);

        let downloader = links(
            &url,
            None,
            Some(LinkQuery::href("a.dl").refine("(.+\\.msi)")),
        );
        assert!(matches!(
            downloader.links("1.0", &mut cx).await,
            Err(ExtractError::NoRegexMatch(Target::Link(Arch::X86_64)))
        ));
    }

    #[tokio::test]
    async fn both_arch_queries_fill_the_map() {
        let (_server, url) = serve(concat!(
            r#"<a class="win32" href="/a-x86.exe">32</a>"#,
            r#"<a class="win64" href="/a-x64.exe">64</a>"#,
        ))
        .await;
        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);

        let downloader = href_links(&url, "a.win32", Some("a.win64"));
        let map = downloader.links("1", &mut cx).await.unwrap();
        assert!(map.get(Arch::X86).unwrap().ends_with("/a-x86.exe"));
        assert!(map.get(Arch::X86_64).unwrap().ends_with("/a-x64.exe"));
    }
}
