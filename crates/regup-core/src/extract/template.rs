//! Download links built by substituting the version into URL templates.

use async_trait::async_trait;
use regup_schema::{Arch, LinkMap};

use crate::context::RuleContext;
use crate::error::ExtractError;
use crate::rule::Downloader;

const RAW: &str = "{version}";
const UNDERSCORES: &str = "{version-underscores}";
const DASHES: &str = "{version-dashes}";
const DIGITS: &str = "{version-digits}";
const MAJOR: &str = "{version-major}";

/// Substitutes every placeholder in `template` with the matching rendering
/// of `version`.
pub(crate) fn expand(template: &str, version: &str) -> String {
    expand_with(template, version, false)
}

/// Like [`expand`], but regex-escapes each substituted value so it can be
/// embedded in a pattern.
pub(crate) fn expand_escaped(template: &str, version: &str) -> String {
    expand_with(template, version, true)
}

fn expand_with(template: &str, version: &str, escape: bool) -> String {
    let major = version.split('.').next().unwrap_or(version);
    let renderings = [
        (RAW, version.to_string()),
        (UNDERSCORES, version.replace('.', "_")),
        (DASHES, version.replace('.', "-")),
        (DIGITS, version.replace('.', "")),
        (MAJOR, major.to_string()),
    ];
    let mut out = template.to_string();
    for (placeholder, value) in renderings {
        let value = if escape { regex::escape(&value) } else { value };
        out = out.replace(placeholder, &value);
    }
    out
}

/// Builds download links by substituting the extracted version into one URL
/// template per architecture. No network access happens.
///
/// Placeholders: `{version}` (as extracted), `{version-underscores}` (dots
/// to underscores), `{version-dashes}` (dots to dashes), `{version-digits}`
/// (dots stripped), `{version-major}` (leading dot-separated component).
///
/// # Panics
/// Panics if both templates are `None`.
pub fn links(x86: Option<&str>, x86_64: Option<&str>) -> TemplateLinks {
    assert!(
        x86.is_some() || x86_64.is_some(),
        "at least one architecture template is required"
    );
    TemplateLinks {
        x86: x86.map(str::to_string),
        x86_64: x86_64.map(str::to_string),
    }
}

/// Downloader returned by [`links`].
#[derive(Debug)]
pub struct TemplateLinks {
    x86: Option<String>,
    x86_64: Option<String>,
}

#[async_trait]
impl Downloader for TemplateLinks {
    async fn links(
        &self,
        version: &str,
        _cx: &mut RuleContext<'_>,
    ) -> Result<LinkMap, ExtractError> {
        let mut links = LinkMap::new();
        if let Some(template) = &self.x86 {
            links.insert(Arch::X86, expand(template, version));
        }
        if let Some(template) = &self.x86_64 {
            links.insert(Arch::X86_64, expand(template, version));
        }
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Fetcher;

    #[test]
    fn every_placeholder_renders_from_one_version() {
        let version = "1.22.3";
        assert_eq!(expand("a/{version}/b", version), "a/1.22.3/b");
        assert_eq!(expand("a/{version-underscores}/b", version), "a/1_22_3/b");
        assert_eq!(expand("a/{version-dashes}/b", version), "a/1-22-3/b");
        assert_eq!(expand("a/{version-digits}/b", version), "a/1223/b");
        assert_eq!(expand("a/{version-major}/b", version), "a/1/b");
    }

    #[test]
    fn placeholders_combine_in_one_template() {
        assert_eq!(
            expand(
                "https://host/{version-major}/setup-{version}-{version-digits}.exe",
                "2.4.1"
            ),
            "https://host/2/setup-2.4.1-241.exe"
        );
    }

    #[test]
    fn major_of_single_component_version_is_itself() {
        assert_eq!(expand("{version-major}", "2019"), "2019");
    }

    #[test]
    fn escaped_expansion_quotes_metacharacters() {
        assert_eq!(expand_escaped("x{version}y", "1.2"), "x1\\.2y");
        assert_eq!(expand_escaped("x{version}y", "1+2"), "x1\\+2y");
    }

    #[tokio::test]
    async fn links_fills_only_requested_arches() {
        let fetcher = Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);

        let both = links(
            Some("https://host/a-{version}.exe"),
            Some("https://host/a-{version}-x64.exe"),
        );
        let map = Downloader::links(&both, "3.1", &mut cx).await.unwrap();
        assert_eq!(map.get(Arch::X86), Some("https://host/a-3.1.exe"));
        assert_eq!(map.get(Arch::X86_64), Some("https://host/a-3.1-x64.exe"));

        let x64_only = links(None, Some("https://host/b.msi"));
        let map = Downloader::links(&x64_only, "9", &mut cx).await.unwrap();
        assert_eq!(map.get(Arch::X86), None);
        assert_eq!(map.get(Arch::X86_64), Some("https://host/b.msi"));
    }

    #[test]
    #[should_panic(expected = "at least one architecture")]
    fn links_requires_an_architecture() {
        let _ = links(None, None);
    }
}
