//! Extractor combinators.
//!
//! Each submodule provides constructors returning [`Versioner`]s and
//! [`Downloader`]s that rules compose declaratively. Configuration mistakes
//! (malformed patterns or selectors, no architecture requested) panic at
//! construction time, before any reconciliation starts; everything observed
//! while extracting surfaces as an [`crate::error::ExtractError`] instead.
//!
//! [`Versioner`]: crate::rule::Versioner
//! [`Downloader`]: crate::rule::Downloader

pub mod appveyor;
pub mod github;
pub mod html;
pub mod latest;
pub mod regexp;
pub mod template;
pub mod wrap;

use regex::Regex;

use crate::error::{ExtractError, Target};

/// Compiles a pattern, panicking on invalid syntax.
///
/// Rule-table patterns are static configuration, so a bad one should stop
/// the program rather than show up as a per-package error.
///
/// # Panics
/// Panics if `pattern` is not a valid regular expression.
pub fn re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid pattern {pattern:?}: {e}"))
}

/// Parses a CSS selector, panicking on invalid syntax.
pub(crate) fn sel(selector: &str) -> scraper::Selector {
    scraper::Selector::parse(selector)
        .unwrap_or_else(|e| panic!("invalid selector {selector:?}: {e}"))
}

/// The first capture group of `re` in `text`.
///
/// The pattern must have exactly one capture group and that group must
/// match non-empty text; anything else is a single
/// [`ExtractError::NoRegexMatch`], since all three cases mean the pattern
/// does not describe the page.
pub(crate) fn capture_one<'t>(
    re: &Regex,
    text: &'t str,
    target: Target,
) -> Result<&'t str, ExtractError> {
    if re.captures_len() != 2 {
        return Err(ExtractError::NoRegexMatch(target));
    }
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .ok_or(ExtractError::NoRegexMatch(target))
}

/// Resolves `link` against `base`, returning an absolute URL string.
///
/// Absolute links pass through unchanged apart from normalization.
pub(crate) fn resolve(base: &str, link: &str) -> Result<String, ExtractError> {
    let base_url = url::Url::parse(base).map_err(|e| ExtractError::Resolve {
        link: link.to_string(),
        message: e.to_string(),
    })?;
    let resolved = base_url.join(link).map_err(|e| ExtractError::Resolve {
        link: link.to_string(),
        message: e.to_string(),
    })?;
    Ok(resolved.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_one_returns_the_group() {
        let re = re("Download 7-Zip ([0-9.]+)");
        let text = "Download 7-Zip 18.06 (2018-12-30) for Windows";
        assert_eq!(
            capture_one(&re, text, Target::Version).unwrap(),
            "18.06"
        );
    }

    #[test]
    fn capture_one_rejects_no_match() {
        let re = re("version ([0-9.]+)");
        assert!(matches!(
            capture_one(&re, "no numbers here", Target::Version),
            Err(ExtractError::NoRegexMatch(Target::Version))
        ));
    }

    #[test]
    fn capture_one_rejects_empty_group() {
        let re = re("v([0-9]*)");
        assert!(matches!(
            capture_one(&re, "vNext", Target::Version),
            Err(ExtractError::NoRegexMatch(Target::Version))
        ));
    }

    #[test]
    fn capture_one_requires_exactly_one_group() {
        let none = re("version [0-9.]+");
        assert!(capture_one(&none, "version 1.2", Target::Version).is_err());

        let two = re("(version) ([0-9.]+)");
        assert!(capture_one(&two, "version 1.2", Target::Version).is_err());
    }

    #[test]
    #[should_panic(expected = "invalid pattern")]
    fn re_panics_on_bad_syntax() {
        let _ = re("([unclosed");
    }

    #[test]
    fn resolve_handles_relative_and_absolute_links() {
        let cases = [
            ("https://www.github.com", "sdf", "https://www.github.com/sdf"),
            ("https://www.github.com/", "sdf", "https://www.github.com/sdf"),
            ("https://www.github.com/a/b", "/sdf", "https://www.github.com/sdf"),
            ("https://www.github.com/a/b", "sdf", "https://www.github.com/a/sdf"),
            (
                "https://www.github.com",
                "https://example.com/x.msi",
                "https://example.com/x.msi",
            ),
        ];
        for (base, link, want) in cases {
            assert_eq!(resolve(base, link).unwrap(), want, "base {base:?} link {link:?}");
        }
    }

    #[test]
    fn resolve_rejects_garbage_bases() {
        assert!(matches!(
            resolve("not a url", "x"),
            Err(ExtractError::Resolve { .. })
        ));
    }
}
