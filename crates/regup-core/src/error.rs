//! Error types shared by the extractors and the reconciliation loop.

use std::fmt;

use regup_schema::Arch;
use thiserror::Error;

use crate::fetch::FetchError;

/// What an extractor was producing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The package's version string.
    Version,
    /// The download link for one architecture.
    Link(Arch),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version => write!(f, "version"),
            Self::Link(arch) => write!(f, "{arch} link"),
        }
    }
}

/// A failure while extracting a version or download links.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The underlying HTTP fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The pattern found no match with a single non-empty capture group.
    #[error("no match with a single non-empty capture group for the {0} pattern")]
    NoRegexMatch(Target),

    /// The CSS selector matched no elements.
    #[error("no match for the {0} selector")]
    NoSelectorMatch(Target),

    /// Every element the selector matched had blank text or a blank
    /// attribute.
    #[error("empty attribute for the {0} selector")]
    EmptyAttribute(Target),

    /// A link could not be resolved against its page URL.
    #[error("could not resolve url {link:?}: {message}")]
    Resolve {
        /// The link as extracted from the page.
        link: String,
        /// Parser detail.
        message: String,
    },

    /// A release asset carried no usable href or file name.
    #[error("could not extract a file name from a release asset")]
    AssetHref,

    /// The release or build listed no usable assets at all.
    #[error("could not extract list of assets")]
    NoAssets,

    /// No asset matched the pattern for the requested architecture.
    #[error("no asset matched for {0}")]
    MissingAsset(Arch),

    /// The API response did not contain a version.
    #[error("no version in response")]
    MissingVersion,

    /// A download pattern failed to compile after version substitution.
    #[error("invalid download pattern after version substitution: {0}")]
    BadPattern(String),
}

/// A rule produced output that violates the required shape.
///
/// These usually mean the extraction pattern matched the wrong text, not
/// that the vendor page is down.
#[derive(Debug, Error)]
pub enum InvariantError {
    /// The extracted version was empty.
    #[error("extracted version is empty")]
    EmptyVersion,

    /// The extracted version had surrounding whitespace.
    #[error("extracted version {0:?} has surrounding whitespace")]
    UntrimmedVersion(String),

    /// The extracted version ended with a dot.
    #[error("extracted version {0:?} ends with a dot")]
    TrailingDot(String),

    /// The downloader produced no links at all.
    #[error("no download links extracted")]
    NoLinks,

    /// An extracted link was blank.
    #[error("blank {0} link")]
    BlankLink(Arch),

    /// An extracted link did not start with a URI scheme.
    #[error("{arch} link {link:?} does not start with a URI scheme")]
    MissingScheme {
        /// The architecture the link was extracted for.
        arch: Arch,
        /// The offending link.
        link: String,
    },
}

/// Why a package landed in the errored bucket.
#[derive(Debug, Error)]
pub enum PackageError {
    /// Version extraction failed.
    #[error("extracting version: {0}")]
    Version(#[source] ExtractError),

    /// Download extraction failed.
    #[error("extracting download links: {0}")]
    Download(#[source] ExtractError),

    /// The rule's output violated an invariant.
    #[error(transparent)]
    Invariant(#[from] InvariantError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_display() {
        assert_eq!(Target::Version.to_string(), "version");
        assert_eq!(Target::Link(Arch::X86).to_string(), "x86 link");
        assert_eq!(Target::Link(Arch::X86_64).to_string(), "x86_64 link");
    }

    #[test]
    fn package_error_shows_stage() {
        let err = PackageError::Version(ExtractError::NoRegexMatch(Target::Version));
        assert!(err.to_string().starts_with("extracting version:"));

        let err = PackageError::Download(ExtractError::MissingAsset(Arch::X86_64));
        assert_eq!(
            err.to_string(),
            "extracting download links: no asset matched for x86_64"
        );
    }

    #[test]
    fn invariant_error_is_transparent() {
        let err = PackageError::from(InvariantError::NoLinks);
        assert_eq!(err.to_string(), "no download links extracted");
    }
}
