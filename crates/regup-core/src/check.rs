//! Output-shape validation applied after each extraction step.
//!
//! An extractor that matched the wrong text tends to produce output that is
//! empty, padded, or truncated; these checks turn that into a per-package
//! error instead of a silently corrupted registry entry.

use regup_schema::LinkMap;

use crate::error::InvariantError;

/// Validates an extracted version string.
///
/// Versions must be non-empty, free of surrounding whitespace, and must not
/// end with a dot.
///
/// # Errors
/// Returns the first violated [`InvariantError`].
pub fn version(version: &str) -> Result<(), InvariantError> {
    if version.is_empty() {
        return Err(InvariantError::EmptyVersion);
    }
    if version.trim() != version {
        return Err(InvariantError::UntrimmedVersion(version.to_string()));
    }
    if version.ends_with('.') {
        return Err(InvariantError::TrailingDot(version.to_string()));
    }
    Ok(())
}

/// Validates an extracted link map.
///
/// At least one architecture must have a link, and every present link must
/// be non-blank and start with a URI scheme.
///
/// # Errors
/// Returns the first violated [`InvariantError`].
pub fn links(links: &LinkMap) -> Result<(), InvariantError> {
    if links.is_empty() {
        return Err(InvariantError::NoLinks);
    }
    for (arch, link) in links.iter() {
        if link.trim().is_empty() {
            return Err(InvariantError::BlankLink(arch));
        }
        if !has_scheme(link) {
            return Err(InvariantError::MissingScheme {
                arch,
                link: link.to_string(),
            });
        }
    }
    Ok(())
}

fn has_scheme(link: &str) -> bool {
    link.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}
