//! Fixed-version extractors for packages without comparable versions.

use async_trait::async_trait;

use crate::context::RuleContext;
use crate::error::ExtractError;
use crate::rule::Versioner;

/// The version sentinel stored for packages whose vendor publishes no
/// comparable version. The reconciliation loop compares links instead of
/// versions for entries carrying exactly this value.
pub const LATEST: &str = "latest";

/// Always reports the [`LATEST`] sentinel.
pub fn version() -> FixedVersion {
    FixedVersion {
        version: LATEST.to_string(),
    }
}

/// Reports [`LATEST`] with `suffix` appended (for example `latest-beta`).
///
/// Suffixed values are ordinary versions to the reconciliation loop, not
/// the sentinel.
pub fn version_suffixed(suffix: &str) -> FixedVersion {
    FixedVersion {
        version: format!("{LATEST}{suffix}"),
    }
}

/// Versioner returned by [`version`] and [`version_suffixed`].
#[derive(Debug)]
pub struct FixedVersion {
    version: String,
}

#[async_trait]
impl Versioner for FixedVersion {
    async fn version(&self, _cx: &mut RuleContext<'_>) -> Result<String, ExtractError> {
        Ok(self.version.clone())
    }
}
