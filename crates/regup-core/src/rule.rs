//! Rules pair a version extractor with a download extractor, keyed by
//! package name in a rule set.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use regup_schema::LinkMap;

use crate::context::RuleContext;
use crate::error::ExtractError;

/// Produces the latest known version string for a package.
#[async_trait]
pub trait Versioner: Send + Sync {
    /// Extracts the latest version.
    async fn version(&self, cx: &mut RuleContext<'_>) -> Result<String, ExtractError>;
}

/// Produces architecture-keyed download URLs for a given version.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Extracts the download links for `version`.
    async fn links(
        &self,
        version: &str,
        cx: &mut RuleContext<'_>,
    ) -> Result<LinkMap, ExtractError>;
}

/// The versioner/downloader pair registered for one package.
pub struct Rule {
    version: Box<dyn Versioner>,
    download: Box<dyn Downloader>,
}

impl Rule {
    /// Pairs a versioner with a downloader.
    pub fn new(version: impl Versioner + 'static, download: impl Downloader + 'static) -> Self {
        Self {
            version: Box::new(version),
            download: Box::new(download),
        }
    }

    /// The package's version extractor.
    pub fn versioner(&self) -> &dyn Versioner {
        self.version.as_ref()
    }

    /// The package's download extractor.
    pub fn downloader(&self) -> &dyn Downloader {
        self.download.as_ref()
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").finish_non_exhaustive()
    }
}

/// An immutable table of rules keyed by package name.
///
/// The table is built once at startup; registering the same package twice is
/// a configuration mistake and panics.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: BTreeMap<String, Rule>,
}

impl RuleSet {
    /// An empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule for `package`.
    ///
    /// # Panics
    /// Panics if a rule is already registered for `package`.
    pub fn add(&mut self, package: impl Into<String>, rule: Rule) {
        let package = package.into();
        assert!(
            !self.rules.contains_key(&package),
            "rule for {package} already registered"
        );
        self.rules.insert(package, rule);
    }

    /// The rule for `package`, if one is registered.
    pub fn get(&self, package: &str) -> Option<&Rule> {
        self.rules.get(package)
    }

    /// Whether a rule exists for `package`.
    pub fn contains(&self, package: &str) -> bool {
        self.rules.contains_key(package)
    }

    /// Registered package names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{latest, template};

    fn dummy_rule() -> Rule {
        Rule::new(
            latest::version(),
            template::links(Some("https://example.com/setup.exe"), None),
        )
    }

    #[test]
    fn lookup_and_names() {
        let mut rules = RuleSet::new();
        rules.add("zpackage", dummy_rule());
        rules.add("apackage", dummy_rule());

        assert!(rules.contains("zpackage"));
        assert!(!rules.contains("missing"));
        assert!(rules.get("apackage").is_some());
        assert_eq!(rules.len(), 2);
        let names: Vec<&str> = rules.names().collect();
        assert_eq!(names, ["apackage", "zpackage"]);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn duplicate_registration_panics() {
        let mut rules = RuleSet::new();
        rules.add("7zip", dummy_rule());
        rules.add("7zip", dummy_rule());
    }

    #[tokio::test]
    async fn rule_exposes_both_halves() {
        let fetcher = crate::fetch::Fetcher::new().unwrap();
        let mut cx = RuleContext::new(&fetcher);
        let rule = dummy_rule();

        let version = rule.versioner().version(&mut cx).await.unwrap();
        assert_eq!(version, "latest");
        let links = rule.downloader().links(&version, &mut cx).await.unwrap();
        assert_eq!(
            links.get(regup_schema::Arch::X86),
            Some("https://example.com/setup.exe")
        );
    }
}
