//! The reconciliation loop: run every rule, compare against the registry,
//! and write back what changed.
//!
//! Each registry entry lands in exactly one bucket per run: updated,
//! unchanged, skipped (not requested), no-rule, or errored. A package error
//! never stops the run and never touches that package's registry entry.

use std::collections::{BTreeMap, BTreeSet};

use regup_schema::{Arch, LinkMap, Package, Registry};
use thiserror::Error;

use crate::check;
use crate::context::RuleContext;
use crate::error::PackageError;
use crate::extract::latest::LATEST;
use crate::fetch::Fetcher;
use crate::rule::{Rule, RuleSet};

/// Options for one update run.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Restrict the run to these packages. Empty means every package in the
    /// registry.
    pub packages: Vec<String>,
    /// Rewrite entries even when the extracted version matches the stored
    /// one.
    pub force: bool,
}

/// A run that could not start.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// A requested package does not exist in the registry.
    #[error("unknown packages requested: {}", .0.join(", "))]
    UnknownPackages(Vec<String>),
}

/// What one run did, bucketed by outcome.
#[derive(Debug, Default)]
pub struct Report {
    /// Packages whose registry entry was rewritten, with the new version.
    pub updated: BTreeMap<String, String>,
    /// Packages already at the extracted version.
    pub unchanged: Vec<String>,
    /// Registry entries with no rule in the table.
    pub no_rule: Vec<String>,
    /// Registry entries outside the requested set.
    pub skipped: Vec<String>,
    /// Packages whose rule failed, with the failure.
    pub errored: BTreeMap<String, PackageError>,
    /// Number of registry entries considered, including skipped ones.
    pub total: usize,
}

impl Report {
    /// Whether any package errored.
    pub fn has_errors(&self) -> bool {
        !self.errored.is_empty()
    }

    /// One-line summary of the run.
    pub fn summary(&self) -> String {
        let percent = if self.total == 0 {
            0.0
        } else {
            self.no_rule.len() as f64 / self.total as f64 * 100.0
        };
        format!(
            "{} updated, {} unchanged, {} norule ({percent:.0}%), {} skipped, {} errored",
            self.updated.len(),
            self.unchanged.len(),
            self.no_rule.len(),
            self.skipped.len(),
            self.errored.len(),
        )
    }
}

enum Outcome {
    Updated(String),
    Unchanged,
}

/// Runs rules against a registry.
#[derive(Debug)]
pub struct Updater<'a> {
    rules: &'a RuleSet,
    fetcher: &'a Fetcher,
}

impl<'a> Updater<'a> {
    /// An updater over `rules` fetching through `fetcher`.
    pub fn new(rules: &'a RuleSet, fetcher: &'a Fetcher) -> Self {
        Self { rules, fetcher }
    }

    /// Reconciles every registry entry and returns the bucketed report.
    ///
    /// Entries are visited in name order. The registry is modified in place;
    /// only entries that end up in the updated bucket are touched.
    ///
    /// # Errors
    /// Returns [`UpdateError::UnknownPackages`] if `options.packages` names
    /// entries the registry does not have; the registry is untouched in that
    /// case.
    pub async fn run(
        &self,
        registry: &mut Registry,
        options: &UpdateOptions,
    ) -> Result<Report, UpdateError> {
        let targets: BTreeSet<&str> = options.packages.iter().map(String::as_str).collect();
        let unknown: Vec<String> = targets
            .iter()
            .filter(|name| !registry.packages.contains_key(**name))
            .map(ToString::to_string)
            .collect();
        if !unknown.is_empty() {
            return Err(UpdateError::UnknownPackages(unknown));
        }

        let names: Vec<String> = registry.packages.keys().cloned().collect();
        let mut report = Report {
            total: names.len(),
            ..Report::default()
        };

        for name in names {
            if !targets.is_empty() && !targets.contains(name.as_str()) {
                report.skipped.push(name);
                continue;
            }
            let Some(rule) = self.rules.get(&name) else {
                tracing::debug!(package = %name, "no rule");
                report.no_rule.push(name);
                continue;
            };
            // Present in `names`, so the entry exists.
            let Some(package) = registry.packages.get_mut(&name) else {
                continue;
            };
            match self.reconcile(&name, package, rule, options.force).await {
                Ok(Outcome::Updated(version)) => {
                    tracing::info!(package = %name, %version, "updated");
                    report.updated.insert(name, version);
                }
                Ok(Outcome::Unchanged) => {
                    tracing::debug!(package = %name, "unchanged");
                    report.unchanged.push(name);
                }
                Err(e) => {
                    tracing::warn!(package = %name, error = %e, "failed");
                    report.errored.insert(name, e);
                }
            }
        }

        Ok(report)
    }

    async fn reconcile(
        &self,
        name: &str,
        package: &mut Package,
        rule: &Rule,
        force: bool,
    ) -> Result<Outcome, PackageError> {
        let mut cx = RuleContext::new(self.fetcher);
        tracing::debug!(package = %name, "extracting version");
        let version = rule
            .versioner()
            .version(&mut cx)
            .await
            .map_err(PackageError::Version)?;
        check::version(&version)?;

        if !force && package.version != LATEST && package.version == version {
            return Ok(Outcome::Unchanged);
        }

        tracing::debug!(package = %name, %version, "extracting download links");
        let mut links = rule
            .downloader()
            .links(&version, &mut cx)
            .await
            .map_err(PackageError::Download)?;
        check::links(&links)?;

        // Sentinel-versioned entries have no version to compare; they are
        // unchanged exactly when the links are, forced or not.
        if package.version == LATEST && stored_links(package) == links {
            return Ok(Outcome::Unchanged);
        }

        package.version = version.clone();
        package.installer.x86 = links.take(Arch::X86);
        package.installer.x86_64 = links.take(Arch::X86_64);
        Ok(Outcome::Updated(version))
    }
}

fn stored_links(package: &Package) -> LinkMap {
    let mut links = LinkMap::new();
    if let Some(url) = &package.installer.x86 {
        links.insert(Arch::X86, url.clone());
    }
    if let Some(url) = &package.installer.x86_64 {
        links.insert(Arch::X86_64, url.clone());
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use regup_schema::Installer;

    use crate::error::{ExtractError, InvariantError, Target};
    use crate::extract::latest;
    use crate::rule::{Downloader, Versioner};

    struct StaticVersion(&'static str);

    #[async_trait]
    impl Versioner for StaticVersion {
        async fn version(&self, _cx: &mut RuleContext<'_>) -> Result<String, ExtractError> {
            Ok(self.0.to_string())
        }
    }

    struct FailVersion;

    #[async_trait]
    impl Versioner for FailVersion {
        async fn version(&self, _cx: &mut RuleContext<'_>) -> Result<String, ExtractError> {
            Err(ExtractError::NoRegexMatch(Target::Version))
        }
    }

    struct StaticLinks(Vec<(Arch, &'static str)>);

    #[async_trait]
    impl Downloader for StaticLinks {
        async fn links(
            &self,
            _version: &str,
            _cx: &mut RuleContext<'_>,
        ) -> Result<LinkMap, ExtractError> {
            Ok(self
                .0
                .iter()
                .map(|(arch, url)| (*arch, (*url).to_string()))
                .collect())
        }
    }

    fn entry(version: &str, x86: Option<&str>, x86_64: Option<&str>) -> Package {
        Package {
            installer: Installer {
                x86: x86.map(str::to_string),
                x86_64: x86_64.map(str::to_string),
                ..Installer::default()
            },
            version: version.to_string(),
        }
    }

    fn registry_with(entries: Vec<(&str, Package)>) -> Registry {
        let mut registry = Registry::new();
        for (name, package) in entries {
            registry.packages.insert(name.to_string(), package);
        }
        registry
    }

    async fn run(
        rules: &RuleSet,
        registry: &mut Registry,
        options: &UpdateOptions,
    ) -> Result<Report, UpdateError> {
        let fetcher = Fetcher::new().unwrap();
        Updater::new(rules, &fetcher).run(registry, options).await
    }

    #[tokio::test]
    async fn unchanged_when_version_matches() {
        let mut rules = RuleSet::new();
        rules.add(
            "app",
            Rule::new(
                StaticVersion("2.0"),
                StaticLinks(vec![(Arch::X86, "https://example.com/new.exe")]),
            ),
        );
        let mut registry = registry_with(vec![(
            "app",
            entry("2.0", Some("https://example.com/old.exe"), None),
        )]);

        let report = run(&rules, &mut registry, &UpdateOptions::default())
            .await
            .unwrap();

        assert_eq!(report.unchanged, vec!["app"]);
        assert!(report.updated.is_empty());
        // The stored link survives; the downloader never ran.
        assert_eq!(
            registry.packages["app"].installer.x86.as_deref(),
            Some("https://example.com/old.exe")
        );
    }

    #[tokio::test]
    async fn updates_when_version_differs() {
        let mut rules = RuleSet::new();
        rules.add(
            "app",
            Rule::new(
                StaticVersion("2.1"),
                StaticLinks(vec![
                    (Arch::X86, "https://example.com/app-2.1.exe"),
                    (Arch::X86_64, "https://example.com/app-2.1-x64.exe"),
                ]),
            ),
        );
        let mut registry = registry_with(vec![(
            "app",
            entry("2.0", Some("https://example.com/app-2.0.exe"), None),
        )]);

        let report = run(&rules, &mut registry, &UpdateOptions::default())
            .await
            .unwrap();

        assert_eq!(report.updated.get("app").map(String::as_str), Some("2.1"));
        let package = &registry.packages["app"];
        assert_eq!(package.version, "2.1");
        assert_eq!(
            package.installer.x86.as_deref(),
            Some("https://example.com/app-2.1.exe")
        );
        assert_eq!(
            package.installer.x86_64.as_deref(),
            Some("https://example.com/app-2.1-x64.exe")
        );
    }

    #[tokio::test]
    async fn force_rewrites_matching_versions() {
        let mut rules = RuleSet::new();
        rules.add(
            "app",
            Rule::new(
                StaticVersion("2.0"),
                StaticLinks(vec![(Arch::X86, "https://example.com/new.exe")]),
            ),
        );
        let mut registry = registry_with(vec![(
            "app",
            entry("2.0", Some("https://example.com/old.exe"), None),
        )]);

        let options = UpdateOptions {
            force: true,
            ..UpdateOptions::default()
        };
        let report = run(&rules, &mut registry, &options).await.unwrap();

        assert_eq!(report.updated.get("app").map(String::as_str), Some("2.0"));
        assert_eq!(
            registry.packages["app"].installer.x86.as_deref(),
            Some("https://example.com/new.exe")
        );
    }

    #[tokio::test]
    async fn latest_entries_compare_links_not_versions() {
        let mut rules = RuleSet::new();
        rules.add(
            "same",
            Rule::new(
                latest::version(),
                StaticLinks(vec![(Arch::X86, "https://example.com/same.exe")]),
            ),
        );
        rules.add(
            "moved",
            Rule::new(
                latest::version(),
                StaticLinks(vec![(Arch::X86, "https://example.com/moved-v2.exe")]),
            ),
        );
        let mut registry = registry_with(vec![
            ("same", entry("latest", Some("https://example.com/same.exe"), None)),
            ("moved", entry("latest", Some("https://example.com/moved-v1.exe"), None)),
        ]);

        let report = run(&rules, &mut registry, &UpdateOptions::default())
            .await
            .unwrap();

        assert_eq!(report.unchanged, vec!["same"]);
        assert_eq!(
            report.updated.get("moved").map(String::as_str),
            Some("latest")
        );
        assert_eq!(
            registry.packages["moved"].installer.x86.as_deref(),
            Some("https://example.com/moved-v2.exe")
        );
    }

    #[tokio::test]
    async fn force_still_compares_links_for_latest_entries() {
        let mut rules = RuleSet::new();
        rules.add(
            "app",
            Rule::new(
                latest::version(),
                StaticLinks(vec![(Arch::X86, "https://example.com/stable.exe")]),
            ),
        );
        let mut registry = registry_with(vec![(
            "app",
            entry("latest", Some("https://example.com/stable.exe"), None),
        )]);

        let options = UpdateOptions {
            force: true,
            ..UpdateOptions::default()
        };
        let report = run(&rules, &mut registry, &options).await.unwrap();

        // A sentinel version never compares equal, so force has nothing to
        // override; identical links still mean unchanged.
        assert_eq!(report.unchanged, vec!["app"]);
        assert!(report.updated.is_empty());
    }

    #[tokio::test]
    async fn entries_without_rules_are_reported_not_touched() {
        let rules = RuleSet::new();
        let original = entry("3.1", Some("https://example.com/tool.msi"), None);
        let mut registry = registry_with(vec![("tool", original.clone())]);

        let report = run(&rules, &mut registry, &UpdateOptions::default())
            .await
            .unwrap();

        assert_eq!(report.no_rule, vec!["tool"]);
        assert_eq!(registry.packages["tool"], original);
    }

    #[tokio::test]
    async fn requested_subset_skips_the_rest() {
        let mut rules = RuleSet::new();
        rules.add(
            "wanted",
            Rule::new(
                StaticVersion("1.1"),
                StaticLinks(vec![(Arch::X86, "https://example.com/wanted.exe")]),
            ),
        );
        rules.add(
            "other",
            Rule::new(
                StaticVersion("9.9"),
                StaticLinks(vec![(Arch::X86, "https://example.com/other.exe")]),
            ),
        );
        let mut registry = registry_with(vec![
            ("wanted", entry("1.0", Some("https://example.com/w.exe"), None)),
            ("other", entry("1.0", Some("https://example.com/o.exe"), None)),
        ]);

        let options = UpdateOptions {
            packages: vec!["wanted".to_string()],
            ..UpdateOptions::default()
        };
        let report = run(&rules, &mut registry, &options).await.unwrap();

        assert_eq!(report.skipped, vec!["other"]);
        assert!(report.updated.contains_key("wanted"));
        assert_eq!(registry.packages["other"].version, "1.0");
        assert_eq!(report.total, 2);
    }

    #[tokio::test]
    async fn unknown_requests_fail_before_any_work() {
        let rules = RuleSet::new();
        let mut registry = registry_with(vec![("real", entry("1.0", None, None))]);

        let options = UpdateOptions {
            packages: vec!["real".to_string(), "imaginary".to_string()],
            ..UpdateOptions::default()
        };
        let err = run(&rules, &mut registry, &options).await.unwrap_err();

        let UpdateError::UnknownPackages(unknown) = err;
        assert_eq!(unknown, vec!["imaginary"]);
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_run() {
        let mut rules = RuleSet::new();
        rules.add(
            "broken",
            Rule::new(
                FailVersion,
                StaticLinks(vec![(Arch::X86, "https://example.com/never.exe")]),
            ),
        );
        rules.add(
            "fine",
            Rule::new(
                StaticVersion("4.0"),
                StaticLinks(vec![(Arch::X86, "https://example.com/fine-4.0.exe")]),
            ),
        );
        let broken_before = entry("1.0", Some("https://example.com/broken.exe"), None);
        let mut registry = registry_with(vec![
            ("broken", broken_before.clone()),
            ("fine", entry("3.0", Some("https://example.com/fine-3.0.exe"), None)),
        ]);

        let report = run(&rules, &mut registry, &UpdateOptions::default())
            .await
            .unwrap();

        assert!(matches!(
            report.errored.get("broken"),
            Some(PackageError::Version(_))
        ));
        assert_eq!(registry.packages["broken"], broken_before);
        assert_eq!(report.updated.get("fine").map(String::as_str), Some("4.0"));
        assert!(report.has_errors());
    }

    #[tokio::test]
    async fn invariant_violations_error_without_touching_the_entry() {
        let mut rules = RuleSet::new();
        rules.add(
            "padded",
            Rule::new(
                StaticVersion(" 2.0"),
                StaticLinks(vec![(Arch::X86, "https://example.com/p.exe")]),
            ),
        );
        rules.add(
            "linkless",
            Rule::new(StaticVersion("2.0"), StaticLinks(vec![])),
        );
        let mut registry = registry_with(vec![
            ("padded", entry("1.0", Some("https://example.com/p-1.exe"), None)),
            ("linkless", entry("1.0", Some("https://example.com/l-1.exe"), None)),
        ]);

        let report = run(&rules, &mut registry, &UpdateOptions::default())
            .await
            .unwrap();

        assert!(matches!(
            report.errored.get("padded"),
            Some(PackageError::Invariant(InvariantError::UntrimmedVersion(_)))
        ));
        assert!(matches!(
            report.errored.get("linkless"),
            Some(PackageError::Invariant(InvariantError::NoLinks))
        ));
        assert_eq!(registry.packages["padded"].version, "1.0");
        assert_eq!(registry.packages["linkless"].version, "1.0");
    }

    #[tokio::test]
    async fn write_back_clears_architectures_the_rule_stopped_producing() {
        let mut rules = RuleSet::new();
        rules.add(
            "app",
            Rule::new(
                StaticVersion("5.0"),
                StaticLinks(vec![(Arch::X86_64, "https://example.com/app-5-x64.exe")]),
            ),
        );
        let mut registry = registry_with(vec![(
            "app",
            entry(
                "4.0",
                Some("https://example.com/app-4.exe"),
                Some("https://example.com/app-4-x64.exe"),
            ),
        )]);

        run(&rules, &mut registry, &UpdateOptions::default())
            .await
            .unwrap();

        let package = &registry.packages["app"];
        assert_eq!(package.installer.x86, None);
        assert_eq!(
            package.installer.x86_64.as_deref(),
            Some("https://example.com/app-5-x64.exe")
        );
    }

    #[tokio::test]
    async fn summary_counts_every_bucket() {
        let mut rules = RuleSet::new();
        rules.add(
            "up",
            Rule::new(
                StaticVersion("2.0"),
                StaticLinks(vec![(Arch::X86, "https://example.com/up-2.exe")]),
            ),
        );
        rules.add(
            "same",
            Rule::new(
                StaticVersion("1.0"),
                StaticLinks(vec![(Arch::X86, "https://example.com/same.exe")]),
            ),
        );
        rules.add("bad", Rule::new(FailVersion, StaticLinks(vec![])));
        let mut registry = registry_with(vec![
            ("up", entry("1.0", Some("https://example.com/up-1.exe"), None)),
            ("same", entry("1.0", Some("https://example.com/same.exe"), None)),
            ("bad", entry("1.0", Some("https://example.com/bad.exe"), None)),
            ("norule", entry("1.0", Some("https://example.com/n.exe"), None)),
        ]);

        let report = run(&rules, &mut registry, &UpdateOptions::default())
            .await
            .unwrap();

        assert_eq!(
            report.summary(),
            "1 updated, 1 unchanged, 1 norule (25%), 0 skipped, 1 errored"
        );
    }

    #[test]
    fn empty_report_summary_has_no_rule_percentage_of_zero() {
        let report = Report::default();
        assert_eq!(
            report.summary(),
            "0 updated, 0 unchanged, 0 norule (0%), 0 skipped, 0 errored"
        );
    }
}
