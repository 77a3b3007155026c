//! Extractors backed by the AppVeyor REST API.
//!
//! The branch versioner resolves the latest build of a branch; the artifact
//! downloader walks that build's jobs and picks artifacts by deployment
//! name. When both run for the same package, the job IDs recorded in the
//! rule context let the downloader skip re-resolving the build.

use async_trait::async_trait;
use regex::Regex;
use regup_schema::{Arch, LinkMap};
use serde::Deserialize;
use url::Url;

use crate::context::RuleContext;
use crate::error::ExtractError;
use crate::fetch::FetchError;
use crate::rule::{Downloader, Versioner};

const APPVEYOR_BASE: &str = "https://ci.appveyor.com";

#[derive(Debug, Deserialize)]
struct BuildResponse {
    build: Build,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Build {
    #[serde(default)]
    version: String,
    #[serde(default)]
    jobs: Vec<Job>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Job {
    #[serde(default)]
    job_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    #[serde(default)]
    file_name: String,
    #[serde(default)]
    name: String,
}

fn parse_base(base: &str) -> Url {
    let url = Url::parse(base).unwrap_or_else(|e| panic!("invalid AppVeyor base {base:?}: {e}"));
    assert!(
        !url.cannot_be_a_base(),
        "invalid AppVeyor base {base:?}: cannot carry a path"
    );
    url
}

/// Joins `path` onto `base` and appends each of `tail` as an escaped path
/// segment.
fn endpoint(base: &Url, path: &str, tail: &[&str]) -> Result<String, FetchError> {
    let mut joined = base.join(path).map_err(|e| FetchError::Url {
        url: base.to_string(),
        message: e.to_string(),
    })?;
    {
        let mut segments = joined.path_segments_mut().map_err(|()| FetchError::Url {
            url: base.to_string(),
            message: "cannot carry a path".to_string(),
        })?;
        segments.pop_if_empty().extend(tail);
    }
    Ok(joined.into())
}

fn job_ids(build: Build) -> Vec<String> {
    build
        .jobs
        .into_iter()
        .map(|job| job.job_id)
        .filter(|id| !id.is_empty())
        .collect()
}

/// Extracts the version of the latest AppVeyor build of `repo`'s `branch`,
/// recording the build's job IDs in the rule context.
///
/// # Panics
/// Panics if the default API base is rejected by the URL parser.
pub fn branch_version(repo: &str, branch: &str) -> BranchVersion {
    branch_version_at(APPVEYOR_BASE, repo, branch)
}

/// [`branch_version`] against a custom API base.
///
/// # Panics
/// Panics if `base` is not an absolute URL that can carry a path.
pub fn branch_version_at(base: &str, repo: &str, branch: &str) -> BranchVersion {
    BranchVersion {
        base: parse_base(base),
        repo: repo.to_string(),
        branch: branch.to_string(),
    }
}

/// Versioner returned by [`branch_version`].
#[derive(Debug)]
pub struct BranchVersion {
    base: Url,
    repo: String,
    branch: String,
}

#[async_trait]
impl Versioner for BranchVersion {
    async fn version(&self, cx: &mut RuleContext<'_>) -> Result<String, ExtractError> {
        let url = endpoint(
            &self.base,
            &format!("api/projects/{}/branch/", self.repo),
            &[self.branch.as_str()],
        )?;
        let response: BuildResponse = cx.json(&url).await?;
        if response.build.version.is_empty() {
            return Err(ExtractError::MissingVersion);
        }
        let version = response.build.version.clone();
        let ids = job_ids(response.build);
        if !ids.is_empty() {
            cx.appveyor_job_ids = Some(ids);
        }
        Ok(version)
    }
}

/// Extracts download links from the artifacts of an AppVeyor build of
/// `repo`.
///
/// Patterns are matched against each artifact's deployment name; the first
/// match per architecture wins and jobs stop being walked once every
/// requested architecture is filled. Job IDs recorded by
/// [`branch_version`] are reused; otherwise the build for the extracted
/// version is resolved first.
///
/// # Panics
/// Panics if both patterns are `None` or a pattern is invalid.
pub fn artifacts(repo: &str, x86: Option<&str>, x86_64: Option<&str>) -> Artifacts {
    artifacts_at(APPVEYOR_BASE, repo, x86, x86_64)
}

/// [`artifacts`] against a custom API base.
///
/// # Panics
/// Panics if `base` is not an absolute URL that can carry a path.
pub fn artifacts_at(base: &str, repo: &str, x86: Option<&str>, x86_64: Option<&str>) -> Artifacts {
    assert!(
        x86.is_some() || x86_64.is_some(),
        "at least one architecture pattern is required"
    );
    Artifacts {
        base: parse_base(base),
        repo: repo.to_string(),
        x86: x86.map(super::re),
        x86_64: x86_64.map(super::re),
    }
}

/// Downloader returned by [`artifacts`].
#[derive(Debug)]
pub struct Artifacts {
    base: Url,
    repo: String,
    x86: Option<Regex>,
    x86_64: Option<Regex>,
}

impl Artifacts {
    async fn resolve_job_ids(
        &self,
        version: &str,
        cx: &RuleContext<'_>,
    ) -> Result<Vec<String>, ExtractError> {
        let url = endpoint(
            &self.base,
            &format!("api/projects/{}/build/", self.repo),
            &[version],
        )?;
        let response: BuildResponse = cx.json(&url).await?;
        Ok(job_ids(response.build))
    }

    fn filled(&self, links: &LinkMap) -> bool {
        let x86_done = self.x86.is_none() || links.contains(Arch::X86);
        let x86_64_done = self.x86_64.is_none() || links.contains(Arch::X86_64);
        x86_done && x86_64_done
    }
}

#[async_trait]
impl Downloader for Artifacts {
    async fn links(
        &self,
        version: &str,
        cx: &mut RuleContext<'_>,
    ) -> Result<LinkMap, ExtractError> {
        let job_ids = match cx.appveyor_job_ids.clone() {
            Some(ids) => ids,
            None => self.resolve_job_ids(version, cx).await?,
        };

        let mut links = LinkMap::new();
        for job_id in job_ids.iter().map(String::as_str) {
            let listing_url = endpoint(&self.base, "api/buildjobs/", &[job_id, "artifacts"])?;
            let listing: Vec<Artifact> = cx.json(&listing_url).await?;
            for artifact in &listing {
                for (arch, pattern) in [(Arch::X86, &self.x86), (Arch::X86_64, &self.x86_64)] {
                    let Some(pattern) = pattern else { continue };
                    if links.contains(arch) || !pattern.is_match(&artifact.name) {
                        continue;
                    }
                    let link = endpoint(
                        &self.base,
                        "api/buildjobs/",
                        &[job_id, "artifacts", artifact.file_name.as_str()],
                    )?;
                    links.insert(arch, link);
                }
            }
            if self.filled(&links) {
                break;
            }
        }
        Ok(links)
    }
}
