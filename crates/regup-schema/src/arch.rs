//! Architecture identifiers and the per-architecture download link map.

use std::collections::BTreeMap;
use std::fmt;

/// A Windows installer architecture.
///
/// The registry tracks at most two download links per package, one for
/// 32-bit Windows and one for 64-bit Windows. The serialized names (`x86`,
/// `x86_64`) match the registry's JSON field names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// 32-bit installers.
    X86,
    /// 64-bit installers.
    X86_64,
}

impl Arch {
    /// String representation, matching the registry field names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x86" | "i386" | "win32" => Ok(Self::X86),
            "x86_64" | "x64" | "amd64" | "win64" => Ok(Self::X86_64),
            _ => Err(format!("unknown architecture: {s}")),
        }
    }
}

/// Download links keyed by architecture, at most one per architecture.
///
/// Produced by every download rule and compared against the links currently
/// stored in the registry. Iteration order is fixed (`x86` before `x86_64`)
/// so output and comparisons are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMap(BTreeMap<Arch, String>);

impl LinkMap {
    /// An empty link map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a link for an architecture, returning the previous one if set.
    pub fn insert(&mut self, arch: Arch, url: impl Into<String>) -> Option<String> {
        self.0.insert(arch, url.into())
    }

    /// The link for an architecture, if any.
    pub fn get(&self, arch: Arch) -> Option<&str> {
        self.0.get(&arch).map(String::as_str)
    }

    /// Removes and returns the link for an architecture.
    pub fn take(&mut self, arch: Arch) -> Option<String> {
        self.0.remove(&arch)
    }

    /// Whether a link is present for an architecture.
    pub fn contains(&self, arch: Arch) -> bool {
        self.0.contains_key(&arch)
    }

    /// Whether no links are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of links present.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(architecture, link)` pairs in fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (Arch, &str)> {
        self.0.iter().map(|(arch, url)| (*arch, url.as_str()))
    }
}

impl FromIterator<(Arch, String)> for LinkMap {
    fn from_iter<I: IntoIterator<Item = (Arch, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
