//! The on-disk JSON registry consumed by the installer tool.
//!
//! The file is a single object: a `$schema` marker, an integer schema
//! version, and a map from package name to record. Load rejects any file
//! whose version does not equal [`REGISTRY_VERSION`]; save emits two-space
//! indented JSON with sorted keys and a trailing newline, so a load/save
//! round-trip is byte-stable modulo the original key order.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Registry schema version this build reads and writes.
pub const REGISTRY_VERSION: u32 = 4;

/// `$schema` marker written into newly created registries.
pub const DEFAULT_SCHEMA: &str = "./just-install-schema.json";

/// Errors from loading or saving a registry file.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read registry at {path}: {source}")]
    Read {
        /// Path the registry was loaded from.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The registry file could not be written.
    #[error("failed to write registry at {path}: {source}")]
    Write {
        /// Path the registry was saved to.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The registry is not valid JSON for this schema.
    #[error("invalid registry JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The registry declares a schema version this build does not support.
    #[error("unsupported registry version {found} (expected {REGISTRY_VERSION})")]
    UnsupportedVersion {
        /// Version stored in the file.
        found: u32,
    },
}

/// A package registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    /// Schema marker, preserved exactly as stored.
    #[serde(rename = "$schema", default)]
    pub schema: String,
    /// Schema version; must equal [`REGISTRY_VERSION`].
    pub version: u32,
    /// Package records keyed by package name, serialized in sorted order.
    pub packages: BTreeMap<String, Package>,
}

impl Registry {
    /// An empty registry at the current schema version.
    pub fn new() -> Self {
        Self {
            schema: DEFAULT_SCHEMA.to_string(),
            version: REGISTRY_VERSION,
            packages: BTreeMap::new(),
        }
    }

    /// Parses a registry from JSON text, rejecting unsupported versions.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let registry: Self = serde_json::from_str(json)?;
        if registry.version != REGISTRY_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                found: registry.version,
            });
        }
        Ok(registry)
    }

    /// Serializes the registry as indented JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String, RegistryError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Reads and parses the registry file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Writes the registry to `path` as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RegistryError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| RegistryError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// One package record: how to install it and which version is current.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Installer metadata and download links.
    pub installer: Installer,
    /// Current version, or the sentinel `"latest"` for unversioned packages.
    pub version: String,
}

/// How a package is installed and where its installers are downloaded from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installer {
    /// Whether the installer needs user interaction. Absent means no.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interactive: Option<bool>,
    /// Installer technology (see [`InstallerKind`]).
    pub kind: InstallerKind,
    /// Extra options, shared or per-architecture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<InstallerOptions>,
    /// 32-bit download URL. At least one of `x86`/`x86_64` should be set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x86: Option<String>,
    /// 64-bit download URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x86_64: Option<String>,
}

/// Installer technology identifier.
///
/// Known kinds as of schema version 4: `advancedinstaller`, `as-is`, `copy`,
/// `custom`, `easy_install_26`, `easy_install_27`, `innosetup`, `msi`,
/// `nsis`, `zip`. Unknown kinds round-trip untouched; the updater never
/// interprets this field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstallerKind(pub String);

impl InstallerKind {
    /// The kind as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InstallerKind {
    fn from(kind: &str) -> Self {
        Self(kind.to_string())
    }
}

impl fmt::Display for InstallerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Installer options: a shared set plus optional per-architecture overrides.
///
/// Either the shared fields are set, or the per-architecture overrides are,
/// or both; the installer tool checks `x86` to decide which applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerOptions {
    /// Options applying to both architectures, flattened into this object.
    #[serde(flatten)]
    pub shared: Options,
    /// 32-bit-only options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x86: Option<Options>,
    /// 64-bit-only options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x86_64: Option<Options>,
}

/// Additional options for an installer invocation. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Arguments passed to the installer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<String>>,
    /// Nested installer inside a container archive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<Container>,
    /// Destination directory override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Forced file extension for the downloaded installer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Forced file name for the downloaded installer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Executables to expose on the PATH.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shims: Option<Vec<String>>,
}

/// A container wrapping the real installer (currently only `zip`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// Path of the inner installer within the container.
    pub installer: String,
    /// Container kind.
    pub kind: String,
}
