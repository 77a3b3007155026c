//! Shared data model for regup.
//!
//! This crate holds everything both the extraction library and the CLI need
//! to agree on: the [`Arch`] enumeration, the [`LinkMap`] produced by every
//! download rule, and the on-disk JSON [`Registry`] format consumed by the
//! installer tool.

pub mod arch;
pub mod registry;

pub use arch::{Arch, LinkMap};
pub use registry::{
    Container, DEFAULT_SCHEMA, Installer, InstallerKind, InstallerOptions, Options, Package,
    REGISTRY_VERSION, Registry, RegistryError,
};
