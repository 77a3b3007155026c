pub mod check;
pub mod context;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod rule;
pub mod table;
pub mod updater;

pub use context::RuleContext;
pub use error::{ExtractError, InvariantError, PackageError, Target};
pub use fetch::{FetchError, Fetcher};
pub use rule::{Downloader, Rule, RuleSet, Versioner};
pub use updater::{Report, UpdateError, UpdateOptions, Updater};

// The schema types every rule produces or consumes.
pub use regup_schema::{Arch, LinkMap};

/// User agent for outgoing requests
pub const USER_AGENT: &str = concat!("regup/", env!("CARGO_PKG_VERSION"));
