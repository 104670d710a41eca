//! Consistency checks over the Repository Registry
//!
//! All checks implement the `Check` trait and are executed by the
//! `CheckRunner`. Checks have no side effects beyond the report; the
//! `fleet check` exit code equals the number of error-severity results.
//!
//! # Built-in checks
//!
//! - **required-files**: license, README, ignore file, CI workflow
//!   directory, ecosystem manifest and lockfile, plus per-repo extras.
//! - **version-drift**: manifest self-version vs. the Version Registry.

mod required_files;
mod runner;
mod trait_def;
mod version_drift;

// Re-export public API
pub use runner::{CheckRunner, create_default_runner};
pub use trait_def::{Check, CheckContext, CheckResult, Severity};
