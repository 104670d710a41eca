//! CLI commands for fleet
//!
//! User-facing command implementations:
//!
//! - **check**: run every consistency check, exit code = error count
//! - **sync**: rewrite manifests to match the Dependency Registry
//! - **release**: coordinated version bump, test gate, commit + tag
//! - **surface**: required-method presence check across SDK repos

pub mod check;
pub mod release;
pub mod surface;
pub mod sync;

pub use check::run_check;
pub use release::run_release;
pub use surface::run_surface;
pub use sync::run_sync;
