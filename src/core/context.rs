//! Workspace context: the three registries, loaded once
//!
//! Built a single time in main and passed by reference into each command,
//! keeping the Checker/Synchronizer/Coordinator independently testable.

use crate::core::error::FleetResult;
use crate::core::registry::{DepRegistry, RepoRegistry, VersionRegistry};
use std::path::{Path, PathBuf};

/// Immutable-after-load view of the workspace
#[derive(Debug, Clone)]
pub struct FleetContext {
  /// Directory containing the registries and the repository checkouts
  pub root: PathBuf,
  pub repos: RepoRegistry,
  pub versions: VersionRegistry,
  pub deps: DepRegistry,
}

impl FleetContext {
  /// Load all three registries from `root`
  pub fn load(root: &Path) -> FleetResult<Self> {
    Ok(Self {
      root: root.to_path_buf(),
      repos: RepoRegistry::load(root)?,
      versions: VersionRegistry::load(root)?,
      deps: DepRegistry::load(root)?,
    })
  }
}
