//! Synchronizer: rewrite manifest dependency pins to match the registry
//!
//! Each ecosystem provides a `ManifestRewriter` that takes manifest content
//! plus the flattened pins for that ecosystem and returns rewritten content
//! with a change list. The orchestration here is ecosystem-independent:
//!
//! 1. read the manifest
//! 2. rewrite in memory; if nothing changed, stop (idempotence)
//! 3. copy the manifest to `<file>.bak`
//! 4. write the new content
//! 5. re-parse what landed on disk (the validator); restore the backup on
//!    failure, delete it on success
//!
//! Only simple `key = "value"` / `key = { version = "value", ... }` shapes
//! are rewritten; structurally complex declarations are reported as skipped,
//! never silently mangled.

mod cargo;
mod gomod;
mod node;
mod python;

use crate::core::error::{FleetError, FleetResult, ValidationError};
use crate::core::registry::{DepRegistry, DependencySpec, Ecosystem, RepositoryEntry};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub use cargo::CargoRewriter;
pub use gomod::GoModRewriter;
pub use node::NodeRewriter;
pub use python::PythonRewriter;

/// One applied (or planned, in dry-run) version change
#[derive(Debug, Clone, Serialize)]
pub struct Change {
  pub package: String,
  pub old: String,
  pub new: String,
}

/// A matched dependency the rewriter could not safely rewrite
#[derive(Debug, Clone, Serialize)]
pub struct Skipped {
  pub package: String,
  pub reason: String,
}

/// Result of rewriting manifest content in memory
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
  pub content: String,
  pub changes: Vec<Change>,
  pub skipped: Vec<Skipped>,
}

/// Ecosystem-specific manifest rewrite strategy
pub trait ManifestRewriter: Send + Sync {
  /// Rewrite matching dependency pins in `content`
  fn rewrite(&self, content: &str, pins: &BTreeMap<String, DependencySpec>) -> FleetResult<RewriteOutcome>;

  /// Post-write validator: confirm the content still parses
  fn verify(&self, content: &str) -> FleetResult<()>;
}

/// Rewriter for an ecosystem, if it has a manifest
pub fn rewriter_for(ecosystem: Ecosystem) -> Option<Box<dyn ManifestRewriter>> {
  match ecosystem {
    Ecosystem::Cargo => Some(Box::new(CargoRewriter)),
    Ecosystem::Node => Some(Box::new(NodeRewriter)),
    Ecosystem::Python => Some(Box::new(PythonRewriter)),
    Ecosystem::Go => Some(Box::new(GoModRewriter)),
    Ecosystem::None => None,
  }
}

/// Per-repository sync outcome
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SyncStatus {
  /// Checkout directory absent (partial workspace)
  MissingCheckout,
  /// Ecosystem has a manifest but the file is absent
  NoManifest,
  /// Already in sync, nothing written
  Unchanged,
  /// Changes applied (or planned, under dry-run)
  Updated,
  /// Post-write verification failed; backup restored
  RolledBack { reason: String },
}

/// Report for one repository
#[derive(Debug, Clone, Serialize)]
pub struct RepoSyncReport {
  pub repository: String,
  #[serde(flatten)]
  pub status: SyncStatus,
  pub changes: Vec<Change>,
  pub skipped: Vec<Skipped>,
}

impl RepoSyncReport {
  fn bare(repository: &str, status: SyncStatus) -> Self {
    Self {
      repository: repository.to_string(),
      status,
      changes: Vec::new(),
      skipped: Vec::new(),
    }
  }
}

/// Synchronize one repository's manifest against the Dependency Registry
///
/// Never fatal: all failure modes degrade to a report entry so the remaining
/// repositories still get processed.
pub fn sync_repository(
  workspace_root: &Path,
  entry: &RepositoryEntry,
  registry: &DepRegistry,
  dry_run: bool,
) -> FleetResult<RepoSyncReport> {
  let Some(rewriter) = rewriter_for(entry.ecosystem) else {
    return Ok(RepoSyncReport::bare(&entry.name, SyncStatus::Unchanged));
  };
  let Some(manifest_path) = entry.manifest_path(workspace_root) else {
    return Ok(RepoSyncReport::bare(&entry.name, SyncStatus::Unchanged));
  };

  if !entry.path(workspace_root).is_dir() {
    return Ok(RepoSyncReport::bare(&entry.name, SyncStatus::MissingCheckout));
  }
  if !manifest_path.is_file() {
    return Ok(RepoSyncReport::bare(&entry.name, SyncStatus::NoManifest));
  }

  let pins = registry.for_ecosystem(entry.ecosystem);
  let content = fs::read_to_string(&manifest_path)?;
  let outcome = rewriter.rewrite(&content, &pins)?;

  if outcome.changes.is_empty() {
    return Ok(RepoSyncReport {
      repository: entry.name.clone(),
      status: SyncStatus::Unchanged,
      changes: Vec::new(),
      skipped: outcome.skipped,
    });
  }

  if dry_run {
    return Ok(RepoSyncReport {
      repository: entry.name.clone(),
      status: SyncStatus::Updated,
      changes: outcome.changes,
      skipped: outcome.skipped,
    });
  }

  match write_verified(&manifest_path, &outcome.content, rewriter.as_ref()) {
    Ok(()) => Ok(RepoSyncReport {
      repository: entry.name.clone(),
      status: SyncStatus::Updated,
      changes: outcome.changes,
      skipped: outcome.skipped,
    }),
    Err(e) => Ok(RepoSyncReport {
      repository: entry.name.clone(),
      status: SyncStatus::RolledBack { reason: e.to_string() },
      changes: Vec::new(),
      skipped: outcome.skipped,
    }),
  }
}

/// Backup → write → verify → restore-or-delete
fn write_verified(manifest_path: &Path, new_content: &str, rewriter: &dyn ManifestRewriter) -> FleetResult<()> {
  let backup_path = backup_path_for(manifest_path);
  fs::copy(manifest_path, &backup_path)?;

  fs::write(manifest_path, new_content)?;

  let written = fs::read_to_string(manifest_path)?;
  if let Err(e) = rewriter.verify(&written) {
    // Restore the pre-sync content, then surface the verification failure
    fs::copy(&backup_path, manifest_path)?;
    fs::remove_file(&backup_path)?;
    return Err(FleetError::Validation(ValidationError::ManifestInvalid {
      path: manifest_path.to_path_buf(),
      reason: e.to_string(),
    }));
  }

  fs::remove_file(&backup_path)?;
  Ok(())
}

/// Backup lives next to the manifest: `Cargo.toml` → `Cargo.toml.bak`
pub fn backup_path_for(manifest_path: &Path) -> PathBuf {
  let mut name = manifest_path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default();
  name.push_str(".bak");
  manifest_path.with_file_name(name)
}
