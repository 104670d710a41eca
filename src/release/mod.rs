//! Release Coordinator: bump the Version Registry, propagate, commit, tag
//!
//! Ordering contract:
//! 1. validation (version + channel) happens before any mutation
//! 2. the Version Registry is updated first
//! 3. the test gate (cargo repos) is fatal on first failure, halting
//!    everything after the registry stamp
//! 4. per-repository version propagation and commit/tag are best-effort:
//!    failures degrade to warnings so one broken checkout cannot block a
//!    coordinated release across the rest of the fleet

use crate::core::error::{FleetError, FleetResult, ValidationError};
use crate::core::registry::{Channel, Ecosystem, RepositoryEntry, VersionRegistry, find_registry_path};
use crate::core::vcs::SystemGit;
use std::path::Path;
use std::process::Command;
use toml_edit::DocumentMut;

/// Parse a release version, accepting only strict MAJOR.MINOR.PATCH
///
/// Rejects `v` prefixes, pre-release/build suffixes, and anything semver
/// itself rejects (`1.2`, `1.2.3.4`, ...). Runs before any file is touched.
pub fn parse_release_version(input: &str) -> FleetResult<semver::Version> {
  if input.starts_with('v') || input.starts_with('V') {
    return Err(FleetError::Validation(ValidationError::Version {
      input: input.to_string(),
      reason: "leading 'v' prefix is not allowed".to_string(),
    }));
  }

  let version = semver::Version::parse(input).map_err(|e| {
    FleetError::Validation(ValidationError::Version {
      input: input.to_string(),
      reason: e.to_string(),
    })
  })?;

  if !version.pre.is_empty() || !version.build.is_empty() {
    return Err(FleetError::Validation(ValidationError::Version {
      input: input.to_string(),
      reason: "pre-release and build metadata are not allowed (use --channel instead)".to_string(),
    }));
  }

  Ok(version)
}

/// Update `[platform]` in versions.toml (format preserving)
///
/// Sets version, channel, and release_date (today, UTC).
pub fn update_version_registry(workspace_root: &Path, version: &semver::Version, channel: Channel) -> FleetResult<()> {
  let path = find_registry_path(workspace_root, VersionRegistry::FILE_NAME).ok_or_else(|| {
    FleetError::Registry(crate::core::error::RegistryError::NotFound {
      name: VersionRegistry::FILE_NAME.to_string(),
      workspace_root: workspace_root.to_path_buf(),
    })
  })?;

  let content = std::fs::read_to_string(&path)?;
  let mut doc: DocumentMut = content.parse()?;

  let platform = doc
    .get_mut("platform")
    .and_then(|p| p.as_table_like_mut())
    .ok_or_else(|| FleetError::message("versions.toml has no [platform] table"))?;

  platform.insert("version", toml_edit::value(version.to_string()));
  platform.insert("channel", toml_edit::value(channel.to_string()));
  platform.insert(
    "release_date",
    toml_edit::value(chrono::Utc::now().format("%Y-%m-%d").to_string()),
  );

  std::fs::write(&path, doc.to_string())?;
  Ok(())
}

/// Run `cargo test` in one repository; fatal on failure
///
/// The release gate runs this over every cargo-ecosystem checkout and aborts
/// the whole release on the first failure.
pub fn run_test_suite(entry: &RepositoryEntry, workspace_root: &Path) -> FleetResult<()> {
  let repo_path = entry.path(workspace_root);

  let status = Command::new("cargo")
    .arg("test")
    .arg("--quiet")
    .current_dir(&repo_path)
    .status()
    .map_err(|e| FleetError::message(format!("Failed to run cargo test in '{}': {}", entry.name, e)))?;

  if !status.success() {
    return Err(FleetError::Validation(ValidationError::TestsFailed {
      repo: entry.name.clone(),
    }));
  }

  Ok(())
}

/// Rewrite one repository's own version field
///
/// Returns false when the ecosystem has no version field (go, none).
pub fn propagate_version(entry: &RepositoryEntry, workspace_root: &Path, version: &semver::Version) -> FleetResult<bool> {
  match entry.ecosystem {
    Ecosystem::Cargo => {
      let Some(path) = entry.manifest_path(workspace_root) else {
        return Ok(false);
      };
      set_toml_version(&path, "package", version)?;
      Ok(true)
    }
    Ecosystem::Python => {
      let Some(path) = entry.manifest_path(workspace_root) else {
        return Ok(false);
      };
      set_toml_version(&path, "project", version)?;
      Ok(true)
    }
    Ecosystem::Node => {
      // Directory-style bump: npm rewrites package.json (and lockfile)
      let output = Command::new("npm")
        .args(["version", &version.to_string(), "--no-git-tag-version", "--allow-same-version"])
        .current_dir(entry.path(workspace_root))
        .output()
        .map_err(|e| FleetError::message(format!("Failed to run npm version in '{}': {}", entry.name, e)))?;

      if !output.status.success() {
        return Err(FleetError::message(format!(
          "npm version failed in '{}': {}",
          entry.name,
          String::from_utf8_lossy(&output.stderr).trim()
        )));
      }
      Ok(true)
    }
    Ecosystem::Go | Ecosystem::None => Ok(false),
  }
}

/// Set `[<section>] version = "..."` in a TOML manifest, format preserving
fn set_toml_version(manifest_path: &Path, section: &str, version: &semver::Version) -> FleetResult<()> {
  let content = std::fs::read_to_string(manifest_path)?;
  let mut doc: DocumentMut = content.parse()?;

  let table = doc
    .get_mut(section)
    .and_then(|s| s.as_table_like_mut())
    .ok_or_else(|| {
      FleetError::message(format!(
        "No [{}] section in {}",
        section,
        manifest_path.display()
      ))
    })?;

  table.insert("version", toml_edit::value(version.to_string()));
  std::fs::write(manifest_path, doc.to_string())?;
  Ok(())
}

/// Commit and tag a repository if its working tree is dirty
///
/// Returns false when the tree was clean and nothing was committed.
pub fn commit_and_tag(entry: &RepositoryEntry, workspace_root: &Path, version: &semver::Version) -> FleetResult<bool> {
  let git = SystemGit::open(&entry.path(workspace_root))?;

  if !git.is_dirty()? {
    return Ok(false);
  }

  let tag = format!("v{}", version);
  git.add_all()?;
  git.commit(&format!("release: {}", tag))?;
  git.tag(&tag, &format!("Release {}", tag))?;
  Ok(true)
}
