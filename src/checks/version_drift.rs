//! Version-drift check: manifest self-versions match the Version Registry
//!
//! For every repository that both has a manifest version field and a
//! matching `[components.<name>]` record in versions.toml, compare the two.
//! Divergence is a warning (the Release Coordinator is the fixer, not this
//! check). Repositories without a component record are skipped.

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::FleetResult;
use crate::core::registry::{Ecosystem, RepositoryEntry};
use std::path::Path;

/// Check that compares each manifest's own version to the Version Registry
pub struct VersionDriftCheck;

impl Check for VersionDriftCheck {
  fn name(&self) -> &str {
    "version-drift"
  }

  fn description(&self) -> &str {
    "Compares manifest versions against the Version Registry"
  }

  fn run(&self, ctx: &CheckContext<'_>) -> FleetResult<Vec<CheckResult>> {
    let mut results = Vec::new();

    for entry in &ctx.fleet.repos.repos {
      let Some(record) = ctx.fleet.versions.component(&entry.name) else {
        continue;
      };
      let Some(manifest_path) = entry.manifest_path(&ctx.fleet.root) else {
        continue;
      };
      if !manifest_path.is_file() {
        // required-files already reports missing checkouts/manifests
        continue;
      }

      match manifest_version(entry, &manifest_path) {
        Ok(Some(found)) => {
          if versions_equal(&found, &record.version) {
            results.push(CheckResult::pass(
              self.name(),
              &entry.name,
              format!("version {} matches registry", found),
            ));
          } else {
            results.push(CheckResult::warning(
              self.name(),
              &entry.name,
              format!("manifest version {} diverges from registry {}", found, record.version),
              Some("Run `fleet release` to propagate the registry version"),
            ));
          }
        }
        Ok(None) => {
          // go.mod and friends: no self-version field, nothing to compare
        }
        Err(e) => {
          results.push(CheckResult::warning(
            self.name(),
            &entry.name,
            format!("could not read manifest version: {}", e),
            None::<String>,
          ));
        }
      }
    }

    Ok(results)
  }
}

/// Read the manifest's own version field, if the ecosystem has one
fn manifest_version(entry: &RepositoryEntry, manifest_path: &Path) -> FleetResult<Option<String>> {
  let content = std::fs::read_to_string(manifest_path)?;

  let version = match entry.ecosystem {
    Ecosystem::Cargo => {
      let doc: toml_edit::DocumentMut = content.parse()?;
      doc
        .get("package")
        .and_then(|p| p.get("version"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
    }
    Ecosystem::Python => {
      let doc: toml_edit::DocumentMut = content.parse()?;
      doc
        .get("project")
        .and_then(|p| p.get("version"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
    }
    Ecosystem::Node => {
      let pkg: serde_json::Value = serde_json::from_str(&content)?;
      pkg.get("version").and_then(|v| v.as_str()).map(|s| s.to_string())
    }
    Ecosystem::Go | Ecosystem::None => None,
  };

  Ok(version)
}

/// Semver-aware equality, falling back to string comparison
fn versions_equal(a: &str, b: &str) -> bool {
  match (semver::Version::parse(a), semver::Version::parse(b)) {
    (Ok(va), Ok(vb)) => va == vb,
    _ => a == b,
  }
}
