//! Cargo.toml rewrite strategy (structural, format preserving)
//!
//! Rewrites `[dependencies]`, `[dev-dependencies]`, `[build-dependencies]`
//! and `[workspace.dependencies]` through toml_edit so untouched entries stay
//! byte-identical. Handled shapes: `name = "ver"` and
//! `name = { version = "ver", ... }`. Target-specific tables
//! (`[target.'cfg(..)'.dependencies]`) and entries without a version string
//! (path/git-only deps) are reported as skipped.

use super::{Change, ManifestRewriter, RewriteOutcome, Skipped};
use crate::core::error::FleetResult;
use crate::core::registry::{DependencySpec, PinPolicy};
use std::collections::BTreeMap;
use toml_edit::{DocumentMut, Item, TableLike};

pub struct CargoRewriter;

/// Version string written into Cargo.toml for a pin
fn constraint(spec: &DependencySpec) -> String {
  match spec.pin {
    // Cargo's bare requirement is already caret-compatible, so exact and
    // range both write the registry version; locked carries its own operators
    PinPolicy::Exact | PinPolicy::Range | PinPolicy::Locked => spec.version.clone(),
  }
}

fn rewrite_dep_table(
  table: &mut dyn TableLike,
  pins: &BTreeMap<String, DependencySpec>,
  changes: &mut Vec<Change>,
  skipped: &mut Vec<Skipped>,
) {
  let matched: Vec<String> = table
    .iter()
    .filter(|(name, _)| pins.contains_key(*name))
    .map(|(name, _)| name.to_string())
    .collect();

  for name in matched {
    let spec = &pins[&name];
    let new = constraint(spec);
    let Some(item) = table.get_mut(&name) else { continue };

    if let Some(old) = item.as_str() {
      // name = "ver"
      if old != new {
        changes.push(Change {
          package: name.clone(),
          old: old.to_string(),
          new: new.clone(),
        });
        *item = toml_edit::value(new);
      }
    } else if let Some(dep) = item.as_table_like_mut() {
      // name = { version = "ver", ... }
      match dep.get_mut("version") {
        Some(version_item) if version_item.is_str() => {
          let old = version_item.as_str().unwrap_or_default().to_string();
          if old != new {
            changes.push(Change {
              package: name.clone(),
              old,
              new: new.clone(),
            });
            *version_item = toml_edit::value(new);
          }
        }
        _ => {
          skipped.push(Skipped {
            package: name.clone(),
            reason: "no version string (path/git dependency)".to_string(),
          });
        }
      }
    } else {
      skipped.push(Skipped {
        package: name.clone(),
        reason: "unsupported declaration shape".to_string(),
      });
    }
  }
}

impl ManifestRewriter for CargoRewriter {
  fn rewrite(&self, content: &str, pins: &BTreeMap<String, DependencySpec>) -> FleetResult<RewriteOutcome> {
    let mut doc: DocumentMut = content.parse()?;
    let mut changes = Vec::new();
    let mut skipped = Vec::new();

    for table_name in ["dependencies", "dev-dependencies", "build-dependencies"] {
      if let Some(table) = doc.get_mut(table_name).and_then(Item::as_table_like_mut) {
        rewrite_dep_table(table, pins, &mut changes, &mut skipped);
      }
    }

    if let Some(table) = doc
      .get_mut("workspace")
      .and_then(|w| w.get_mut("dependencies"))
      .and_then(Item::as_table_like_mut)
    {
      rewrite_dep_table(table, pins, &mut changes, &mut skipped);
    }

    Ok(RewriteOutcome {
      content: doc.to_string(),
      changes,
      skipped,
    })
  }

  fn verify(&self, content: &str) -> FleetResult<()> {
    content.parse::<DocumentMut>()?;
    Ok(())
  }
}
