//! package.json rewrite strategy
//!
//! Rewrites string values in `dependencies` and `devDependencies` through a
//! serde_json round-trip (preserve_order keeps key order; output is the
//! standard two-space npm formatting). Rewriting a file that was not already
//! in that layout reformats it, which is reported alongside skips. Non-string
//! values (rare: workspace protocols expressed as objects) are skipped.

use super::{Change, ManifestRewriter, RewriteOutcome, Skipped};
use crate::core::error::FleetResult;
use crate::core::registry::{DependencySpec, PinPolicy};
use std::collections::BTreeMap;

pub struct NodeRewriter;

/// Version string written into package.json for a pin
fn constraint(spec: &DependencySpec) -> String {
  match spec.pin {
    // npm treats a bare version as exact
    PinPolicy::Exact => spec.version.clone(),
    PinPolicy::Range => format!("^{}", spec.version),
    PinPolicy::Locked => spec.version.clone(),
  }
}

fn rewrite_section(
  pkg: &mut serde_json::Value,
  section: &str,
  pins: &BTreeMap<String, DependencySpec>,
  changes: &mut Vec<Change>,
  skipped: &mut Vec<Skipped>,
) {
  let Some(deps) = pkg.get_mut(section).and_then(|d| d.as_object_mut()) else {
    return;
  };

  for (name, value) in deps.iter_mut() {
    let Some(spec) = pins.get(name) else { continue };
    let new = constraint(spec);

    match value.as_str() {
      Some(old) => {
        if old != new {
          changes.push(Change {
            package: name.clone(),
            old: old.to_string(),
            new: new.clone(),
          });
          *value = serde_json::Value::String(new);
        }
      }
      None => {
        skipped.push(Skipped {
          package: name.clone(),
          reason: format!("{}: value is not a version string", section),
        });
      }
    }
  }
}

impl ManifestRewriter for NodeRewriter {
  fn rewrite(&self, content: &str, pins: &BTreeMap<String, DependencySpec>) -> FleetResult<RewriteOutcome> {
    let mut pkg: serde_json::Value = serde_json::from_str(content)?;
    let npm_formatted = format!("{}\n", serde_json::to_string_pretty(&pkg)?) == content;
    let mut changes = Vec::new();
    let mut skipped = Vec::new();

    rewrite_section(&mut pkg, "dependencies", pins, &mut changes, &mut skipped);
    rewrite_section(&mut pkg, "devDependencies", pins, &mut changes, &mut skipped);

    // Keep the original bytes when nothing matched, so unchanged manifests
    // are never reformatted
    let content = if changes.is_empty() {
      content.to_string()
    } else {
      if !npm_formatted {
        skipped.push(Skipped {
          package: "package.json".to_string(),
          reason: "non-standard formatting, file rewritten in two-space npm layout".to_string(),
        });
      }
      format!("{}\n", serde_json::to_string_pretty(&pkg)?)
    };

    Ok(RewriteOutcome {
      content,
      changes,
      skipped,
    })
  }

  fn verify(&self, content: &str) -> FleetResult<()> {
    serde_json::from_str::<serde_json::Value>(content)?;
    Ok(())
  }
}
