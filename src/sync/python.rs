//! pyproject.toml rewrite strategy (structural via toml_edit)
//!
//! Rewrites requirement strings in `[project] dependencies`. Only simple
//! requirements are handled: `name`, `name==v`, `name>=v`, `name~=v`,
//! optionally with an extras suffix (`name[extra]>=v`). Requirements with
//! commas, environment markers, or URL specs are skipped. Optional
//! dependency groups are not touched.

use super::{Change, ManifestRewriter, RewriteOutcome, Skipped};
use crate::core::error::FleetResult;
use crate::core::registry::{DependencySpec, PinPolicy};
use std::collections::BTreeMap;
use toml_edit::DocumentMut;

pub struct PythonRewriter;

/// Two-char operators first so `>=` is not read as `>`
const OPERATORS: [&str; 7] = ["==", ">=", "<=", "~=", "!=", ">", "<"];

/// A parsed simple requirement: `name[extras] op version`
struct SimpleRequirement<'a> {
  /// Name with extras suffix, exactly as written
  name_part: &'a str,
  /// Normalized package name used for registry lookup
  lookup_name: String,
  version: &'a str,
}

fn parse_simple(req: &str) -> Option<SimpleRequirement<'_>> {
  // Markers, version lists, and URL requirements are out of scope
  if req.contains(';') || req.contains(',') || req.contains('@') {
    return None;
  }

  let (name_part, version) = match OPERATORS.iter().find_map(|op| req.find(op).map(|i| (i, op.len()))) {
    Some((idx, op_len)) => (req[..idx].trim_end(), req[idx + op_len..].trim()),
    None => (req.trim(), ""),
  };

  if name_part.is_empty() {
    return None;
  }

  let bare_name = name_part.split('[').next().unwrap_or(name_part);
  Some(SimpleRequirement {
    name_part,
    lookup_name: normalize_name(bare_name),
    version,
  })
}

/// PEP 503-ish normalization: lowercase, underscores and dots become hyphens
fn normalize_name(name: &str) -> String {
  name
    .trim()
    .to_lowercase()
    .chars()
    .map(|c| if c == '_' || c == '.' { '-' } else { c })
    .collect()
}

/// Requirement string written for a pin
fn constraint(name_part: &str, spec: &DependencySpec) -> String {
  match spec.pin {
    PinPolicy::Exact => format!("{}=={}", name_part, spec.version),
    PinPolicy::Range => format!("{}>={}", name_part, spec.version),
    PinPolicy::Locked => {
      // Locked strings carry their own operators ("==1.2.3", ">=1,<2")
      if spec.version.starts_with(|c: char| !c.is_ascii_alphanumeric()) {
        format!("{}{}", name_part, spec.version)
      } else {
        format!("{}=={}", name_part, spec.version)
      }
    }
  }
}

impl ManifestRewriter for PythonRewriter {
  fn rewrite(&self, content: &str, pins: &BTreeMap<String, DependencySpec>) -> FleetResult<RewriteOutcome> {
    let mut doc: DocumentMut = content.parse()?;
    let mut changes = Vec::new();
    let mut skipped = Vec::new();

    if let Some(deps) = doc
      .get_mut("project")
      .and_then(|p| p.get_mut("dependencies"))
      .and_then(|d| d.as_array_mut())
    {
      let mut replacements = Vec::new();

      for (i, value) in deps.iter().enumerate() {
        let Some(req) = value.as_str() else { continue };

        let Some(parsed) = parse_simple(req) else {
          // Complex requirement: report it only when the registry pins it
          if let Some(name) = req.split(|c: char| !c.is_ascii_alphanumeric() && c != '-' && c != '_').next()
            && pins.contains_key(&normalize_name(name))
          {
            skipped.push(Skipped {
              package: normalize_name(name),
              reason: "complex requirement (markers or version list)".to_string(),
            });
          }
          continue;
        };

        let Some(spec) = pins.get(&parsed.lookup_name) else { continue };
        let new_req = constraint(parsed.name_part, spec);
        if new_req != req {
          changes.push(Change {
            package: spec.package.clone(),
            old: parsed.version.to_string(),
            new: spec.version.clone(),
          });
          replacements.push((i, new_req));
        }
      }

      for (i, new_req) in replacements {
        deps.replace(i, new_req);
      }
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
