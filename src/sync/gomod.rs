//! go.mod rewrite strategy (line oriented)
//!
//! go.mod has no structural editor in this stack, so this is the documented
//! textual fallback: `require` entries are rewritten token-wise, one line at
//! a time, preserving indentation and trailing comments. Module versions
//! always get a `v` prefix. `replace`/`exclude` directives are left alone.

use super::{Change, ManifestRewriter, RewriteOutcome, Skipped};
use crate::core::error::{FleetError, FleetResult};
use crate::core::registry::DependencySpec;
use std::collections::BTreeMap;

pub struct GoModRewriter;

/// Module version written into go.mod (go requires the `v` prefix)
fn constraint(spec: &DependencySpec) -> String {
  if spec.version.starts_with('v') {
    spec.version.clone()
  } else {
    format!("v{}", spec.version)
  }
}

/// Rewrite one `<module> <version> [// comment]` requirement line
fn rewrite_require_line(line: &str, pins: &BTreeMap<String, DependencySpec>, changes: &mut Vec<Change>) -> String {
  let indent_len = line.len() - line.trim_start().len();
  let (indent, rest) = line.split_at(indent_len);

  let (spec_part, comment) = match rest.find("//") {
    Some(idx) => (&rest[..idx], &rest[idx..]),
    None => (rest, ""),
  };

  let tokens: Vec<&str> = spec_part.split_whitespace().collect();
  let [module, old_version] = tokens.as_slice() else {
    return line.to_string();
  };

  let Some(spec) = pins.get(*module) else {
    return line.to_string();
  };
  let new_version = constraint(spec);
  if *old_version == new_version {
    return line.to_string();
  }

  changes.push(Change {
    package: module.to_string(),
    old: old_version.to_string(),
    new: new_version.clone(),
  });

  if comment.is_empty() {
    format!("{}{} {}", indent, module, new_version)
  } else {
    format!("{}{} {} {}", indent, module, new_version, comment)
  }
}

impl ManifestRewriter for GoModRewriter {
  fn rewrite(&self, content: &str, pins: &BTreeMap<String, DependencySpec>) -> FleetResult<RewriteOutcome> {
    let mut changes = Vec::new();
    let skipped: Vec<Skipped> = Vec::new();
    let mut in_require_block = false;
    let mut lines = Vec::new();

    for line in content.lines() {
      let trimmed = line.trim();

      if in_require_block {
        if trimmed == ")" {
          in_require_block = false;
          lines.push(line.to_string());
        } else {
          lines.push(rewrite_require_line(line, pins, &mut changes));
        }
      } else if trimmed == "require (" {
        in_require_block = true;
        lines.push(line.to_string());
      } else if let Some(single) = trimmed.strip_prefix("require ") {
        let rewritten = rewrite_require_line(single, pins, &mut changes);
        if rewritten == single {
          lines.push(line.to_string());
        } else {
          let indent = &line[..line.len() - line.trim_start().len()];
          lines.push(format!("{}require {}", indent, rewritten));
        }
      } else {
        lines.push(line.to_string());
      }
    }

    let mut content = lines.join("\n");
    content.push('\n');

    Ok(RewriteOutcome {
      content,
      changes,
      skipped,
    })
  }

  fn verify(&self, content: &str) -> FleetResult<()> {
    if content.lines().any(|l| l.trim_start().starts_with("module ")) {
      Ok(())
    } else {
      Err(FleetError::message("go.mod has no module directive"))
    }
  }
}
