//! SDK surface validator: required methods exist in every SDK repository
//!
//! A heuristic textual check, documented as such: each required method name
//! is transformed to the target ecosystem's naming convention (snake_case
//! for Rust/Python, PascalCase for Go, unchanged for JS/TS) and searched for
//! as a declaration-shaped line in the SDK's source files. This is not an
//! AST check; refactored signatures can produce false negatives.

use crate::core::error::FleetResult;
use crate::core::registry::{Ecosystem, RepositoryEntry};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Methods every SDK must expose, in the canonical (camelCase) spelling
pub const REQUIRED_METHODS: [&str; 5] = [
  "getBalance",
  "sendTransaction",
  "getTransactionStatus",
  "estimateFee",
  "subscribeEvents",
];

/// Directories never searched for source files
const EXCLUDED_DIRS: [&str; 8] = [
  ".git",
  "target",
  "node_modules",
  "dist",
  "build",
  "vendor",
  "__pycache__",
  ".venv",
];

/// Presence result for one required method in one SDK
#[derive(Debug, Clone, Serialize)]
pub struct MethodFinding {
  /// Canonical method name
  pub method: String,
  /// Name searched for after the ecosystem transform
  pub expected: String,
  pub present: bool,
}

/// Surface report for one SDK repository
#[derive(Debug, Clone, Serialize)]
pub struct SdkSurfaceReport {
  pub repository: String,
  pub ecosystem: Ecosystem,
  /// Checkout directory absent; findings empty
  pub missing_checkout: bool,
  pub findings: Vec<MethodFinding>,
}

impl SdkSurfaceReport {
  /// Number of required methods not found
  pub fn missing_count(&self) -> usize {
    self.findings.iter().filter(|f| !f.present).count()
  }
}

/// camelCase → snake_case
pub fn snake_case(name: &str) -> String {
  let mut out = String::with_capacity(name.len() + 4);
  for c in name.chars() {
    if c.is_ascii_uppercase() {
      out.push('_');
      out.push(c.to_ascii_lowercase());
    } else {
      out.push(c);
    }
  }
  out
}

/// camelCase → PascalCase
pub fn pascal_case(name: &str) -> String {
  let mut chars = name.chars();
  match chars.next() {
    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
    None => String::new(),
  }
}

/// Name an SDK in this ecosystem is expected to use for a canonical method
pub fn expected_name(ecosystem: Ecosystem, method: &str) -> String {
  match ecosystem {
    Ecosystem::Cargo | Ecosystem::Python => snake_case(method),
    Ecosystem::Go => pascal_case(method),
    Ecosystem::Node | Ecosystem::None => method.to_string(),
  }
}

/// Whether `content` contains a declaration-shaped use of `name`
fn declares_method(content: &str, ecosystem: Ecosystem, name: &str) -> bool {
  let call = format!("{}(", name);

  content.lines().any(|line| {
    let trimmed = line.trim_start();
    match ecosystem {
      Ecosystem::Cargo => {
        trimmed.contains(&format!("fn {}(", name)) || trimmed.contains(&format!("fn {}<", name))
      }
      Ecosystem::Python => trimmed.contains(&format!("def {}(", name)),
      Ecosystem::Go => trimmed.starts_with("func ") && trimmed.contains(&call),
      Ecosystem::Node | Ecosystem::None => {
        trimmed.contains(&format!("function {}(", name))
          || trimmed.starts_with(&call)
          || trimmed.starts_with(&format!("async {}(", name))
          || trimmed.starts_with(&format!("{} = ", name))
          || trimmed.starts_with(&format!("{}:", name))
      }
    }
  })
}

/// Collect source files for the ecosystem under `dir`, recursively
fn collect_source_files(dir: &Path, extensions: &[&str], files: &mut Vec<PathBuf>) -> FleetResult<()> {
  for entry in fs::read_dir(dir)? {
    let entry = entry?;
    let path = entry.path();
    let name = entry.file_name();
    let name = name.to_string_lossy();

    if path.is_dir() {
      if !EXCLUDED_DIRS.contains(&name.as_ref()) {
        collect_source_files(&path, extensions, files)?;
      }
    } else if let Some(ext) = path.extension().and_then(|e| e.to_str())
      && extensions.contains(&ext)
    {
      files.push(path);
    }
  }
  Ok(())
}

/// Validate one SDK repository's method surface
pub fn validate_sdk(workspace_root: &Path, entry: &RepositoryEntry) -> FleetResult<SdkSurfaceReport> {
  let repo_path = entry.path(workspace_root);

  if !repo_path.is_dir() {
    return Ok(SdkSurfaceReport {
      repository: entry.name.clone(),
      ecosystem: entry.ecosystem,
      missing_checkout: true,
      findings: Vec::new(),
    });
  }

  let mut files = Vec::new();
  collect_source_files(&repo_path, entry.ecosystem.source_extensions(), &mut files)?;

  // Read each file once, then match every method against the pool
  let mut contents = Vec::with_capacity(files.len());
  for file in &files {
    // Unreadable files (permissions, broken symlinks) are skipped
    if let Ok(content) = fs::read_to_string(file) {
      contents.push(content);
    }
  }

  let findings = REQUIRED_METHODS
    .iter()
    .map(|method| {
      let expected = expected_name(entry.ecosystem, method);
      let present = contents.iter().any(|c| declares_method(c, entry.ecosystem, &expected));
      MethodFinding {
        method: method.to_string(),
        expected,
        present,
      }
    })
    .collect();

  Ok(SdkSurfaceReport {
    repository: entry.name.clone(),
    ecosystem: entry.ecosystem,
    missing_checkout: false,
    findings,
  })
}
