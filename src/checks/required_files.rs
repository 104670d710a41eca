//! Required-files check: every repository carries its expected files
//!
//! The rule set per repository is the common set (license, README, ignore
//! file, CI workflow directory) plus the ecosystem manifest and lockfile,
//! plus any `expected_files` declared in the Repository Registry. One result
//! is emitted per rule per repository. A missing checkout produces a single
//! warning and skips the remaining rules for that repository.

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::FleetResult;
use crate::core::registry::RepositoryEntry;
use std::path::Path;

/// Check that validates required file presence per repository
pub struct RequiredFilesCheck;

/// One file rule: name, candidate paths (any match passes), directory flag
struct FileRule {
  name: &'static str,
  candidates: Vec<String>,
  is_dir: bool,
}

impl FileRule {
  fn file(name: &'static str, candidates: &[&str]) -> Self {
    Self {
      name,
      candidates: candidates.iter().map(|s| s.to_string()).collect(),
      is_dir: false,
    }
  }

  fn dir(name: &'static str, path: &str) -> Self {
    Self {
      name,
      candidates: vec![path.to_string()],
      is_dir: true,
    }
  }

  fn is_satisfied(&self, repo_path: &Path) -> bool {
    self.candidates.iter().any(|rel| {
      let p = repo_path.join(rel);
      if self.is_dir { p.is_dir() } else { p.is_file() }
    })
  }
}

fn rules_for(entry: &RepositoryEntry) -> Vec<FileRule> {
  let mut rules = vec![
    FileRule::file("license", &["LICENSE", "LICENSE.md", "LICENSE-MIT"]),
    FileRule::file("readme", &["README.md"]),
    FileRule::file("ignore-file", &[".gitignore"]),
    FileRule::dir("ci-workflows", ".github/workflows"),
  ];

  if let Some(manifest) = entry.ecosystem.manifest_filename() {
    rules.push(FileRule::file("manifest", &[manifest]));
  }
  if let Some(lockfile) = entry.ecosystem.lockfile_filename() {
    rules.push(FileRule::file("lockfile", &[lockfile]));
  }

  rules
}

impl Check for RequiredFilesCheck {
  fn name(&self) -> &str {
    "required-files"
  }

  fn description(&self) -> &str {
    "Validates presence of required files in every repository"
  }

  fn run(&self, ctx: &CheckContext<'_>) -> FleetResult<Vec<CheckResult>> {
    let mut results = Vec::new();

    for entry in &ctx.fleet.repos.repos {
      let repo_path = entry.path(&ctx.fleet.root);

      if !repo_path.is_dir() {
        // Partial checkout: one warning, skip the remaining rules
        results.push(CheckResult::warning(
          self.name(),
          &entry.name,
          format!("Repository checkout missing at {}", repo_path.display()),
          Some(format!("Clone '{}' into the workspace root", entry.name)),
        ));
        continue;
      }

      for rule in rules_for(entry) {
        if rule.is_satisfied(&repo_path) {
          results.push(CheckResult::pass(
            self.name(),
            &entry.name,
            format!("{}: present", rule.name),
          ));
        } else if rule.name == "manifest" {
          // A declared ecosystem without its manifest is an error;
          // everything else is a warning.
          results.push(CheckResult::error(
            self.name(),
            &entry.name,
            format!("{}: missing ({})", rule.name, rule.candidates.join(" or ")),
            Some(format!(
              "Add {} or correct the ecosystem in repos.toml",
              rule.candidates[0]
            )),
          ));
        } else {
          results.push(CheckResult::warning(
            self.name(),
            &entry.name,
            format!("{}: missing ({})", rule.name, rule.candidates.join(" or ")),
            None::<String>,
          ));
        }
      }

      for extra in &entry.expected_files {
        let present = repo_path.join(extra).exists();
        if present {
          results.push(CheckResult::pass(
            self.name(),
            &entry.name,
            format!("{}: present", extra.display()),
          ));
        } else {
          results.push(CheckResult::warning(
            self.name(),
            &entry.name,
            format!("{}: missing", extra.display()),
            None::<String>,
          ));
        }
      }
    }

    Ok(results)
  }
}
