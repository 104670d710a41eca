//! Release command implementation
//!
//! Coordinates a platform-wide release across the fleet:
//! 1. validate the requested version and channel (before touching anything)
//! 2. stamp the Version Registry
//! 3. run the test gate over cargo repositories (fatal on first failure,
//!    halting everything after the registry stamp)
//! 4. propagate the version into each repository's own manifest
//! 5. commit and tag each changed checkout
//!
//! Steps 4 and 5 are best-effort per repository: a missing checkout or a
//! broken git state prints a warning and the remaining repositories proceed.

use crate::core::context::FleetContext;
use crate::core::error::FleetResult;
use crate::core::registry::{Channel, Ecosystem};
use crate::release::{commit_and_tag, parse_release_version, propagate_version, run_test_suite, update_version_registry};
use std::env;
use std::str::FromStr;

/// Run the release command
pub fn run_release(version: String, channel: String, dry_run: bool, skip_tests: bool) -> FleetResult<()> {
  // Validation first: nothing on disk changes until both parse
  let version = parse_release_version(&version)?;
  let channel = Channel::from_str(&channel)?;

  let workspace_root = env::current_dir()?;
  let fleet = FleetContext::load(&workspace_root)?;

  println!("📦 Release {} ({})", version, channel);
  println!();

  if dry_run {
    print_plan(&fleet, &version, skip_tests);
    println!("🔍 Dry-run mode (no changes applied)");
    return Ok(());
  }

  update_version_registry(&workspace_root, &version, channel)?;
  println!("  ✅ Version registry updated to {}", version);

  // Test gate: every cargo repo with a checkout must pass before any
  // per-repository write happens
  if skip_tests {
    println!("⚠️  Test gate skipped (--skip-tests)");
  } else {
    for entry in &fleet.repos.repos {
      if entry.ecosystem != Ecosystem::Cargo {
        continue;
      }
      if !entry.path(&workspace_root).is_dir() {
        println!("  ⚠️  {}: not checked out, tests skipped", entry.name);
        continue;
      }
      println!("  🧪 Testing {}...", entry.name);
      run_test_suite(entry, &workspace_root)?;
    }
    println!();
  }

  // Propagation and commit/tag degrade to warnings per repository
  let mut tagged = 0usize;
  for entry in &fleet.repos.repos {
    if !entry.path(&workspace_root).is_dir() {
      println!("  ⚠️  {}: not checked out, skipped", entry.name);
      continue;
    }

    match propagate_version(entry, &workspace_root, &version) {
      Ok(true) => println!("  📦 {}: version set to {}", entry.name, version),
      Ok(false) => {}
      Err(e) => {
        println!("  ⚠️  {}: version not propagated ({})", entry.name, e);
        continue;
      }
    }

    match commit_and_tag(entry, &workspace_root, &version) {
      Ok(true) => {
        println!("  🏷️  {}: committed and tagged v{}", entry.name, version);
        tagged += 1;
      }
      Ok(false) => {}
      Err(e) => println!("  ⚠️  {}: not tagged ({})", entry.name, e),
    }
  }

  println!();
  println!("✅ Release {} complete ({} repositories tagged)", version, tagged);
  Ok(())
}

fn print_plan(fleet: &FleetContext, version: &semver::Version, skip_tests: bool) {
  println!("  Would update versions.toml [platform] to {}", version);
  if !skip_tests {
    let gated: Vec<_> = fleet
      .repos
      .repos
      .iter()
      .filter(|r| r.ecosystem == Ecosystem::Cargo)
      .map(|r| r.name.as_str())
      .collect();
    println!("  Test gate: {}", if gated.is_empty() { "(none)".to_string() } else { gated.join(", ") });
  }
  for entry in &fleet.repos.repos {
    let action = match entry.ecosystem {
      Ecosystem::Cargo | Ecosystem::Python | Ecosystem::Node => "bump manifest, commit, tag",
      Ecosystem::Go | Ecosystem::None => "commit, tag",
    };
    println!("  {} -> {}", entry.name, action);
  }
  println!();
}
