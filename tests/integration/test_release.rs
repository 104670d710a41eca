//! Tests for the `release` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_release_rejects_invalid_version_before_any_write() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("core-lib", "cargo", "library")?;
  fleet.add_cargo_repo("core-lib", "0.9.0", &[])?;
  fleet.git_init("core-lib")?;

  for bad in ["v1.0.0", "1.0", "1.0.0-rc1", "1.0.0.0", "banana"] {
    let output = run_fleet_raw(&fleet.path, &["release", bad, "--skip-tests"])?;
    assert_ne!(exit_code(&output), 0, "accepted invalid version {:?}", bad);
  }

  // Nothing was mutated by the rejected runs
  assert!(fleet.read_file("versions.toml")?.contains("version = \"0.9.0\""));
  assert!(fleet.read_file("core-lib/Cargo.toml")?.contains("version = \"0.9.0\""));
  Ok(())
}

#[test]
fn test_release_rejects_unknown_channel() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("core-lib", "cargo", "library")?;
  fleet.add_cargo_repo("core-lib", "0.9.0", &[])?;

  let output = run_fleet_raw(&fleet.path, &["release", "1.0.0", "--channel", "nightly", "--skip-tests"])?;
  assert_ne!(exit_code(&output), 0);
  assert!(fleet.read_file("versions.toml")?.contains("version = \"0.9.0\""));
  Ok(())
}

#[test]
fn test_release_happy_path_bumps_commits_and_tags() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("core-lib", "cargo", "library")?;
  fleet.add_cargo_repo("core-lib", "0.9.0", &[])?;
  fleet.git_init("core-lib")?;

  run_fleet(
    &fleet.path,
    &["release", "1.0.0", "--channel", "beta", "--skip-tests"],
  )?;

  let versions = fleet.read_file("versions.toml")?;
  assert!(versions.contains("version = \"1.0.0\""));
  assert!(versions.contains("channel = \"beta\""));

  let manifest = fleet.read_file("core-lib/Cargo.toml")?;
  assert!(manifest.contains("version = \"1.0.0\""));

  let repo = fleet.path.join("core-lib");
  let tags = git(&repo, &["tag", "--list"])?;
  assert!(String::from_utf8_lossy(&tags.stdout).contains("v1.0.0"));

  let log = git(&repo, &["log", "-1", "--format=%s"])?;
  assert!(String::from_utf8_lossy(&log.stdout).contains("release: v1.0.0"));

  // Working tree is clean after commit
  let status = git(&repo, &["status", "--porcelain"])?;
  assert!(status.stdout.is_empty());
  Ok(())
}

#[test]
fn test_release_test_gate_failure_halts_propagation() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("gate-fails", "cargo", "library")?;
  fleet.add_cargo_repo("gate-fails", "0.9.0", &[])?;
  fleet.write_file(
    "gate-fails/src/lib.rs",
    "pub fn placeholder() {}\n\n#[cfg(test)]\nmod tests {\n  #[test]\n  fn always_fails() {\n    assert!(false);\n  }\n}\n",
  )?;
  fleet.write_file(
    "gate-fails/Cargo.lock",
    "version = 4\n\n[[package]]\nname = \"gate-fails\"\nversion = \"0.9.0\"\n",
  )?;
  fleet.git_init("gate-fails")?;

  let output = run_fleet_raw(&fleet.path, &["release", "1.0.0"])?;
  assert_eq!(exit_code(&output), 1);

  // The registry stamp precedes the gate, propagation follows it
  assert!(fleet.read_file("versions.toml")?.contains("version = \"1.0.0\""));
  assert!(fleet.read_file("gate-fails/Cargo.toml")?.contains("version = \"0.9.0\""));

  let tags = git(&fleet.path.join("gate-fails"), &["tag", "--list"])?;
  assert!(tags.stdout.is_empty());
  Ok(())
}

#[test]
fn test_release_dry_run_changes_nothing() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("core-lib", "cargo", "library")?;
  fleet.add_cargo_repo("core-lib", "0.9.0", &[])?;
  fleet.git_init("core-lib")?;

  let output = run_fleet(&fleet.path, &["release", "1.0.0", "--dry-run"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Dry-run"));

  assert!(fleet.read_file("versions.toml")?.contains("version = \"0.9.0\""));
  assert!(fleet.read_file("core-lib/Cargo.toml")?.contains("version = \"0.9.0\""));

  let tags = git(&fleet.path.join("core-lib"), &["tag", "--list"])?;
  assert!(tags.stdout.is_empty());
  Ok(())
}

#[test]
fn test_release_skips_missing_checkouts() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("core-lib", "cargo", "library")?;
  fleet.add_repo_entry("not-cloned", "cargo", "service")?;
  fleet.add_cargo_repo("core-lib", "0.9.0", &[])?;
  fleet.git_init("core-lib")?;

  let output = run_fleet(&fleet.path, &["release", "1.0.0", "--skip-tests"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("not checked out"));

  // The present repository was still released
  assert!(fleet.read_file("core-lib/Cargo.toml")?.contains("version = \"1.0.0\""));
  Ok(())
}

#[test]
fn test_release_clean_tree_is_not_tagged_twice() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("docs", "none", "ops")?;
  let repo = fleet.path.join("docs");
  std::fs::create_dir_all(&repo)?;
  fleet.write_file("docs/README.md", "# docs\n")?;
  fleet.git_init("docs")?;

  // No manifest to bump and the tree is clean, so no commit and no tag
  run_fleet(&fleet.path, &["release", "1.0.0", "--skip-tests"])?;

  let tags = git(&repo, &["tag", "--list"])?;
  assert!(tags.stdout.is_empty());
  Ok(())
}
