//! Tests for the `sync` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_sync_updates_cargo_pin() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("core-lib", "cargo", "library")?;
  fleet.add_cargo_repo("core-lib", "0.9.0", &[("sha3", "\"0.10.6\""), ("serde", "\"1.0.228\"")])?;
  fleet.set_deps(
    r#"[cargo.crypto]
sha3 = "0.10.8"
"#,
  )?;

  run_fleet(&fleet.path, &["sync"])?;

  let manifest = fleet.read_file("core-lib/Cargo.toml")?;
  assert!(manifest.contains("sha3 = \"0.10.8\""));
  // Packages not in the registry are untouched
  assert!(manifest.contains("serde = \"1.0.228\""));
  // Backup is cleaned up after a verified write
  assert!(!fleet.file_exists("core-lib/Cargo.toml.bak"));
  Ok(())
}

#[test]
fn test_sync_is_idempotent() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("core-lib", "cargo", "library")?;
  fleet.add_cargo_repo("core-lib", "0.9.0", &[("sha3", "\"0.10.6\"")])?;
  fleet.set_deps("[cargo.crypto]\nsha3 = \"0.10.8\"\n")?;

  run_fleet(&fleet.path, &["sync"])?;
  let first = fleet.read_file("core-lib/Cargo.toml")?;

  let output = run_fleet(&fleet.path, &["sync"])?;
  let second = fleet.read_file("core-lib/Cargo.toml")?;

  assert_eq!(first, second);
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Synced 0 repositories"));
  Ok(())
}

#[test]
fn test_sync_dry_run_writes_nothing() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("core-lib", "cargo", "library")?;
  fleet.add_cargo_repo("core-lib", "0.9.0", &[("sha3", "\"0.10.6\"")])?;
  fleet.set_deps("[cargo.crypto]\nsha3 = \"0.10.8\"\n")?;

  let before = fleet.read_file("core-lib/Cargo.toml")?;
  let output = run_fleet(&fleet.path, &["sync", "--dry-run"])?;
  let after = fleet.read_file("core-lib/Cargo.toml")?;

  assert_eq!(before, after);
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Dry-run"));
  assert!(stdout.contains("0.10.6 -> 0.10.8"));
  Ok(())
}

#[test]
fn test_sync_single_repo_only() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("core-lib", "cargo", "library")?;
  fleet.add_repo_entry("tx-engine", "cargo", "service")?;
  fleet.add_cargo_repo("core-lib", "0.9.0", &[("sha3", "\"0.10.6\"")])?;
  fleet.add_cargo_repo("tx-engine", "0.9.0", &[("sha3", "\"0.10.6\"")])?;
  fleet.set_deps("[cargo.crypto]\nsha3 = \"0.10.8\"\n")?;

  run_fleet(&fleet.path, &["sync", "core-lib"])?;

  assert!(fleet.read_file("core-lib/Cargo.toml")?.contains("0.10.8"));
  assert!(fleet.read_file("tx-engine/Cargo.toml")?.contains("0.10.6"));
  Ok(())
}

#[test]
fn test_sync_unknown_repo_fails() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("core-lib", "cargo", "library")?;
  fleet.add_cargo_repo("core-lib", "0.9.0", &[])?;

  let output = run_fleet_raw(&fleet.path, &["sync", "no-such-repo"])?;
  assert_ne!(exit_code(&output), 0);
  Ok(())
}

#[test]
fn test_sync_node_pin_policies() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("js-sdk", "node", "sdk")?;
  fleet.add_node_repo("js-sdk", "0.9.0", &[("ethers", "^5.0.0"), ("axios", "^1.0.0")])?;
  fleet.set_deps(
    r#"[node.runtime]
ethers = { version = "6.13.0", pin = "range" }
axios = "1.7.0"
"#,
  )?;

  run_fleet(&fleet.path, &["sync"])?;

  let manifest = fleet.read_file("js-sdk/package.json")?;
  assert!(manifest.contains("\"ethers\": \"^6.13.0\""));
  assert!(manifest.contains("\"axios\": \"1.7.0\""));
  Ok(())
}

#[test]
fn test_sync_missing_checkout_is_skipped() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("not-cloned", "cargo", "library")?;
  fleet.set_deps("[cargo.crypto]\nsha3 = \"0.10.8\"\n")?;

  let output = run_fleet(&fleet.path, &["sync", "--verbose"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("not checked out"));
  Ok(())
}

#[test]
fn test_sync_json_report() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("core-lib", "cargo", "library")?;
  fleet.add_cargo_repo("core-lib", "0.9.0", &[("sha3", "\"0.10.6\"")])?;
  fleet.set_deps("[cargo.crypto]\nsha3 = \"0.10.8\"\n")?;

  let output = run_fleet(&fleet.path, &["sync", "--json"])?;
  let reports: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  let report = &reports.as_array().unwrap()[0];
  assert_eq!(report["repository"], "core-lib");
  assert_eq!(report["status"], "updated");
  assert_eq!(report["changes"][0]["package"], "sha3");
  Ok(())
}
