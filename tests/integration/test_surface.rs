//! Tests for the `surface` command

use crate::helpers::*;
use anyhow::Result;

const RUST_SDK_COMPLETE: &str = r#"pub struct Client;

impl Client {
  pub fn get_balance(&self, address: &str) -> u64 { 0 }
  pub fn send_transaction(&self, raw: &[u8]) -> String { String::new() }
  pub fn get_transaction_status(&self, id: &str) -> String { String::new() }
  pub fn estimate_fee(&self, raw: &[u8]) -> u64 { 0 }
  pub fn subscribe_events(&self) {}
}
"#;

#[test]
fn test_surface_passes_for_complete_sdk() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("rust-sdk", "cargo", "sdk")?;
  fleet.add_cargo_repo("rust-sdk", "0.9.0", &[])?;
  fleet.write_file("rust-sdk/src/client.rs", RUST_SDK_COMPLETE)?;

  let output = run_fleet(&fleet.path, &["surface"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("All SDKs expose the required surface"));
  Ok(())
}

#[test]
fn test_surface_fails_when_method_missing() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("rust-sdk", "cargo", "sdk")?;
  fleet.add_cargo_repo("rust-sdk", "0.9.0", &[])?;
  fleet.write_file(
    "rust-sdk/src/client.rs",
    "pub fn get_balance() {}\npub fn send_transaction() {}\n",
  )?;

  let output = run_fleet_raw(&fleet.path, &["surface"])?;
  assert_eq!(exit_code(&output), 1);

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("estimate_fee"));
  assert!(stdout.contains("subscribeEvents"));
  Ok(())
}

#[test]
fn test_surface_node_sdk_keeps_camel_case() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("js-sdk", "node", "sdk")?;
  fleet.add_node_repo("js-sdk", "0.9.0", &[])?;
  fleet.write_file(
    "js-sdk/src/client.ts",
    r#"export class Client {
  async getBalance(address: string) {}
  async sendTransaction(raw: Uint8Array) {}
  async getTransactionStatus(id: string) {}
  async estimateFee(raw: Uint8Array) {}
  subscribeEvents(handler: (e: unknown) => void) {}
}
"#,
  )?;

  run_fleet(&fleet.path, &["surface"])?;
  Ok(())
}

#[test]
fn test_surface_non_sdk_repos_are_ignored() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("tx-engine", "cargo", "service")?;
  fleet.add_cargo_repo("tx-engine", "0.9.0", &[])?;

  // A service repo with no SDK methods must not fail the surface check
  let output = run_fleet(&fleet.path, &["surface"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("No repositories with role = \"sdk\""));
  Ok(())
}

#[test]
fn test_surface_json_output() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo_entry("rust-sdk", "cargo", "sdk")?;
  fleet.add_cargo_repo("rust-sdk", "0.9.0", &[])?;
  fleet.write_file("rust-sdk/src/client.rs", RUST_SDK_COMPLETE)?;

  let output = run_fleet(&fleet.path, &["surface", "--json"])?;
  let reports: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  let report = &reports.as_array().unwrap()[0];
  assert_eq!(report["repository"], "rust-sdk");
  assert_eq!(report["findings"].as_array().unwrap().len(), 5);
  assert!(report["findings"].as_array().unwrap().iter().all(|f| f["present"] == true));
  Ok(())
}
