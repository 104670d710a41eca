//! Surface command implementation
//!
//! Textual presence check for the required SDK method surface. Any missing
//! method in any SDK produces a non-zero exit.

use crate::core::context::FleetContext;
use crate::core::error::FleetResult;
use crate::core::registry::Role;
use crate::surface::{SdkSurfaceReport, validate_sdk};
use std::env;

/// Run the surface command
pub fn run_surface(json: bool) -> FleetResult<()> {
  let workspace_root = env::current_dir()?;
  let fleet = FleetContext::load(&workspace_root)?;

  let mut reports = Vec::new();
  for entry in fleet.repos.with_role(Role::Sdk) {
    reports.push(validate_sdk(&workspace_root, entry)?);
  }

  if json {
    println!("{}", serde_json::to_string_pretty(&reports)?);
  } else {
    print_reports(&reports);
  }

  let missing: usize = reports.iter().map(SdkSurfaceReport::missing_count).sum();
  if missing > 0 {
    std::process::exit(1);
  }

  Ok(())
}

fn print_reports(reports: &[SdkSurfaceReport]) {
  println!("🔍 SDK surface check (heuristic, text-based)");
  println!();

  if reports.is_empty() {
    println!("  ⚠️  No repositories with role = \"sdk\" configured");
    return;
  }

  let mut missing_total = 0usize;
  for report in reports {
    if report.missing_checkout {
      println!("  ⚠️  {} ({}): not checked out, skipped", report.repository, report.ecosystem);
      continue;
    }
    println!("  {} ({})", report.repository, report.ecosystem);
    for finding in &report.findings {
      if finding.present {
        println!("    ✅ {} (as {})", finding.method, finding.expected);
      } else {
        println!("    ❌ {} (expected {})", finding.method, finding.expected);
        missing_total += 1;
      }
    }
  }

  println!();
  if missing_total == 0 {
    println!("✅ All SDKs expose the required surface");
  } else {
    println!("❌ {} required method(s) missing", missing_total);
  }
}
