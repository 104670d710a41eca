//! Check command implementation
//!
//! Runs every consistency check across the fleet and reports the results.
//! The process exit code equals the number of error-severity findings
//! (clamped to 255), so CI can gate on `fleet check` directly. Warnings
//! never affect the exit code.

use crate::checks::{Check, CheckContext, CheckResult, Severity, create_default_runner};
use crate::core::context::FleetContext;
use crate::core::error::FleetResult;
use std::env;

/// Run the check command
pub fn run_check(json: bool) -> FleetResult<()> {
  let workspace_root = env::current_dir()?;
  let fleet = FleetContext::load(&workspace_root)?;

  let runner = create_default_runner();
  if !json {
    println!("🔍 Fleet consistency check");
    for check in runner.checks() {
      println!("  • {}: {}", check.name(), check.description());
    }
    println!();
  }

  let ctx = CheckContext { fleet: &fleet };
  let results = runner.run_all(&ctx)?;

  let errors = results
    .iter()
    .filter(|r| !r.passed && r.severity == Severity::Error)
    .count();
  let warnings = results
    .iter()
    .filter(|r| !r.passed && r.severity == Severity::Warning)
    .count();

  if json {
    println!("{}", serde_json::to_string_pretty(&results)?);
  } else {
    print_results(&results, errors, warnings);
  }

  if errors > 0 {
    std::process::exit(errors.min(255) as i32);
  }

  Ok(())
}

fn print_results(results: &[CheckResult], errors: usize, warnings: usize) {
  let mut current_repo = "";
  for result in results {
    if result.passed {
      continue;
    }
    if result.repository != current_repo {
      current_repo = &result.repository;
      println!("  {}", current_repo);
    }
    let icon = match result.severity {
      Severity::Error => "❌",
      Severity::Warning => "⚠️ ",
      Severity::Info => "ℹ️ ",
    };
    println!("    {} [{}] {}", icon, result.check_name, result.message);
    if let Some(suggestion) = &result.suggestion {
      println!("       💡 {}", suggestion);
    }
  }

  let ok = results.iter().filter(|r| r.passed).count();

  if errors == 0 && warnings == 0 {
    println!("  ✅ All checks passed ({} ok)", ok);
  } else {
    println!();
    println!("  {} ok, {} warning(s), {} error(s)", ok, warnings, errors);
    if errors > 0 {
      println!("  ❌ Fleet is inconsistent");
    } else {
      println!("  ✅ No errors (warnings only)");
    }
  }
}
