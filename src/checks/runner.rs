//! Check runner for executing consistency checks

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::FleetResult;
use std::sync::Arc;

/// Check runner that executes multiple checks
pub struct CheckRunner {
  checks: Vec<Arc<dyn Check>>,
}

impl CheckRunner {
  /// Create a new check runner
  pub fn new() -> Self {
    Self { checks: Vec::new() }
  }

  /// Add a check to the runner
  pub fn add_check(&mut self, check: Arc<dyn Check>) {
    self.checks.push(check);
  }

  /// Run all checks and collect results
  pub fn run_all(&self, ctx: &CheckContext<'_>) -> FleetResult<Vec<CheckResult>> {
    let mut results = Vec::new();

    for check in &self.checks {
      match check.run(ctx) {
        Ok(mut check_results) => results.append(&mut check_results),
        Err(err) => {
          // If a check itself fails to run, surface it as an error result
          results.push(CheckResult::error(
            check.name(),
            "-",
            format!("Check failed to run: {}", err),
            None::<String>,
          ));
        }
      }
    }

    Ok(results)
  }

  /// Get all registered checks
  pub fn checks(&self) -> &[Arc<dyn Check>] {
    &self.checks
  }
}

impl Default for CheckRunner {
  fn default() -> Self {
    Self::new()
  }
}

/// Create a runner with all built-in checks
pub fn create_default_runner() -> CheckRunner {
  let mut runner = CheckRunner::new();

  runner.add_check(Arc::new(super::required_files::RequiredFilesCheck));
  runner.add_check(Arc::new(super::version_drift::VersionDriftCheck));

  runner
}
