//! Check trait abstraction for consistency checks
//!
//! Every consistency rule implements the `Check` trait. Unlike a health
//! probe that yields a single verdict, fleet's checks walk the Repository
//! Registry and emit one result per rule per repository, so `run` returns a
//! list. Results are transient; only the aggregated counts matter for the
//! exit code.

use crate::core::context::FleetContext;
use crate::core::error::FleetResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level for check results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
  /// Informational message (not an issue)
  Info,
  /// Warning (non-blocking, never affects the exit code)
  Warning,
  /// Error (each one increments the process exit code)
  Error,
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Severity::Info => write!(f, "INFO"),
      Severity::Warning => write!(f, "WARN"),
      Severity::Error => write!(f, "ERROR"),
    }
  }
}

/// Result of one rule applied to one repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
  /// Name of the check that ran
  pub check_name: String,
  /// Repository the result refers to
  pub repository: String,
  /// Whether the rule passed
  pub passed: bool,
  /// Severity level (Info when passed)
  pub severity: Severity,
  /// Human-readable message
  pub message: String,
  /// Optional suggested fix
  pub suggestion: Option<String>,
}

impl CheckResult {
  /// Create a passing check result
  pub fn pass(check_name: impl Into<String>, repository: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      check_name: check_name.into(),
      repository: repository.into(),
      passed: true,
      severity: Severity::Info,
      message: message.into(),
      suggestion: None,
    }
  }

  /// Create a failing check result with error severity
  pub fn error(
    check_name: impl Into<String>,
    repository: impl Into<String>,
    message: impl Into<String>,
    suggestion: Option<impl Into<String>>,
  ) -> Self {
    Self {
      check_name: check_name.into(),
      repository: repository.into(),
      passed: false,
      severity: Severity::Error,
      message: message.into(),
      suggestion: suggestion.map(|s| s.into()),
    }
  }

  /// Create a failing check result with warning severity
  pub fn warning(
    check_name: impl Into<String>,
    repository: impl Into<String>,
    message: impl Into<String>,
    suggestion: Option<impl Into<String>>,
  ) -> Self {
    Self {
      check_name: check_name.into(),
      repository: repository.into(),
      passed: false,
      severity: Severity::Warning,
      message: message.into(),
      suggestion: suggestion.map(|s| s.into()),
    }
  }
}

/// Context passed to checks
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
  /// Loaded registries and workspace root
  pub fleet: &'a FleetContext,
}

/// Consistency check trait
///
/// Each check walks the Repository Registry and reports per-repository
/// findings. Checks must have no side effects beyond the report.
pub trait Check: Send + Sync {
  /// Unique name for this check (kebab-case)
  fn name(&self) -> &str;

  /// Human-readable description of what this check validates
  fn description(&self) -> &str;

  /// Run the check and return one result per rule per repository
  fn run(&self, ctx: &CheckContext<'_>) -> FleetResult<Vec<CheckResult>>;
}
