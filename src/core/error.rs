//! Error types for fleet with contextual messages and exit codes
//!
//! Provides a unified error type that categorizes errors and attaches
//! contextual help messages so the user knows what to fix.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for fleet
///
/// Note: `fleet check` does not use this mapping; its exit code is the
/// number of error-severity findings, by contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (registry files, invalid args, failed validation)
  User = 1,
  /// System error (git, I/O, subprocess)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for fleet
#[derive(Debug)]
pub enum FleetError {
  /// Registry loading/lookup errors
  Registry(RegistryError),

  /// Git operation errors
  Git(GitError),

  /// Validation errors (version strings, channels, manifests)
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl FleetError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    FleetError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      FleetError::Message { message, context, help } => FleetError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      FleetError::Registry(_) => ExitCode::User,
      FleetError::Git(_) => ExitCode::System,
      FleetError::Validation(_) => ExitCode::User,
      FleetError::Io(_) => ExitCode::System,
      FleetError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      FleetError::Registry(e) => e.help_message(),
      FleetError::Git(e) => e.help_message(),
      FleetError::Validation(e) => e.help_message(),
      FleetError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for FleetError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FleetError::Registry(e) => write!(f, "{}", e),
      FleetError::Git(e) => write!(f, "{}", e),
      FleetError::Validation(e) => write!(f, "{}", e),
      FleetError::Io(e) => write!(f, "I/O error: {}", e),
      FleetError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for FleetError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      FleetError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for FleetError {
  fn from(err: io::Error) -> Self {
    FleetError::Io(err)
  }
}

impl From<String> for FleetError {
  fn from(msg: String) -> Self {
    FleetError::message(msg)
  }
}

impl From<&str> for FleetError {
  fn from(msg: &str) -> Self {
    FleetError::message(msg)
  }
}

impl From<toml_edit::TomlError> for FleetError {
  fn from(err: toml_edit::TomlError) -> Self {
    FleetError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for FleetError {
  fn from(err: toml_edit::de::Error) -> Self {
    FleetError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for FleetError {
  fn from(err: serde_json::Error) -> Self {
    FleetError::message(format!("JSON error: {}", err))
  }
}

impl From<semver::Error> for FleetError {
  fn from(err: semver::Error) -> Self {
    FleetError::message(format!("Version parse error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for FleetError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    FleetError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<anyhow::Error> for FleetError {
  fn from(err: anyhow::Error) -> Self {
    FleetError::message(err.to_string())
  }
}

/// Registry-related errors
#[derive(Debug)]
pub enum RegistryError {
  /// A registry file was not found in any search location
  NotFound { name: String, workspace_root: PathBuf },

  /// Registry file exists but is malformed
  Malformed { name: String, reason: String },

  /// Repository not present in the Repository Registry
  RepoNotFound { name: String },
}

impl RegistryError {
  fn help_message(&self) -> Option<String> {
    match self {
      RegistryError::NotFound { name, .. } => Some(format!(
        "Create {} at the workspace root (or under registry/ or .config/).",
        name
      )),
      RegistryError::RepoNotFound { name } => Some(format!(
        "Add a [[repos]] entry for '{}' to repos.toml, or check the spelling.",
        name
      )),
      _ => None,
    }
  }
}

impl fmt::Display for RegistryError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RegistryError::NotFound { name, workspace_root } => {
        write!(
          f,
          "Registry file '{}' not found under {}",
          name,
          workspace_root.display()
        )
      }
      RegistryError::Malformed { name, reason } => {
        write!(f, "Registry file '{}' is malformed: {}", name, reason)
      }
      RegistryError::RepoNotFound { name } => {
        write!(f, "Repository '{}' not found in repos.toml", name)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "Initialize the repository first or check the path: {}",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Validation errors
#[derive(Debug)]
pub enum ValidationError {
  /// Version string is not strict MAJOR.MINOR.PATCH
  Version { input: String, reason: String },

  /// Channel name outside the fixed enumeration
  Channel { input: String },

  /// Test gate failed for a repository
  TestsFailed { repo: String },

  /// A rewritten manifest failed post-write verification
  ManifestInvalid { path: PathBuf, reason: String },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::Version { .. } => {
        Some("Versions must be plain MAJOR.MINOR.PATCH, e.g. 1.2.3 (no 'v' prefix, no pre-release).".to_string())
      }
      ValidationError::Channel { .. } => Some("Valid channels: dev, alpha, beta, stable".to_string()),
      ValidationError::TestsFailed { repo } => Some(format!(
        "Fix the failing tests in '{}' or rerun with --skip-tests (not recommended).",
        repo
      )),
      ValidationError::ManifestInvalid { .. } => {
        Some("The pre-sync backup was restored; the manifest is unchanged.".to_string())
      }
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::Version { input, reason } => {
        write!(f, "Invalid version '{}': {}", input, reason)
      }
      ValidationError::Channel { input } => {
        write!(f, "Invalid channel '{}'", input)
      }
      ValidationError::TestsFailed { repo } => {
        write!(f, "Test suite failed for repository '{}'", repo)
      }
      ValidationError::ManifestInvalid { path, reason } => {
        write!(f, "Rewritten manifest {} failed verification: {}", path.display(), reason)
      }
    }
  }
}

/// Result type alias for fleet
pub type FleetResult<T> = Result<T, FleetError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> FleetResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> FleetResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<FleetError>,
{
  fn context(self, ctx: impl Into<String>) -> FleetResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> FleetResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &FleetError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
