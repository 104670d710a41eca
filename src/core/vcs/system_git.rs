//! System git backend - zero dependencies
//!
//! Uses git porcelain/plumbing commands through subprocesses with an
//! isolated environment. fleet only needs the bookkeeping subset:
//! dirty-tree detection, stage-all, commit, tag.

use crate::core::error::{FleetResult, GitError, FleetError, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Repository working directory
  repo_path: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// One subprocess call to confirm the path is inside a work tree.
  pub fn open(path: &Path) -> FleetResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(FleetError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(FleetError::message(format!("Failed to open git repository: {}", stderr)));
    }

    Ok(Self {
      repo_path: path.to_path_buf(),
    })
  }

  /// Whether the working tree has uncommitted changes
  pub fn is_dirty(&self) -> FleetResult<bool> {
    let output = self
      .git_cmd()
      .args(["status", "--porcelain"])
      .output()
      .context("Failed to get git status")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(FleetError::Git(GitError::CommandFailed {
        command: "git status --porcelain".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    Ok(!output.stdout.is_empty())
  }

  /// Stage everything (`git add -A`)
  pub fn add_all(&self) -> FleetResult<()> {
    self.run(&["add", "-A"])
  }

  /// Commit staged changes
  pub fn commit(&self, message: &str) -> FleetResult<()> {
    self.run(&["commit", "-m", message])
  }

  /// Create an annotated tag
  pub fn tag(&self, tag: &str, message: &str) -> FleetResult<()> {
    self.run(&["tag", "-a", tag, "-m", message])
  }

  fn run(&self, args: &[&str]) -> FleetResult<()> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(FleetError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: stderr.to_string(),
      }));
    }

    Ok(())
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables, whitelisting only PATH and HOME
  /// - Adds safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}
