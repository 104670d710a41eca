//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A test workspace holding the three registries plus repository checkouts
pub struct TestFleet {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestFleet {
  /// Create a workspace with empty registries
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    std::fs::write(path.join("repos.toml"), "")?;
    std::fs::write(
      path.join("versions.toml"),
      r#"[platform]
version = "0.9.0"
channel = "dev"
release_date = "2026-01-01"
"#,
    )?;
    std::fs::write(path.join("deps.toml"), "")?;

    Ok(Self { _root: root, path })
  }

  /// Append a `[[repos]]` entry to repos.toml
  pub fn add_repo_entry(&self, name: &str, ecosystem: &str, role: &str) -> Result<()> {
    let mut content = self.read_file("repos.toml")?;
    content.push_str(&format!(
      "\n[[repos]]\nname = \"{}\"\necosystem = \"{}\"\nrole = \"{}\"\n",
      name, ecosystem, role
    ));
    std::fs::write(self.path.join("repos.toml"), content)?;
    Ok(())
  }

  /// Record a component in versions.toml
  pub fn add_component(&self, name: &str, version: &str) -> Result<()> {
    let mut content = self.read_file("versions.toml")?;
    content.push_str(&format!(
      "\n[components.{}]\nversion = \"{}\"\nchannel = \"dev\"\nrelease_date = \"2026-01-01\"\n",
      name, version
    ));
    std::fs::write(self.path.join("versions.toml"), content)?;
    Ok(())
  }

  /// Replace deps.toml wholesale
  pub fn set_deps(&self, content: &str) -> Result<()> {
    std::fs::write(self.path.join("deps.toml"), content)?;
    Ok(())
  }

  /// Create a cargo repository checkout with the standard required files
  pub fn add_cargo_repo(&self, name: &str, version: &str, deps: &[(&str, &str)]) -> Result<PathBuf> {
    let repo = self.path.join(name);
    std::fs::create_dir_all(repo.join("src"))?;

    let mut manifest = format!(
      "[package]\nname = \"{}\"\nversion = \"{}\"\nedition = \"2024\"\n\n[dependencies]\n",
      name, version
    );
    for (dep, spec) in deps {
      manifest.push_str(&format!("{} = {}\n", dep, spec));
    }
    std::fs::write(repo.join("Cargo.toml"), manifest)?;
    std::fs::write(repo.join("Cargo.lock"), "# placeholder lockfile\nversion = 4\n")?;
    std::fs::write(repo.join("src/lib.rs"), "pub fn placeholder() {}\n")?;

    self.add_standard_files(&repo)?;
    Ok(repo)
  }

  /// Create a node repository checkout
  pub fn add_node_repo(&self, name: &str, version: &str, deps: &[(&str, &str)]) -> Result<PathBuf> {
    let repo = self.path.join(name);
    std::fs::create_dir_all(&repo)?;

    let dep_lines: Vec<String> = deps
      .iter()
      .map(|(dep, spec)| format!("    \"{}\": \"{}\"", dep, spec))
      .collect();
    let manifest = format!(
      "{{\n  \"name\": \"{}\",\n  \"version\": \"{}\",\n  \"dependencies\": {{\n{}\n  }}\n}}\n",
      name,
      version,
      dep_lines.join(",\n")
    );
    std::fs::write(repo.join("package.json"), manifest)?;
    std::fs::write(repo.join("package-lock.json"), "{}\n")?;

    self.add_standard_files(&repo)?;
    Ok(repo)
  }

  /// License, readme, .gitignore, and a CI workflow directory
  fn add_standard_files(&self, repo: &Path) -> Result<()> {
    std::fs::write(repo.join("LICENSE"), "MIT\n")?;
    std::fs::write(repo.join("README.md"), "# test repo\n")?;
    std::fs::write(repo.join(".gitignore"), "target/\nnode_modules/\n")?;
    std::fs::create_dir_all(repo.join(".github/workflows"))?;
    std::fs::write(repo.join(".github/workflows/ci.yml"), "name: ci\n")?;
    Ok(())
  }

  /// Turn a checkout into a git repository with one commit
  pub fn git_init(&self, name: &str) -> Result<()> {
    let repo = self.path.join(name);
    git(&repo, &["init", "--initial-branch=main"])?;
    git(&repo, &["config", "user.name", "Test User"])?;
    git(&repo, &["config", "user.email", "test@example.com"])?;
    git(&repo, &["add", "."])?;
    git(&repo, &["commit", "-m", "initial"])?;
    Ok(())
  }

  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let full = self.path.join(path);
    if let Some(parent) = full.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(full, content)?;
    Ok(())
  }
}

/// Run git in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the fleet CLI, failing the test on a non-zero exit
pub fn run_fleet(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_fleet_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "fleet command failed: fleet {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run the fleet CLI and hand back the output regardless of exit code
pub fn run_fleet_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  let fleet_bin = env!("CARGO_BIN_EXE_fleet");

  Command::new(fleet_bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run fleet")
}

/// Exit code of a finished process, defaulting to -1 when signalled
pub fn exit_code(output: &Output) -> i32 {
  output.status.code().unwrap_or(-1)
}
