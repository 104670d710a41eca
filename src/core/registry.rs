//! The three declarative registries driving every fleet command
//!
//! - `repos.toml` — Repository Registry: which checkouts exist, their
//!   ecosystem and role, and any extra files they are expected to carry.
//! - `versions.toml` — Version Registry: the org-wide `[platform]` record
//!   plus per-component version records.
//! - `deps.toml` — Dependency Registry: (ecosystem, category, package) →
//!   required version and pin policy.
//!
//! Each file is searched in order: `<root>/<name>`, `<root>/registry/<name>`,
//! `<root>/.config/<name>`. All three load into immutable value objects that
//! are passed into components explicitly (no ambient global state).

use crate::core::error::{FleetError, FleetResult, RegistryError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Package-manifest ecosystem of a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
  Cargo,
  Node,
  Python,
  Go,
  /// Docs/ops repositories with no package manifest
  None,
}

impl Ecosystem {
  /// Manifest filename for this ecosystem, if it has one
  pub fn manifest_filename(&self) -> Option<&'static str> {
    match self {
      Ecosystem::Cargo => Some("Cargo.toml"),
      Ecosystem::Node => Some("package.json"),
      Ecosystem::Python => Some("pyproject.toml"),
      Ecosystem::Go => Some("go.mod"),
      Ecosystem::None => None,
    }
  }

  /// Lockfile expected next to the manifest, if the ecosystem has one
  pub fn lockfile_filename(&self) -> Option<&'static str> {
    match self {
      Ecosystem::Cargo => Some("Cargo.lock"),
      Ecosystem::Node => Some("package-lock.json"),
      Ecosystem::Python => Some("uv.lock"),
      Ecosystem::Go => Some("go.sum"),
      Ecosystem::None => None,
    }
  }

  /// Source file extensions searched by the surface validator
  pub fn source_extensions(&self) -> &'static [&'static str] {
    match self {
      Ecosystem::Cargo => &["rs"],
      Ecosystem::Node => &["ts", "js", "tsx", "mjs"],
      Ecosystem::Python => &["py"],
      Ecosystem::Go => &["go"],
      Ecosystem::None => &[],
    }
  }

  /// Registry key used in deps.toml ("cargo", "node", ...)
  pub fn key(&self) -> &'static str {
    match self {
      Ecosystem::Cargo => "cargo",
      Ecosystem::Node => "node",
      Ecosystem::Python => "python",
      Ecosystem::Go => "go",
      Ecosystem::None => "none",
    }
  }
}

impl fmt::Display for Ecosystem {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.key())
  }
}

/// Role of a repository within the organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Library,
  Service,
  Sdk,
  Frontend,
  Ops,
}

/// One repository checkout tracked by fleet
///
/// Immutable after load. The checkout is expected at `<workspace>/<name>`;
/// absence is a warning, never fatal (partial checkouts are routine).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryEntry {
  pub name: String,
  pub ecosystem: Ecosystem,
  pub role: Role,
  /// Extra required files beyond the common/ecosystem set
  #[serde(default)]
  pub expected_files: Vec<PathBuf>,
}

impl RepositoryEntry {
  /// Absolute path of this repository's checkout under the workspace root
  pub fn path(&self, workspace_root: &Path) -> PathBuf {
    workspace_root.join(&self.name)
  }

  /// Absolute path of this repository's manifest, if its ecosystem has one
  pub fn manifest_path(&self, workspace_root: &Path) -> Option<PathBuf> {
    self
      .ecosystem
      .manifest_filename()
      .map(|f| self.path(workspace_root).join(f))
  }
}

/// Repository Registry (`repos.toml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoRegistry {
  #[serde(default)]
  pub repos: Vec<RepositoryEntry>,
}

impl RepoRegistry {
  pub const FILE_NAME: &'static str = "repos.toml";

  /// Load from the standard search locations under `root`
  pub fn load(root: &Path) -> FleetResult<Self> {
    load_registry(root, Self::FILE_NAME)
  }

  /// Look up a repository by name
  pub fn find(&self, name: &str) -> FleetResult<&RepositoryEntry> {
    self
      .repos
      .iter()
      .find(|r| r.name == name)
      .ok_or_else(|| FleetError::Registry(RegistryError::RepoNotFound { name: name.to_string() }))
  }

  /// Repositories with a given role
  pub fn with_role(&self, role: Role) -> impl Iterator<Item = &RepositoryEntry> {
    self.repos.iter().filter(move |r| r.role == role)
  }
}

/// Release maturity channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
  Dev,
  Alpha,
  Beta,
  Stable,
}

impl FromStr for Channel {
  type Err = FleetError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "dev" => Ok(Channel::Dev),
      "alpha" => Ok(Channel::Alpha),
      "beta" => Ok(Channel::Beta),
      "stable" => Ok(Channel::Stable),
      _ => Err(FleetError::Validation(crate::core::error::ValidationError::Channel {
        input: s.to_string(),
      })),
    }
  }
}

impl fmt::Display for Channel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Channel::Dev => "dev",
      Channel::Alpha => "alpha",
      Channel::Beta => "beta",
      Channel::Stable => "stable",
    };
    write!(f, "{}", s)
  }
}

/// One version record in the Version Registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRecord {
  pub version: String,
  pub channel: Channel,
  /// ISO date of the last release (YYYY-MM-DD)
  pub release_date: String,
}

/// Version Registry (`versions.toml`)
///
/// `[platform]` is the org-wide coordinated release version; it is the only
/// record the Release Coordinator mutates. `[components.*]` records are used
/// by the version-drift check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRegistry {
  pub platform: VersionRecord,
  #[serde(default)]
  pub components: BTreeMap<String, VersionRecord>,
}

impl VersionRegistry {
  pub const FILE_NAME: &'static str = "versions.toml";

  pub fn load(root: &Path) -> FleetResult<Self> {
    load_registry(root, Self::FILE_NAME)
  }

  /// Version record for a named component, if declared
  pub fn component(&self, name: &str) -> Option<&VersionRecord> {
    self.components.get(name)
  }
}

/// How strictly a dependency pin is written into manifests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinPolicy {
  /// The registry version, verbatim (`1.2.3` — npm exact, cargo caret)
  #[default]
  Exact,
  /// Compatible-range operator for the ecosystem (`^1.2.3` in node,
  /// `>=1.2.3` in python, bare in cargo where caret is the default)
  Range,
  /// The registry string untouched; may carry explicit operators
  Locked,
}

/// deps.toml entry value: either a bare version string (pin = exact) or an
/// inline table with an explicit pin policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepValue {
  Version(String),
  Detailed {
    version: String,
    #[serde(default)]
    pin: PinPolicy,
  },
}

impl DepValue {
  pub fn version(&self) -> &str {
    match self {
      DepValue::Version(v) => v,
      DepValue::Detailed { version, .. } => version,
    }
  }

  pub fn pin(&self) -> PinPolicy {
    match self {
      DepValue::Version(_) => PinPolicy::Exact,
      DepValue::Detailed { pin, .. } => *pin,
    }
  }
}

/// A resolved dependency pin, flattened out of the registry nesting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
  pub package: String,
  pub category: String,
  pub version: String,
  pub pin: PinPolicy,
}

/// Dependency Registry (`deps.toml`)
///
/// Nested mapping: ecosystem → category → package → pinned version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepRegistry {
  pub ecosystems: BTreeMap<String, BTreeMap<String, BTreeMap<String, DepValue>>>,
}

impl DepRegistry {
  pub const FILE_NAME: &'static str = "deps.toml";

  pub fn load(root: &Path) -> FleetResult<Self> {
    load_registry(root, Self::FILE_NAME)
  }

  /// All pins for one ecosystem, flattened across categories
  ///
  /// If a package appears in more than one category, the lexicographically
  /// last category wins (registries are expected not to do this).
  pub fn for_ecosystem(&self, ecosystem: Ecosystem) -> BTreeMap<String, DependencySpec> {
    let mut pins = BTreeMap::new();
    if let Some(categories) = self.ecosystems.get(ecosystem.key()) {
      for (category, packages) in categories {
        for (package, value) in packages {
          pins.insert(
            package.clone(),
            DependencySpec {
              package: package.clone(),
              category: category.clone(),
              version: value.version().to_string(),
              pin: value.pin(),
            },
          );
        }
      }
    }
    pins
  }
}

/// Find a registry file in search order: root, registry/, .config/
pub fn find_registry_path(root: &Path, file_name: &str) -> Option<PathBuf> {
  let candidates = vec![
    root.join(file_name),
    root.join("registry").join(file_name),
    root.join(".config").join(file_name),
  ];

  candidates.into_iter().find(|p| p.exists())
}

fn load_registry<T: serde::de::DeserializeOwned>(root: &Path, file_name: &str) -> FleetResult<T> {
  let path = find_registry_path(root, file_name).ok_or_else(|| {
    FleetError::Registry(RegistryError::NotFound {
      name: file_name.to_string(),
      workspace_root: root.to_path_buf(),
    })
  })?;

  let content = fs::read_to_string(&path)?;
  toml_edit::de::from_str(&content).map_err(|e| {
    FleetError::Registry(RegistryError::Malformed {
      name: file_name.to_string(),
      reason: e.to_string(),
    })
  })
}
