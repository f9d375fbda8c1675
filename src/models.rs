//! Value records produced by parsing `brew` output.
//!
//! Every record is immutable once built. A refresh replaces the whole
//! collection, so none of these types carry identity beyond their `name`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An installed (or installable) formula
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub installed: bool,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Package {
    /// An installed package known only by name, as `brew list` reports it
    pub fn installed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            installed: true,
            dependencies: Vec::new(),
            description: None,
        }
    }

    /// Merge the details from `brew info` into this record
    pub fn with_details(mut self, details: PackageDetails) -> Self {
        if let Some(version) = details.version {
            self.version = version;
        }
        self.description = details.description.or(self.description);
        if !details.dependencies.is_empty() {
            self.dependencies = details.dependencies;
        }
        self
    }
}

/// The fields of a `brew info <name>` report that Kettle keeps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDetails {
    pub version: Option<String>,
    pub description: Option<String>,
    pub dependencies: Vec<String>,
}

/// State column of `brew services list`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Started,
    Running,
    Stopped,
    Error,
    Unknown,
}

impl ServiceStatus {
    /// Map a status column by exact match; anything unrecognised is `Unknown`
    pub fn from_column(column: &str) -> Self {
        match column {
            "started" => ServiceStatus::Started,
            "running" => ServiceStatus::Running,
            // brew prints "none" for a service that is installed but not loaded
            "stopped" | "none" => ServiceStatus::Stopped,
            "error" => ServiceStatus::Error,
            _ => ServiceStatus::Unknown,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, ServiceStatus::Started | ServiceStatus::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceStatus::Started => "started",
            ServiceStatus::Running => "running",
            ServiceStatus::Stopped => "stopped",
            ServiceStatus::Error => "error",
            ServiceStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A background service managed through `brew services`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub status: ServiceStatus,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
}

impl Service {
    pub fn new(name: impl Into<String>, status: ServiceStatus) -> Self {
        Self {
            name: name.into(),
            status,
            user: None,
            file_path: None,
        }
    }
}

/// A registered third-party repository, named "owner/repo"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tap {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub installed: bool,
}

/// Extended tap details from `brew tap-info`.
///
/// Every field is best-effort: a report that does not match the expected
/// phrasing leaves the field `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapInfo {
    pub status: Option<String>,
    pub formulae: Option<String>,
    pub commands: Option<String>,
    pub casks: Option<String>,
    pub path: Option<String>,
    pub file_count: Option<u64>,
    pub size: Option<String>,
    pub branch: Option<String>,
    pub head: Option<String>,
    pub last_commit: Option<String>,
    pub remote_url: Option<String>,
}

impl TapInfo {
    /// True when no field could be recovered from the report
    pub fn is_empty(&self) -> bool {
        *self == TapInfo::default()
    }
}

/// A GUI application bundle entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cask {
    pub name: String,
}

impl Cask {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Git revision line from `brew --version`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRevision {
    pub revision: String,
    pub last_commit: String,
}

/// Parsed `brew --version` report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrewVersion {
    pub version: String,
    pub core: Option<RepositoryRevision>,
    pub cask: Option<RepositoryRevision>,
}
