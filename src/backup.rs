//! Export and import documents.

use crate::error::Result;
use crate::models::{Package, Service, Tap, TapInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

const FILE_STAMP: &str = "%Y%m%d-%H%M%S";

/// Snapshot of everything needed to describe an installation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupBundle {
    pub packages: Vec<Package>,
    pub services: Vec<Service>,
    pub taps: Vec<Tap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

impl BackupBundle {
    pub fn new(packages: Vec<Package>, services: Vec<Service>, taps: Vec<Tap>) -> Self {
        Self {
            packages,
            services,
            taps,
            exported_at: Some(Utc::now()),
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        info!(
            "Wrote backup of {} packages, {} services, {} taps to {}",
            self.packages.len(),
            self.services.len(),
            self.taps.len(),
            path.display()
        );
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

/// Taps together with their `brew tap-info` details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TapExport {
    pub taps: Vec<Tap>,
    pub tap_infos: BTreeMap<String, TapInfo>,
    pub export_date: DateTime<Utc>,
    /// When the tap list was last refreshed
    pub last_update_date: Option<DateTime<Utc>>,
}

impl TapExport {
    pub fn new(
        taps: Vec<Tap>,
        tap_infos: BTreeMap<String, TapInfo>,
        last_update_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            taps,
            tap_infos,
            export_date: Utc::now(),
            last_update_date,
        }
    }

    /// `homebrew-taps-<last update>-<export>.json`, or `no-update` in place
    /// of the first stamp when the taps were never refreshed
    pub fn file_name(&self) -> String {
        let update = self
            .last_update_date
            .map(|d| d.format(FILE_STAMP).to_string())
            .unwrap_or_else(|| "no-update".to_string());
        format!(
            "homebrew-taps-{}-{}.json",
            update,
            self.export_date.format(FILE_STAMP)
        )
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write into `dir` under [`TapExport::file_name`], returning the path
    pub fn write_into(&self, dir: &Path) -> Result<std::path::PathBuf> {
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.to_json()?)?;
        info!("Exported {} taps to {}", self.taps.len(), path.display());
        Ok(path)
    }
}
