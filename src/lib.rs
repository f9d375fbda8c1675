//! Library interface for kettle, a Homebrew front end
//!
//! Drives the `brew` executable, parses its human-readable reports into
//! typed records, caches them as JSON and reads service property lists.
//! [`HomebrewManager`] is the entry point for front ends.

pub mod backup;
pub mod brew;
pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod manager;
pub mod models;
pub mod parser;
pub mod plist;
pub mod runner;
pub mod services;
pub mod tap;

// Re-export commonly used types
pub use backup::{BackupBundle, TapExport};
pub use brew::Homebrew;
pub use cache::CacheStore;
pub use config::Settings;
pub use error::{KettleError, Result};
pub use events::{ManagerEvent, ResourceKind};
pub use manager::{Collection, HomebrewManager, OperationResult};
pub use models::{BrewVersion, Cask, Package, PackageDetails, Service, ServiceStatus, Tap, TapInfo};
pub use parser::{OutputParser, TextOutputParser};
pub use crate::plist::PlistValue;
pub use runner::{CommandOutput, CommandRunner, ProcessRunner, StreamCallbacks, StreamHandle};
