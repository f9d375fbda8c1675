//! Command implementations for the kettle CLI
//!
//! This module contains all command implementations organized by functional area:
//!
//! - **bundle**: Backup export/import and the tap export document
//! - **install**: Package installation, upgrade, and removal
//! - **list**: Package and cask listing
//! - **maintenance**: Status, doctor, cache, configuration, installing Homebrew
//! - **query**: Package information
//! - **services**: Background service management
//! - **tap**: Tap (repository) management
//! - **utils**: Shared utility functions (internal)

pub mod bundle;
pub mod install;
pub mod list;
pub mod maintenance;
pub mod query;
pub mod services;
pub mod tap;
pub(crate) mod utils;

pub use bundle::{backup_export, backup_import, export_taps};
pub use install::{install, uninstall, upgrade};
pub use list::{casks, packages};
pub use maintenance::{cache_clear, config, doctor, install_homebrew, status};
pub use query::info;
pub use services::{ServicesAction, services};
pub use tap::{tap, tap_info, taps, untap};
