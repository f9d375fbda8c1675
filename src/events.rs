//! Change notifications published by the manager.
//!
//! Front ends subscribe with [`crate::manager::HomebrewManager::subscribe`]
//! and re-render whatever they show when an event arrives. A slow subscriber
//! that falls more than [`EVENT_CAPACITY`] events behind sees `Lagged` and
//! should re-read the collections it cares about.

use crate::cache::keys;
use std::fmt;
use tokio::sync::broadcast;

pub const EVENT_CAPACITY: usize = 64;

/// A refreshable collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Packages,
    Casks,
    Services,
    Taps,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Packages,
        ResourceKind::Casks,
        ResourceKind::Services,
        ResourceKind::Taps,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn cache_key(self) -> &'static str {
        match self {
            ResourceKind::Packages => keys::PACKAGES,
            ResourceKind::Casks => keys::CASKS,
            ResourceKind::Services => keys::SERVICES,
            ResourceKind::Taps => keys::TAPS,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cache_key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerEvent {
    RefreshStarted(ResourceKind),
    RefreshFinished { kind: ResourceKind, count: usize },
    RefreshFailed { kind: ResourceKind, message: String },
    /// A mutating command (install, tap, start...) completed
    Changed {
        kind: ResourceKind,
        action: &'static str,
        name: String,
    },
    Restored {
        packages: usize,
        services: usize,
        taps: usize,
    },
    CacheCleared,
}

pub fn channel() -> (broadcast::Sender<ManagerEvent>, broadcast::Receiver<ManagerEvent>) {
    broadcast::channel(EVENT_CAPACITY)
}
