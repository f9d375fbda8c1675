//! High-level manager: the collections a front end displays, kept in sync
//! with `brew`.
//!
//! [`HomebrewManager`] ties together the Homebrew client, the output parser,
//! the cache and the event channel. Front ends call the `refresh_*` and
//! mutating methods and re-render on [`ManagerEvent`]s.
//!
//! # Quick Start
//!
//! ```no_run
//! use kettle::{HomebrewManager, Settings};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let manager = HomebrewManager::new(Settings::from_env());
//!     manager.load_cached().await?;
//!
//!     let packages = manager.refresh_packages().await?;
//!     for pkg in packages {
//!         println!("{} {}", pkg.name, pkg.version);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Concurrency
//!
//! Refreshes of different kinds run independently. Within one kind at most
//! one refresh is in flight: a caller that queued behind a refresh that has
//! since completed gets that refresh's result rather than starting another.

use crate::backup::{BackupBundle, TapExport};
use crate::brew::Homebrew;
use crate::cache::{CacheStore, Cached, keys};
use crate::config::Settings;
use crate::error::{KettleError, Result};
use crate::events::{self, ManagerEvent, ResourceKind};
use crate::models::{BrewVersion, Cask, Package, Service, Tap, TapInfo};
use crate::parser::{OutputParser, TextOutputParser};
use crate::plist::{self, PlistValue};
use crate::runner::{CommandRunner, ProcessRunner, StreamCallbacks, StreamHandle};
use crate::services;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::{Mutex, RwLock, broadcast};
use tracing::{debug, info, warn};

/// A collection and when it was last refreshed
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    pub items: Vec<T>,
    /// `None` until the first refresh or cache load
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            updated_at: None,
        }
    }
}

impl<T> Collection<T> {
    fn new(items: Vec<T>, updated_at: DateTime<Utc>) -> Self {
        Self {
            items,
            updated_at: Some(updated_at),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of a mutating command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult {
    /// What was done, e.g. `"install"`
    pub action: String,
    /// Package, tap or service name
    pub name: String,
    /// Stdout of the brew command
    pub output: String,
    /// Time taken (milliseconds)
    pub time_ms: u64,
}

#[derive(Default)]
struct State {
    packages: Collection<Package>,
    casks: Collection<Cask>,
    services: Collection<Service>,
    taps: Collection<Tap>,
    tap_infos: BTreeMap<String, TapInfo>,
}

/// Everything `load_cached` reads, gathered off the async runtime
struct CachedState {
    packages: Option<Cached<Vec<Package>>>,
    casks: Option<Cached<Vec<Cask>>>,
    services: Option<Cached<Vec<Service>>>,
    taps: Option<Cached<Vec<Tap>>>,
    tap_infos: Option<Cached<BTreeMap<String, TapInfo>>>,
}

impl CachedState {
    fn read(cache: &CacheStore) -> Result<Self> {
        Ok(Self {
            packages: cache.load(keys::PACKAGES)?,
            casks: cache.load(keys::CASKS)?,
            services: cache.load(keys::SERVICES)?,
            taps: cache.load(keys::TAPS)?,
            tap_infos: cache.load(keys::TAP_INFOS)?,
        })
    }

    fn apply(self, state: &mut State) {
        if let Some(cached) = self.packages {
            state.packages = Collection::new(cached.data, cached.updated_at);
        }
        if let Some(cached) = self.casks {
            state.casks = Collection::new(cached.data, cached.updated_at);
        }
        if let Some(cached) = self.services {
            state.services = Collection::new(cached.data, cached.updated_at);
        }
        if let Some(cached) = self.taps {
            state.taps = Collection::new(cached.data, cached.updated_at);
        }
        if let Some(cached) = self.tap_infos {
            state.tap_infos = cached.data;
        }
    }
}

/// Single-flight guard for one resource kind
#[derive(Default)]
struct Flight {
    lock: Mutex<()>,
    generation: AtomicU64,
}

/// Owns the displayed collections and keeps them in sync with `brew`.
///
/// Generic over the runner and parser so tests can substitute both; the
/// defaults drive the real `brew` executable.
pub struct HomebrewManager<R = ProcessRunner, P = TextOutputParser> {
    brew: Homebrew<R>,
    parser: P,
    cache: CacheStore,
    settings: Settings,
    state: RwLock<State>,
    flights: [Flight; 4],
    events: broadcast::Sender<ManagerEvent>,
}

impl HomebrewManager {
    /// Create a manager driving the real `brew` executable.
    ///
    /// Locating `brew` happens here; a missing installation is not an error
    /// until a command is attempted (see [`HomebrewManager::is_homebrew_installed`]).
    pub fn new(settings: Settings) -> Self {
        Self::with_parts(settings, ProcessRunner, TextOutputParser)
    }
}

impl<R: CommandRunner, P: OutputParser> HomebrewManager<R, P> {
    pub fn with_parts(settings: Settings, runner: R, parser: P) -> Self {
        let (events, _) = events::channel();
        Self {
            brew: Homebrew::with_runner(&settings, runner),
            parser,
            cache: CacheStore::from_settings(&settings),
            settings,
            state: RwLock::new(State::default()),
            flights: Default::default(),
            events,
        }
    }

    /// Receive change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<ManagerEvent> {
        self.events.subscribe()
    }

    pub fn homebrew(&self) -> &Homebrew<R> {
        &self.brew
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_homebrew_installed(&self) -> bool {
        self.brew.is_installed()
    }

    fn emit(&self, event: ManagerEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Populate the collections from the cache without running `brew`.
    ///
    /// Missing or unreadable entries leave the collection empty.
    pub async fn load_cached(&self) -> Result<()> {
        let cache = self.cache.clone();
        let loaded = tokio::task::spawn_blocking(move || CachedState::read(&cache))
            .await
            .map_err(|e| KettleError::Io(std::io::Error::other(e)))??;

        let mut state = self.state.write().await;
        loaded.apply(&mut state);
        debug!(
            "Loaded cache: {} packages, {} casks, {} services, {} taps",
            state.packages.len(),
            state.casks.len(),
            state.services.len(),
            state.taps.len()
        );
        Ok(())
    }

    pub async fn packages(&self) -> Collection<Package> {
        self.state.read().await.packages.clone()
    }

    pub async fn casks(&self) -> Collection<Cask> {
        self.state.read().await.casks.clone()
    }

    pub async fn services(&self) -> Collection<Service> {
        self.state.read().await.services.clone()
    }

    pub async fn taps(&self) -> Collection<Tap> {
        self.state.read().await.taps.clone()
    }

    pub async fn tap_infos(&self) -> BTreeMap<String, TapInfo> {
        self.state.read().await.tap_infos.clone()
    }

    /// Write to the cache; failure costs only persistence, never the refresh
    async fn persist<T>(&self, key: &'static str, data: T) -> DateTime<Utc>
    where
        T: Serialize + Send + 'static,
    {
        let stamp = Utc::now();
        self.persist_at(key, data, stamp).await;
        stamp
    }

    async fn persist_at<T>(&self, key: &'static str, data: T, at: DateTime<Utc>)
    where
        T: Serialize + Send + 'static,
    {
        let cache = self.cache.clone();
        match tokio::task::spawn_blocking(move || cache.save_at(key, &data, at)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to cache {}: {}", key, e),
            Err(e) => warn!("Cache write for {} did not complete: {}", key, e),
        }
    }

    async fn single_flight<T, F, Fut>(
        &self,
        kind: ResourceKind,
        force: bool,
        current: impl FnOnce(&State) -> Vec<T>,
        refresh: F,
    ) -> Result<Vec<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        let flight = &self.flights[kind.index()];
        let seen = flight.generation.load(Ordering::Acquire);
        let _guard = flight.lock.lock().await;

        // A forced refresh must observe changes made after it was requested
        if !force && flight.generation.load(Ordering::Acquire) != seen {
            debug!("{} refreshed while waiting, reusing result", kind);
            return Ok(current(&*self.state.read().await));
        }

        self.emit(ManagerEvent::RefreshStarted(kind));
        match refresh().await {
            Ok(items) => {
                flight.generation.fetch_add(1, Ordering::AcqRel);
                self.emit(ManagerEvent::RefreshFinished {
                    kind,
                    count: items.len(),
                });
                Ok(items)
            }
            Err(e) => {
                warn!("Failed to refresh {}: {}", kind, e);
                self.emit(ManagerEvent::RefreshFailed {
                    kind,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Reload installed formulae from `brew list --formula`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when Homebrew is not installed and
    /// `CommandFailed` when `brew` exits non-zero. The previous collection
    /// is kept on failure.
    pub async fn refresh_packages(&self) -> Result<Vec<Package>> {
        self.reload_packages(false).await
    }

    async fn reload_packages(&self, force: bool) -> Result<Vec<Package>> {
        self.single_flight(
            ResourceKind::Packages,
            force,
            |s| s.packages.items.clone(),
            || async move {
                info!("Refreshing packages");
                let output = self.brew.list_formulae().await?;
                let packages = self.parser.parse_packages(&output);
                let stamp = self.persist(keys::PACKAGES, packages.clone()).await;
                self.state.write().await.packages = Collection::new(packages.clone(), stamp);
                info!("Refreshed {} packages", packages.len());
                Ok(packages)
            },
        )
        .await
    }

    /// Reload installed casks from `brew list --cask`
    pub async fn refresh_casks(&self) -> Result<Vec<Cask>> {
        self.reload_casks(false).await
    }

    async fn reload_casks(&self, force: bool) -> Result<Vec<Cask>> {
        self.single_flight(
            ResourceKind::Casks,
            force,
            |s| s.casks.items.clone(),
            || async move {
                info!("Refreshing casks");
                let output = self.brew.list_casks().await?;
                let casks = self.parser.parse_casks(&output);
                let stamp = self.persist(keys::CASKS, casks.clone()).await;
                self.state.write().await.casks = Collection::new(casks.clone(), stamp);
                info!("Refreshed {} casks", casks.len());
                Ok(casks)
            },
        )
        .await
    }

    /// Reload services from `brew services list`
    pub async fn refresh_services(&self) -> Result<Vec<Service>> {
        self.reload_services(false).await
    }

    async fn reload_services(&self, force: bool) -> Result<Vec<Service>> {
        self.single_flight(
            ResourceKind::Services,
            force,
            |s| s.services.items.clone(),
            || async move {
                info!("Refreshing services");
                let output = self.brew.services_list().await?;
                let services = self.parser.parse_services(&output);
                let stamp = self.persist(keys::SERVICES, services.clone()).await;
                self.state.write().await.services = Collection::new(services.clone(), stamp);
                info!("Refreshed {} services", services.len());
                Ok(services)
            },
        )
        .await
    }

    /// Reload taps from `brew tap`, then fetch `brew tap-info` for each.
    ///
    /// Tap details are fetched concurrently (bounded by
    /// [`Settings::tap_info_concurrency`]). A tap whose details cannot be
    /// fetched is logged and left without details; it does not fail the
    /// refresh.
    pub async fn refresh_taps(&self) -> Result<Vec<Tap>> {
        self.reload_taps(false).await
    }

    async fn reload_taps(&self, force: bool) -> Result<Vec<Tap>> {
        self.single_flight(
            ResourceKind::Taps,
            force,
            |s| s.taps.items.clone(),
            || async move {
                info!("Refreshing taps");
                let output = self.brew.taps().await?;
                let taps = self.parser.parse_taps(&output);
                let infos = self.fetch_tap_infos(&taps).await;

                let stamp = self.persist(keys::TAPS, taps.clone()).await;
                self.persist(keys::TAP_INFOS, infos.clone()).await;
                {
                    let mut state = self.state.write().await;
                    state.taps = Collection::new(taps.clone(), stamp);
                    state.tap_infos = infos;
                }
                info!("Refreshed {} taps", taps.len());
                Ok(taps)
            },
        )
        .await
    }

    async fn fetch_tap_infos(&self, taps: &[Tap]) -> BTreeMap<String, TapInfo> {
        stream::iter(taps)
            .map(|tap| async move {
                match self.fetch_tap_info(&tap.name).await {
                    Ok(info) => Some((tap.name.clone(), info)),
                    Err(e) => {
                        warn!("Failed to fetch tap info for {}: {}", tap.name, e);
                        None
                    }
                }
            })
            .buffer_unordered(self.settings.tap_info_concurrency.max(1))
            .filter_map(|entry| async move { entry })
            .collect()
            .await
    }

    async fn fetch_tap_info(&self, name: &str) -> Result<TapInfo> {
        let output = self.brew.tap_info(name).await?;
        let info = self.parser.parse_tap_info(&output);
        if info.is_empty() {
            debug!("No recognisable fields in tap-info for {}", name);
        }
        Ok(info)
    }

    /// Details for one tap, updating the stored map
    pub async fn tap_info(&self, name: &str) -> Result<TapInfo> {
        let info = self.fetch_tap_info(name).await?;
        let infos = {
            let mut state = self.state.write().await;
            state.tap_infos.insert(name.to_string(), info.clone());
            state.tap_infos.clone()
        };
        self.persist(keys::TAP_INFOS, infos).await;
        Ok(info)
    }

    /// Full record for one formula from `brew info`
    pub async fn package_details(&self, name: &str) -> Result<Package> {
        let output = self.brew.info(name).await?;
        let details = self.parser.parse_package_details(&output);

        let installed = self
            .state
            .read()
            .await
            .packages
            .items
            .iter()
            .find(|p| p.name == name)
            .cloned();
        let base = installed.unwrap_or_else(|| {
            let mut pkg = Package::installed(name);
            pkg.installed = false;
            pkg
        });
        Ok(base.with_details(details))
    }

    async fn mutate<F, Fut>(
        &self,
        kind: ResourceKind,
        action: &'static str,
        name: &str,
        command: F,
    ) -> Result<OperationResult>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let start = Instant::now();
        info!("Running {} {}", action, name);
        let output = command().await?;
        info!("Finished {} {}", action, name);
        self.emit(ManagerEvent::Changed {
            kind,
            action,
            name: name.to_string(),
        });

        // Always rerun `brew`: a refresh already in flight predates the change
        match kind {
            ResourceKind::Packages => self.reload_packages(true).await.map(|_| ())?,
            ResourceKind::Casks => self.reload_casks(true).await.map(|_| ())?,
            ResourceKind::Services => self.reload_services(true).await.map(|_| ())?,
            ResourceKind::Taps => self.reload_taps(true).await.map(|_| ())?,
        }

        Ok(OperationResult {
            action: action.to_string(),
            name: name.to_string(),
            output,
            time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Install a formula, then refresh the package list.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kettle::{HomebrewManager, Settings};
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let manager = HomebrewManager::new(Settings::from_env());
    ///     let result = manager.install_package("ripgrep").await?;
    ///     println!("Installed {} in {}ms", result.name, result.time_ms);
    ///     Ok(())
    /// }
    /// ```
    pub async fn install_package(&self, name: &str) -> Result<OperationResult> {
        self.mutate(ResourceKind::Packages, "install", name, || {
            self.brew.install(name)
        })
        .await
    }

    pub async fn uninstall_package(&self, name: &str) -> Result<OperationResult> {
        self.mutate(ResourceKind::Packages, "uninstall", name, || {
            self.brew.uninstall(name)
        })
        .await
    }

    pub async fn upgrade_package(&self, name: &str) -> Result<OperationResult> {
        self.mutate(ResourceKind::Packages, "upgrade", name, || {
            self.brew.upgrade(name)
        })
        .await
    }

    /// Add a tap. `url` is only needed for taps outside GitHub's
    /// `owner/homebrew-repo` convention.
    pub async fn add_tap(&self, name: &str, url: Option<&str>) -> Result<OperationResult> {
        self.mutate(ResourceKind::Taps, "tap", name, || self.brew.tap(name, url))
            .await
    }

    pub async fn remove_tap(&self, name: &str) -> Result<OperationResult> {
        let result = self
            .mutate(ResourceKind::Taps, "untap", name, || self.brew.untap(name))
            .await?;
        let infos = {
            let mut state = self.state.write().await;
            state.tap_infos.remove(name);
            state.tap_infos.clone()
        };
        self.persist(keys::TAP_INFOS, infos).await;
        Ok(result)
    }

    pub async fn start_service(&self, name: &str) -> Result<OperationResult> {
        self.mutate(ResourceKind::Services, "start", name, || {
            self.brew.services_start(name)
        })
        .await
    }

    pub async fn stop_service(&self, name: &str) -> Result<OperationResult> {
        self.mutate(ResourceKind::Services, "stop", name, || {
            self.brew.services_stop(name)
        })
        .await
    }

    /// `brew services info` as key/value pairs
    pub async fn service_info(&self, name: &str) -> Result<BTreeMap<String, String>> {
        let output = self.brew.services_info(name).await?;
        Ok(self.parser.parse_service_info(&output))
    }

    /// Parse a service's launchd property list.
    ///
    /// The path comes from the last service refresh (refreshing first when
    /// the service is not known yet), falling back to the conventional
    /// LaunchAgents location.
    ///
    /// # Errors
    ///
    /// `InvalidState` when no configuration file can be found, `Io` when it
    /// cannot be read, `Plist` when it is not a valid property list.
    pub async fn service_config(&self, name: &str) -> Result<PlistValue> {
        let known = self.find_service(name).await;
        let service = match known {
            Some(service) => Some(service),
            None => {
                self.refresh_services().await?;
                self.find_service(name).await
            }
        };

        let reported = service.and_then(|s| s.file_path);
        let path = services::resolve_config_path(name, reported.as_deref()).ok_or_else(|| {
            KettleError::InvalidState(format!("No configuration file found for service {}", name))
        })?;

        debug!("Reading service configuration {}", path.display());
        let xml = self.brew.read_config_file(&path).await?;
        plist::parse(&xml)
    }

    async fn find_service(&self, name: &str) -> Option<Service> {
        self.state
            .read()
            .await
            .services
            .items
            .iter()
            .find(|s| s.name == name)
            .cloned()
    }

    /// Parsed `brew --version`
    pub async fn version(&self) -> Result<BrewVersion> {
        let output = self.brew.version().await?;
        self.parser.parse_version(&output)
    }

    /// Start `brew doctor`, streaming its output to `callbacks`
    pub fn doctor(&self, callbacks: StreamCallbacks) -> Result<StreamHandle> {
        info!("Running brew doctor");
        self.brew.doctor(callbacks)
    }

    /// Install Homebrew itself and pick up the new `brew`
    pub async fn install_homebrew(&mut self) -> Result<()> {
        self.brew.install_homebrew(&self.settings).await
    }

    /// Snapshot the current packages, services and taps
    pub async fn backup(&self) -> BackupBundle {
        let state = self.state.read().await;
        BackupBundle::new(
            state.packages.items.clone(),
            state.services.items.clone(),
            state.taps.items.clone(),
        )
    }

    /// Pretty-printed backup document
    pub async fn backup_json(&self) -> Result<String> {
        info!("Creating configuration backup");
        self.backup().await.to_json()
    }

    /// Replace the current collections with a backup's contents.
    ///
    /// Only the displayed state changes; nothing is installed or removed.
    /// Tap details are kept only for taps present in the backup.
    pub async fn restore(&self, bundle: BackupBundle) {
        info!("Restoring configuration from backup");
        let (packages, services, taps) =
            (bundle.packages.len(), bundle.services.len(), bundle.taps.len());

        let now = Utc::now();
        self.persist_at(keys::PACKAGES, bundle.packages.clone(), now).await;
        self.persist_at(keys::SERVICES, bundle.services.clone(), now).await;
        self.persist_at(keys::TAPS, bundle.taps.clone(), now).await;
        let infos = {
            let mut state = self.state.write().await;
            state
                .tap_infos
                .retain(|name, _| bundle.taps.iter().any(|tap| &tap.name == name));
            state.packages = Collection::new(bundle.packages, now);
            state.services = Collection::new(bundle.services, now);
            state.taps = Collection::new(bundle.taps, now);
            state.tap_infos.clone()
        };
        self.persist(keys::TAP_INFOS, infos).await;

        self.emit(ManagerEvent::Restored {
            packages,
            services,
            taps,
        });
    }

    /// Decode a backup document and restore it
    pub async fn restore_json(&self, json: &str) -> Result<()> {
        let bundle = BackupBundle::from_json(json)?;
        self.restore(bundle).await;
        Ok(())
    }

    /// Taps and their details, as shown on the export screen
    pub async fn export_taps(&self) -> TapExport {
        let state = self.state.read().await;
        TapExport::new(
            state.taps.items.clone(),
            state.tap_infos.clone(),
            state.taps.updated_at,
        )
    }

    /// Remove every cache entry. In-memory collections are untouched.
    pub fn clear_cache(&self) -> Result<usize> {
        let removed = self.cache.clear()?;
        self.emit(ManagerEvent::CacheCleared);
        Ok(removed)
    }

    /// Typed read of a single cache entry
    pub fn cached<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        Ok(self.cache.load(key)?.map(|cached| cached.data))
    }
}
