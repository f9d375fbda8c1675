//! Explicit runtime configuration.
//!
//! [`Settings`] is built once (environment first, then command-line flags)
//! and handed to every component that needs it. Nothing reads configuration
//! from global state after start-up.
//!
//! | Variable | Effect |
//! |---|---|
//! | `KETTLE_BREW_PATH` | use this `brew` executable instead of probing |
//! | `KETTLE_CACHE_DIR` | where cache entries are written |
//! | `KETTLE_TAP_INFO_CONCURRENCY` | parallel `brew tap-info` calls during a tap refresh |
//! | `KETTLE_NO_AUTO_UPDATE` | export `HOMEBREW_NO_AUTO_UPDATE=1` to mutating commands |

use std::path::PathBuf;

/// Install locations probed before falling back to `PATH`
pub const DEFAULT_BREW_PATHS: &[&str] = &[
    "/opt/homebrew/bin/brew",              // Apple Silicon
    "/usr/local/bin/brew",                 // Intel
    "/home/linuxbrew/.linuxbrew/bin/brew", // Linux
];

const DEFAULT_TAP_INFO_CONCURRENCY: usize = 4;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Explicit `brew` executable; skips probing when set
    pub brew_path: Option<PathBuf>,
    /// Fixed locations probed, in order, before `PATH`
    pub search_paths: Vec<PathBuf>,
    /// Directory holding the JSON cache entries
    pub cache_dir: PathBuf,
    /// Upper bound on concurrent `brew tap-info` calls
    pub tap_info_concurrency: usize,
    /// Suppress Homebrew's implicit `brew update` before install/upgrade
    pub no_auto_update: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            brew_path: None,
            search_paths: DEFAULT_BREW_PATHS.iter().map(PathBuf::from).collect(),
            cache_dir: default_cache_dir(),
            tap_info_concurrency: DEFAULT_TAP_INFO_CONCURRENCY,
            no_auto_update: false,
        }
    }
}

impl Settings {
    /// Defaults overridden by `KETTLE_*` environment variables
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Some(path) = std::env::var_os("KETTLE_BREW_PATH").filter(|p| !p.is_empty()) {
            settings.brew_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = std::env::var_os("KETTLE_CACHE_DIR").filter(|p| !p.is_empty()) {
            settings.cache_dir = PathBuf::from(dir);
        }
        if let Some(n) = std::env::var("KETTLE_TAP_INFO_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            settings.tap_info_concurrency = n.max(1);
        }
        settings.no_auto_update = std::env::var("KETTLE_NO_AUTO_UPDATE")
            .map(|v| v != "0" && !v.is_empty())
            .unwrap_or(false);

        settings
    }

    pub fn with_brew_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.brew_path = Some(path.into());
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn with_tap_info_concurrency(mut self, n: usize) -> Self {
        self.tap_info_concurrency = n.max(1);
        self
    }

    /// Environment overrides passed to commands that change the installation
    pub fn mutation_env(&self) -> Vec<(String, String)> {
        if self.no_auto_update {
            vec![("HOMEBREW_NO_AUTO_UPDATE".to_string(), "1".to_string())]
        } else {
            Vec::new()
        }
    }
}

/// `<data dir>/kettle/cache` - Application Support on macOS, XDG data on Linux
pub fn default_cache_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("kettle").join("cache"),
        None => PathBuf::from(".kettle/cache"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_search_paths() {
        let settings = Settings::default();
        assert_eq!(settings.search_paths.len(), DEFAULT_BREW_PATHS.len());
        assert_eq!(
            settings.search_paths[0],
            PathBuf::from("/opt/homebrew/bin/brew")
        );
        assert!(settings.brew_path.is_none());
    }

    #[test]
    fn test_builders() {
        let settings = Settings::default()
            .with_brew_path("/tmp/brew")
            .with_cache_dir("/tmp/cache")
            .with_tap_info_concurrency(0);
        assert_eq!(settings.brew_path, Some(PathBuf::from("/tmp/brew")));
        assert_eq!(settings.cache_dir, PathBuf::from("/tmp/cache"));
        assert_eq!(settings.tap_info_concurrency, 1);
    }

    #[test]
    fn test_mutation_env() {
        let mut settings = Settings::default();
        assert!(settings.mutation_env().is_empty());
        settings.no_auto_update = true;
        assert_eq!(
            settings.mutation_env(),
            vec![("HOMEBREW_NO_AUTO_UPDATE".to_string(), "1".to_string())]
        );
    }

    #[test]
    fn test_default_cache_dir_is_namespaced() {
        let dir = default_cache_dir();
        assert!(dir.ends_with("kettle/cache"));
    }
}
