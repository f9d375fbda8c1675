//! launchd conventions for Homebrew services.
//!
//! `brew services list` normally reports the plist file for each service, but
//! rows for services that were never loaded leave the column empty. These
//! helpers recover the conventional location so the configuration can still
//! be shown.

use std::path::PathBuf;

/// Get LaunchAgents directory for current user
pub fn launch_agents_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join("Library/LaunchAgents"),
        None => PathBuf::from("~/Library/LaunchAgents"),
    }
}

/// Get the launchd label for a formula
pub fn service_label(formula: &str) -> String {
    format!("homebrew.mxcl.{}", formula)
}

/// Get the plist filename for a formula
pub fn plist_filename(formula: &str) -> String {
    format!("{}.plist", service_label(formula))
}

/// Conventional plist path for a formula's user agent
pub fn plist_path(formula: &str) -> PathBuf {
    launch_agents_dir().join(plist_filename(formula))
}

/// Expand a leading `~` the way `brew services list` abbreviates home
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Resolve where a service's configuration lives, if anywhere
pub fn resolve_config_path(name: &str, reported: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = reported.filter(|p| !p.is_empty()) {
        return Some(expand_tilde(path));
    }
    let fallback = plist_path(name);
    fallback.is_file().then_some(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_label() {
        assert_eq!(service_label("postgresql@16"), "homebrew.mxcl.postgresql@16");
        assert_eq!(plist_filename("redis"), "homebrew.mxcl.redis.plist");
    }

    #[test]
    fn test_plist_path() {
        let path = plist_path("redis");
        assert!(
            path.to_string_lossy()
                .ends_with("Library/LaunchAgents/homebrew.mxcl.redis.plist")
        );
    }

    #[test]
    fn test_expand_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_tilde("~/Library/LaunchAgents/x.plist"),
                home.join("Library/LaunchAgents/x.plist")
            );
        }
        assert_eq!(
            expand_tilde("/Library/LaunchDaemons/x.plist"),
            PathBuf::from("/Library/LaunchDaemons/x.plist")
        );
    }

    #[test]
    fn test_resolve_config_path_prefers_reported() {
        let path = resolve_config_path("unbound", Some("/Library/LaunchDaemons/u.plist"));
        assert_eq!(path, Some(PathBuf::from("/Library/LaunchDaemons/u.plist")));
    }

    #[test]
    fn test_resolve_config_path_missing() {
        assert_eq!(
            resolve_config_path("definitely-not-a-real-service-kettle", None),
            None
        );
    }
}
