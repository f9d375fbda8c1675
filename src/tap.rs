//! Tap naming rules - splitting "owner/repo" and deriving the GitHub remote

use crate::error::{KettleError, Result};
use crate::models::Tap;

/// Parse a tap name into (owner, repo) components.
/// Input: "owner/repo" → Output: ("owner", "repo")
pub fn parse_tap_name(tap: &str) -> Result<(&str, &str)> {
    let parts: Vec<&str> = tap.trim().split('/').collect();
    if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
        return Err(KettleError::ParsingFailed(format!(
            "Invalid tap name format. Expected 'owner/repo', got '{}'",
            tap
        )));
    }

    Ok((parts[0], parts[1]))
}

/// GitHub repository name for a tap repo: "core" → "homebrew-core".
/// The prefix is always added, matching how `brew tap` resolves names.
pub fn repository_name(repo: &str) -> String {
    format!("homebrew-{}", repo)
}

/// Conventional remote URL for a tap
pub fn tap_url(owner: &str, repo: &str) -> String {
    format!("https://github.com/{}/{}", owner, repository_name(repo))
}

/// Build an installed tap record from its "owner/repo" name
pub fn tap_from_name(name: &str) -> Result<Tap> {
    let (owner, repo) = parse_tap_name(name)?;
    Ok(Tap {
        name: format!("{}/{}", owner, repo),
        url: tap_url(owner, repo),
        installed: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tap_name() {
        let (owner, repo) = parse_tap_name("owner/repo").unwrap();
        assert_eq!(owner, "owner");
        assert_eq!(repo, "repo");
    }

    #[test]
    fn test_parse_tap_name_invalid() {
        assert!(parse_tap_name("invalid").is_err());
        assert!(parse_tap_name("too/many/slashes").is_err());
        assert!(parse_tap_name("/repo").is_err());
    }

    #[test]
    fn test_tap_url() {
        assert_eq!(
            tap_url("homebrew", "core"),
            "https://github.com/homebrew/homebrew-core"
        );
        assert_eq!(
            tap_url("user", "tools"),
            "https://github.com/user/homebrew-tools"
        );
        assert_eq!(
            tap_url("user", "homebrew-tools"),
            "https://github.com/user/homebrew-homebrew-tools"
        );
    }

    #[test]
    fn test_tap_from_name() {
        let tap = tap_from_name("homebrew/cask").unwrap();
        assert_eq!(tap.name, "homebrew/cask");
        assert_eq!(tap.url, "https://github.com/homebrew/homebrew-cask");
        assert!(tap.installed);
    }
}
