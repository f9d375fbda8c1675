//! Parsing of `brew` text output into typed records.
//!
//! Homebrew's human-readable output is not a stable interface, so everything
//! here is heuristic line splitting. Callers go through [`OutputParser`]; the
//! free functions are exposed for direct use and benchmarking.
//!
//! Lines that cannot be interpreted are skipped (and logged), never fatal.

use crate::error::{KettleError, Result};
use crate::models::{
    BrewVersion, Cask, Package, PackageDetails, RepositoryRevision, Service, ServiceStatus, Tap,
    TapInfo,
};
use crate::tap::tap_from_name;
use std::collections::BTreeMap;
use tracing::warn;

/// Turns raw command output into records
pub trait OutputParser: Send + Sync {
    fn parse_packages(&self, output: &str) -> Vec<Package>;
    fn parse_casks(&self, output: &str) -> Vec<Cask>;
    fn parse_services(&self, output: &str) -> Vec<Service>;
    fn parse_taps(&self, output: &str) -> Vec<Tap>;
    fn parse_tap_info(&self, output: &str) -> TapInfo;
    fn parse_package_details(&self, output: &str) -> PackageDetails;
    fn parse_service_info(&self, output: &str) -> BTreeMap<String, String>;
    fn parse_version(&self, output: &str) -> Result<BrewVersion>;
}

/// Line heuristics over Homebrew's default human-readable output
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOutputParser;

impl OutputParser for TextOutputParser {
    fn parse_packages(&self, output: &str) -> Vec<Package> {
        parse_package_list(output)
    }

    fn parse_casks(&self, output: &str) -> Vec<Cask> {
        parse_cask_list(output)
    }

    fn parse_services(&self, output: &str) -> Vec<Service> {
        parse_service_list(output)
    }

    fn parse_taps(&self, output: &str) -> Vec<Tap> {
        parse_tap_list(output)
    }

    fn parse_tap_info(&self, output: &str) -> TapInfo {
        parse_tap_info(output)
    }

    fn parse_package_details(&self, output: &str) -> PackageDetails {
        parse_package_details(output)
    }

    fn parse_service_info(&self, output: &str) -> BTreeMap<String, String> {
        parse_service_info(output)
    }

    fn parse_version(&self, output: &str) -> Result<BrewVersion> {
        parse_version(output)
    }
}

fn content_lines(output: &str) -> impl Iterator<Item = &str> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("==>"))
}

/// `brew list --formula [--versions]`
pub fn parse_package_list(output: &str) -> Vec<Package> {
    content_lines(output)
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            let mut package = Package::installed(name);
            package.version = parts.collect::<Vec<_>>().join(" ");
            Some(package)
        })
        .collect()
}

/// `brew list --cask`
pub fn parse_cask_list(output: &str) -> Vec<Cask> {
    content_lines(output)
        .filter_map(|line| line.split_whitespace().next())
        .map(Cask::new)
        .collect()
}

/// `brew services list`
///
/// ```text
/// Name       Status  User File
/// postgresql started alex ~/Library/LaunchAgents/homebrew.mxcl.postgresql.plist
/// redis      none
/// unbound    error   256 root /Library/LaunchDaemons/homebrew.mxcl.unbound.plist
/// ```
pub fn parse_service_list(output: &str) -> Vec<Service> {
    let mut services = Vec::new();

    // First line is the column header (or "No services available to control.")
    for line in output.lines().skip(1) {
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.is_empty() {
            continue;
        }
        if columns.len() < 2 {
            warn!("Skipping malformed service line: {}", line.trim());
            continue;
        }

        let status = ServiceStatus::from_column(columns[1]);
        let mut rest = &columns[2..];
        if status == ServiceStatus::Error
            && rest.first().is_some_and(|c| c.parse::<i32>().is_ok())
        {
            rest = &rest[1..];
        }

        let mut service = Service::new(columns[0], status);
        match rest.first() {
            Some(first) if looks_like_path(first) => {
                service.file_path = Some(rest.join(" "));
            }
            Some(user) => {
                service.user = Some(user.to_string());
                if rest.len() > 1 {
                    service.file_path = Some(rest[1..].join(" "));
                }
            }
            None => {}
        }
        services.push(service);
    }

    services
}

fn looks_like_path(column: &str) -> bool {
    column.starts_with('/') || column.starts_with('~')
}

/// `brew tap`
pub fn parse_tap_list(output: &str) -> Vec<Tap> {
    content_lines(output)
        .filter_map(|line| match tap_from_name(line) {
            Ok(tap) => Some(tap),
            Err(_) => {
                warn!("Skipping invalid tap line: {}", line);
                None
            }
        })
        .collect()
}

/// Case-insensitive prefix strip, returning the trimmed remainder
fn strip_prefix_ci<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        line.get(prefix.len()..).map(str::trim)
    } else {
        None
    }
}

/// `brew tap-info <name>`
///
/// ```text
/// homebrew/cask: Installed
/// 10,000 commands, 5,000 casks
/// /opt/homebrew/Library/Taps/homebrew/homebrew-cask (7,456 files, 1.1GB)
/// From: https://github.com/Homebrew/homebrew-cask
/// HEAD: abcd1234
/// last commit: 2 hours ago
/// branch: master
/// ```
///
/// Labelled reports (`Path:`, `Repository URL:`, `Files count:`, ...) are
/// read too. `Path:` wins over `Files path:` and `From:` over
/// `Repository URL:`.
pub fn parse_tap_info(output: &str) -> TapInfo {
    let mut info = TapInfo::default();
    let mut first = true;

    for raw in output.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let is_first = std::mem::replace(&mut first, false);

        if let Some(value) = strip_prefix_ci(line, "status:") {
            info.status = Some(value.to_string());
        } else if let Some(value) = strip_prefix_ci(line, "from:") {
            info.remote_url = Some(value.to_string());
        } else if let Some(value) = strip_prefix_ci(line, "head:") {
            info.head = Some(value.to_string());
        } else if let Some(value) = strip_prefix_ci(line, "last commit:") {
            info.last_commit = Some(value.to_string());
        } else if let Some(value) = strip_prefix_ci(line, "branch:") {
            info.branch = Some(value.to_string());
        } else if let Some(value) = strip_prefix_ci(line, "repository url:") {
            info.remote_url.get_or_insert_with(|| value.to_string());
        } else if let Some(value) = strip_prefix_ci(line, "path:") {
            info.path = Some(value.to_string());
        } else if let Some(value) = strip_prefix_ci(line, "files path:") {
            info.path.get_or_insert_with(|| value.to_string());
        } else if let Some(value) = strip_prefix_ci(line, "files count:") {
            let digits: String = value.chars().filter(char::is_ascii_digit).collect();
            info.file_count = digits.parse().ok();
        } else if let Some(value) = strip_prefix_ci(line, "files size:") {
            info.size = Some(value.to_string());
        } else if line.starts_with('/') {
            parse_tap_path_line(line, &mut info);
        } else if is_first && line.contains(": ") {
            // `name: Installed, 2 commands, 3 casks`
            if let Some((_, rest)) = line.split_once(": ") {
                let status = rest
                    .split(", ")
                    .map(str::trim)
                    .find(|piece| !piece.is_empty() && !piece.starts_with(|c: char| c.is_ascii_digit()));
                if let Some(status) = status {
                    info.status = Some(status.to_string());
                }
                parse_tap_counts(rest, &mut info);
            }
        } else {
            parse_tap_counts(line, &mut info);
        }
    }

    info
}

fn parse_tap_path_line(line: &str, info: &mut TapInfo) {
    let Some((path, stats)) = line.split_once(" (") else {
        info.path = Some(line.to_string());
        return;
    };
    info.path = Some(path.trim().to_string());

    let stats = stats.trim_end_matches(')');
    let mut parts = stats.split(", ");
    if let Some(files) = parts.next().filter(|p| p.contains("file")) {
        let digits: String = files.chars().filter(char::is_ascii_digit).collect();
        info.file_count = digits.parse().ok();
    }
    if let Some(size) = parts.next() {
        info.size = Some(size.trim().to_string());
    }
}

fn parse_tap_counts(line: &str, info: &mut TapInfo) {
    // Counts use thousands separators, so split on ", " rather than ','
    for piece in line.split(", ").map(str::trim) {
        if !piece.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }
        let lower = piece.to_ascii_lowercase();
        if lower.contains("command") {
            info.commands = Some(piece.to_string());
        } else if lower.contains("cask") {
            info.casks = Some(piece.to_string());
        } else if lower.contains("formula") {
            info.formulae = Some(piece.to_string());
        }
    }
}

#[derive(PartialEq)]
enum InfoSection {
    Header,
    Dependencies,
    Other,
}

/// `brew info <name>`
///
/// ```text
/// ==> wget: stable 1.24.5 (bottled), HEAD
/// Internet file retriever
/// https://www.gnu.org/software/wget/
/// ==> Dependencies
/// Build: pkgconf ✘
/// Required: libidn2 ✔, openssl@3 ✔
/// ```
pub fn parse_package_details(output: &str) -> PackageDetails {
    let mut details = PackageDetails::default();
    let mut section = InfoSection::Other;
    let mut seen_header = false;
    let mut awaiting_description = false;

    for raw in output.lines() {
        let line = raw.trim();

        if let Some(heading) = line.strip_prefix("==>") {
            let heading = heading.trim();
            awaiting_description = false;
            section = InfoSection::Other;

            if let Some(desc) = heading.strip_prefix("Description:") {
                let desc = desc.trim();
                if !desc.is_empty() {
                    details.description = Some(desc.to_string());
                }
            } else if let Some(deps) = heading.strip_prefix("Dependencies:") {
                details.dependencies.extend(dependency_names(deps));
            } else if heading == "Dependencies" {
                section = InfoSection::Dependencies;
            } else if !seen_header {
                seen_header = true;
                if let Some((_, rest)) = heading.split_once(": ") {
                    details.version = header_version(rest);
                }
                section = InfoSection::Header;
                awaiting_description = details.description.is_none();
            }
            continue;
        }

        if line.is_empty() {
            continue;
        }

        match section {
            InfoSection::Header if awaiting_description => {
                awaiting_description = false;
                if !line.starts_with("http") {
                    details.description = Some(line.to_string());
                }
            }
            InfoSection::Dependencies => {
                if let Some((kind, list)) = line.split_once(':') {
                    if matches!(kind.trim(), "Required" | "Build" | "Recommended") {
                        details.dependencies.extend(dependency_names(list));
                    }
                }
            }
            _ => {}
        }
    }

    details
}

fn header_version(rest: &str) -> Option<String> {
    let rest = rest.trim();
    let rest = rest.strip_prefix("stable ").unwrap_or(rest);
    rest.split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn dependency_names(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',')
        .filter_map(|item| item.split_whitespace().next())
        .filter(|name| !matches!(*name, "✔" | "✘"))
        .map(str::to_string)
}

/// `brew services info <name>`
pub fn parse_service_info(output: &str) -> BTreeMap<String, String> {
    output
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// `brew --version`
///
/// ```text
/// Homebrew 4.2.0
/// Homebrew/homebrew-core (git revision 1a2b3c; last commit 2024-01-01)
/// Homebrew/homebrew-cask (git revision 4d5e6f; last commit 2024-01-02)
/// ```
pub fn parse_version(output: &str) -> Result<BrewVersion> {
    let mut lines = output.lines().map(str::trim).filter(|l| !l.is_empty());
    let version = lines
        .next()
        .ok_or_else(|| KettleError::ParsingFailed("brew --version produced no output".into()))?
        .to_string();

    let mut result = BrewVersion {
        version,
        core: None,
        cask: None,
    };
    for line in lines {
        if line.contains("homebrew-core") {
            result.core = parse_revision(line);
        } else if line.contains("homebrew-cask") {
            result.cask = parse_revision(line);
        }
    }
    Ok(result)
}

fn parse_revision(line: &str) -> Option<RepositoryRevision> {
    let (_, rest) = line.split_once("(git revision ")?;
    let (revision, rest) = rest.split_once(';')?;
    let commit = rest.trim_start().strip_prefix("last commit ")?;
    let commit = commit.split_once(')').map_or(commit, |(c, _)| c);
    Some(RepositoryRevision {
        revision: revision.trim().to_string(),
        last_commit: commit.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_package_list() {
        let packages = parse_package_list("test1 1.0\ntest2 2.0\n\n");
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name, "test1");
        assert_eq!(packages[0].version, "1.0");
        assert!(packages[0].installed);
        assert!(packages[0].dependencies.is_empty());
        assert_eq!(packages[1].name, "test2");
    }

    #[test]
    fn test_parse_package_list_names_only() {
        let packages = parse_package_list("git\nopenssl@3\n");
        assert_eq!(packages[0].name, "git");
        assert!(packages[0].version.is_empty());
        assert_eq!(packages[1].name, "openssl@3");
    }

    #[test]
    fn test_parse_package_list_multiple_versions() {
        let packages = parse_package_list("python@3.12 3.12.1 3.12.2");
        assert_eq!(packages[0].version, "3.12.1 3.12.2");
    }

    #[test]
    fn test_parse_cask_list() {
        let casks = parse_cask_list("firefox\n  visual-studio-code  \n");
        assert_eq!(casks, vec![Cask::new("firefox"), Cask::new("visual-studio-code")]);
    }

    #[test]
    fn test_parse_service_list() {
        let output = "Name       Status  User File\n\
                      postgresql started alex ~/Library/LaunchAgents/homebrew.mxcl.postgresql.plist\n\
                      redis      none\n\
                      unbound    error   256 root /Library/LaunchDaemons/homebrew.mxcl.unbound.plist\n\
                      dnsmasq    stopped\n";
        let services = parse_service_list(output);
        assert_eq!(services.len(), 4);

        assert_eq!(services[0].name, "postgresql");
        assert_eq!(services[0].status, ServiceStatus::Started);
        assert_eq!(services[0].user.as_deref(), Some("alex"));
        assert_eq!(
            services[0].file_path.as_deref(),
            Some("~/Library/LaunchAgents/homebrew.mxcl.postgresql.plist")
        );

        assert_eq!(services[1].status, ServiceStatus::Stopped);
        assert!(services[1].user.is_none());

        assert_eq!(services[2].status, ServiceStatus::Error);
        assert_eq!(services[2].user.as_deref(), Some("root"));
        assert_eq!(
            services[2].file_path.as_deref(),
            Some("/Library/LaunchDaemons/homebrew.mxcl.unbound.plist")
        );

        assert_eq!(services[3].status, ServiceStatus::Stopped);
    }

    #[test]
    fn test_parse_service_list_skips_header_only() {
        assert!(parse_service_list("No services available to control.\n").is_empty());
        assert!(parse_service_list("").is_empty());
    }

    #[test]
    fn test_parse_service_list_skips_short_lines() {
        let services = parse_service_list("Name Status\nlonely\nredis started\n");
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].name, "redis");
    }

    #[test]
    fn test_parse_service_list_unknown_status() {
        let services = parse_service_list("Name Status\nfoo scheduled\n");
        assert_eq!(services[0].status, ServiceStatus::Unknown);
    }

    #[test]
    fn test_parse_tap_list() {
        let taps = parse_tap_list("homebrew/core\nnot-a-tap\nuser/tools\n");
        assert_eq!(taps.len(), 2);
        assert_eq!(taps[0].name, "homebrew/core");
        assert_eq!(taps[0].url, "https://github.com/homebrew/homebrew-core");
        assert!(taps[0].installed);
        assert_eq!(taps[1].url, "https://github.com/user/homebrew-tools");
    }

    #[test]
    fn test_parse_tap_list_drops_extra_slashes() {
        let taps = parse_tap_list("a/b/c\nowner/repo");
        assert_eq!(taps.len(), 1);
        assert_eq!(taps[0].name, "owner/repo");
    }

    #[test]
    fn test_parse_tap_info() {
        let output = "homebrew/cask: Installed\n\
                      10,000 commands, 5,000 casks\n\
                      /opt/homebrew/Library/Taps/homebrew/homebrew-cask (7,456 files, 1.1GB)\n\
                      From: https://github.com/Homebrew/homebrew-cask\n\
                      HEAD: abcd1234\n\
                      last commit: 2 hours ago\n\
                      branch: master\n";
        let info = parse_tap_info(output);
        assert_eq!(info.status.as_deref(), Some("Installed"));
        assert_eq!(info.commands.as_deref(), Some("10,000 commands"));
        assert_eq!(info.casks.as_deref(), Some("5,000 casks"));
        assert!(info.formulae.is_none());
        assert_eq!(
            info.path.as_deref(),
            Some("/opt/homebrew/Library/Taps/homebrew/homebrew-cask")
        );
        assert_eq!(info.file_count, Some(7456));
        assert_eq!(info.size.as_deref(), Some("1.1GB"));
        assert_eq!(
            info.remote_url.as_deref(),
            Some("https://github.com/Homebrew/homebrew-cask")
        );
        assert_eq!(info.head.as_deref(), Some("abcd1234"));
        assert_eq!(info.last_commit.as_deref(), Some("2 hours ago"));
        assert_eq!(info.branch.as_deref(), Some("master"));
    }

    #[test]
    fn test_parse_tap_info_status_line_and_case() {
        let output = "Status: Installed\nBranch: main\nLast Commit: 2024-01-01\n12 formulae\n";
        let info = parse_tap_info(output);
        assert_eq!(info.status.as_deref(), Some("Installed"));
        assert_eq!(info.branch.as_deref(), Some("main"));
        assert_eq!(info.last_commit.as_deref(), Some("2024-01-01"));
        assert_eq!(info.formulae.as_deref(), Some("12 formulae"));
    }

    #[test]
    fn test_parse_tap_info_unrecognised() {
        assert!(parse_tap_info("something entirely different\n").is_empty());
        assert!(parse_tap_info("").is_empty());
    }

    #[test]
    fn test_parse_tap_info_counts_on_first_line() {
        let info = parse_tap_info("user/tools: Installed, 2 commands, 3 casks
");
        assert_eq!(info.status.as_deref(), Some("Installed"));
        assert_eq!(info.commands.as_deref(), Some("2 commands"));
        assert_eq!(info.casks.as_deref(), Some("3 casks"));
        assert!(info.formulae.is_none());
    }

    #[test]
    fn test_parse_tap_info_labelled_report() {
        let output = "From: https://github.com/homebrew/homebrew-core
                      Status: Installed
                      10,000 commands, 5,000 casks
                      Remote: origin
                      Path: /opt/homebrew/Library/Taps/homebrew/homebrew-core
                      Head: abcd1234
                      Last commit: 2024-01-01
                      Repository URL: https://github.com/homebrew/homebrew-core.git
                      Branch: master
                      Files path: /opt/homebrew/Library/Taps/homebrew/homebrew-core/Formula
                      Files count: 15000
                      Files size: 100MB
";
        let info = parse_tap_info(output);
        assert_eq!(info.status.as_deref(), Some("Installed"));
        assert_eq!(info.commands.as_deref(), Some("10,000 commands"));
        assert_eq!(info.casks.as_deref(), Some("5,000 casks"));
        assert_eq!(
            info.path.as_deref(),
            Some("/opt/homebrew/Library/Taps/homebrew/homebrew-core")
        );
        assert_eq!(info.head.as_deref(), Some("abcd1234"));
        assert_eq!(info.last_commit.as_deref(), Some("2024-01-01"));
        assert_eq!(
            info.remote_url.as_deref(),
            Some("https://github.com/homebrew/homebrew-core")
        );
        assert_eq!(info.branch.as_deref(), Some("master"));
        assert_eq!(info.file_count, Some(15000));
        assert_eq!(info.size.as_deref(), Some("100MB"));
    }

    #[test]
    fn test_parse_tap_info_repository_url_without_from() {
        let info = parse_tap_info(
            "Files path: /tmp/tap/Formula
Repository URL: https://example.com/tap.git
",
        );
        assert_eq!(info.path.as_deref(), Some("/tmp/tap/Formula"));
        assert_eq!(info.remote_url.as_deref(), Some("https://example.com/tap.git"));
    }

    #[test]
    fn test_parse_tap_info_path_without_stats() {
        let info = parse_tap_info("user/tools: Installed\n/opt/homebrew/Library/Taps/user/homebrew-tools\n");
        assert_eq!(
            info.path.as_deref(),
            Some("/opt/homebrew/Library/Taps/user/homebrew-tools")
        );
        assert!(info.file_count.is_none());
    }

    #[test]
    fn test_parse_package_details() {
        let output = "==> wget: stable 1.24.5 (bottled), HEAD\n\
                      Internet file retriever\n\
                      https://www.gnu.org/software/wget/\n\
                      Installed\n\
                      ==> Dependencies\n\
                      Build: pkgconf ✘\n\
                      Required: libidn2 ✔, openssl@3 ✔\n\
                      ==> Options\n\
                      --HEAD\n";
        let details = parse_package_details(output);
        assert_eq!(details.version.as_deref(), Some("1.24.5"));
        assert_eq!(details.description.as_deref(), Some("Internet file retriever"));
        assert_eq!(details.dependencies, vec!["pkgconf", "libidn2", "openssl@3"]);
    }

    #[test]
    fn test_parse_package_details_inline_sections() {
        let output = "==> jq: stable 1.7.1\n\
                      ==> Description: Lightweight JSON processor\n\
                      ==> Dependencies: oniguruma\n";
        let details = parse_package_details(output);
        assert_eq!(details.version.as_deref(), Some("1.7.1"));
        assert_eq!(details.description.as_deref(), Some("Lightweight JSON processor"));
        assert_eq!(details.dependencies, vec!["oniguruma"]);
    }

    #[test]
    fn test_parse_package_details_url_is_not_description() {
        let details = parse_package_details("==> foo: stable 1.0\nhttps://example.com\n");
        assert!(details.description.is_none());
    }

    #[test]
    fn test_parse_service_info() {
        let output = "postgresql@14 (homebrew.mxcl.postgresql@14)\n\
                      Running: ✔\n\
                      Loaded: ✔\n\
                      Schedulable: ✘\n\
                      User: alex\n\
                      PID: 1234\n";
        let info = parse_service_info(output);
        assert_eq!(info.get("Running").map(String::as_str), Some("✔"));
        assert_eq!(info.get("PID").map(String::as_str), Some("1234"));
        assert_eq!(info.get("User").map(String::as_str), Some("alex"));
        assert_eq!(info.len(), 5);
    }

    #[test]
    fn test_parse_version() {
        let output = "Homebrew 4.2.0\n\
                      Homebrew/homebrew-core (git revision 1a2b3c; last commit 2024-01-01)\n\
                      Homebrew/homebrew-cask (git revision 4d5e6f; last commit 2024-01-02)\n";
        let version = parse_version(output).unwrap();
        assert_eq!(version.version, "Homebrew 4.2.0");
        let core = version.core.unwrap();
        assert_eq!(core.revision, "1a2b3c");
        assert_eq!(core.last_commit, "2024-01-01");
        assert_eq!(version.cask.unwrap().last_commit, "2024-01-02");
    }

    #[test]
    fn test_parse_version_without_repositories() {
        let version = parse_version("Homebrew 4.4.0\n").unwrap();
        assert!(version.core.is_none());
        assert!(version.cask.is_none());
    }

    #[test]
    fn test_parse_version_empty() {
        assert!(matches!(
            parse_version("  \n"),
            Err(KettleError::ParsingFailed(_))
        ));
    }

    #[test]
    fn test_text_parser_delegates() {
        let parser = TextOutputParser;
        assert_eq!(parser.parse_packages("test1 1.0")[0].name, "test1");
        assert_eq!(parser.parse_taps("homebrew/core")[0].name, "homebrew/core");
    }
}
