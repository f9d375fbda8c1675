use super::utils::{Manager, format_age, print_json, spinner};
use chrono::Utc;
use colored::Colorize;
use kettle::{ResourceKind, StreamCallbacks};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct StatusReport {
    installed: bool,
    brew_path: Option<String>,
    version: Option<kettle::BrewVersion>,
    cache_dir: String,
    collections: Vec<CollectionStatus>,
}

#[derive(Serialize)]
struct CollectionStatus {
    kind: String,
    count: usize,
    updated_at: Option<chrono::DateTime<Utc>>,
}

pub async fn status(manager: &Manager, json: bool) -> anyhow::Result<()> {
    let brew = manager.homebrew();
    let version = if brew.is_installed() {
        let pb = spinner("Checking brew --version...");
        let result = manager.version().await;
        pb.finish_and_clear();
        match result {
            Ok(version) => Some(version),
            Err(e) => {
                tracing::warn!("Could not read brew version: {}", e);
                None
            }
        }
    } else {
        None
    };

    let mut collections = Vec::new();
    for kind in ResourceKind::ALL {
        let (count, updated_at) = match kind {
            ResourceKind::Packages => summary(manager.packages().await),
            ResourceKind::Casks => summary(manager.casks().await),
            ResourceKind::Services => summary(manager.services().await),
            ResourceKind::Taps => summary(manager.taps().await),
        };
        collections.push(CollectionStatus {
            kind: kind.to_string(),
            count,
            updated_at,
        });
    }

    let report = StatusReport {
        installed: brew.is_installed(),
        brew_path: brew.brew_path().ok().map(|p| p.display().to_string()),
        version,
        cache_dir: manager.cache().dir().display().to_string(),
        collections,
    };

    if json {
        return print_json(&report);
    }

    println!("{}", "==> Homebrew".bold().green());
    match &report.brew_path {
        Some(path) => println!("  {} brew at {}", "✓".green(), path.cyan()),
        None => {
            println!("  {} Homebrew is not installed", "✗".red());
            println!("  Run {} to install it", "kettle install-homebrew".cyan());
        }
    }
    if let Some(version) = &report.version {
        println!("  {}", version.version.bold());
        for (label, revision) in [("core", &version.core), ("cask", &version.cask)] {
            if let Some(rev) = revision {
                println!(
                    "  homebrew-{}: {} (last commit {})",
                    label,
                    rev.revision.dimmed(),
                    rev.last_commit
                );
            }
        }
    }

    println!();
    println!("{}", "==> Cached data".bold().green());
    let now = Utc::now();
    for entry in &report.collections {
        println!(
            "  {:<10} {:>5}  updated {}",
            entry.kind,
            entry.count,
            format_age(entry.updated_at, now).dimmed()
        );
    }
    println!("  {}", report.cache_dir.dimmed());
    Ok(())
}

fn summary<T>(collection: kettle::Collection<T>) -> (usize, Option<chrono::DateTime<Utc>>) {
    (collection.len(), collection.updated_at)
}

pub async fn doctor(manager: &Manager) -> anyhow::Result<()> {
    println!("{}", "==> brew doctor".bold().green());

    let mut handle = manager.doctor(StreamCallbacks::new(
        |chunk| {
            print!("{}", chunk);
            let _ = std::io::stdout().flush();
        },
        |chunk| eprint!("{}", chunk.yellow()),
        |_| {},
    ))?;

    let finished = tokio::select! {
        result = handle.wait() => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };
    let code = match finished {
        Some(result) => result?,
        None => {
            handle.cancel();
            handle.wait().await?;
            println!();
            println!("{} Cancelled", "⚠".yellow());
            return Ok(());
        }
    };

    println!();
    if code == 0 {
        println!("{} Your system is ready to brew", "✓".green());
        Ok(())
    } else {
        anyhow::bail!("brew doctor reported problems (exit code {})", code)
    }
}

pub fn cache_clear(manager: &Manager) -> anyhow::Result<()> {
    let removed = manager.clear_cache()?;
    println!(
        "{} Removed {} cache entries from {}",
        "✓".green(),
        removed,
        manager.cache().dir().display().to_string().cyan()
    );
    Ok(())
}

pub fn config(manager: &Manager) -> anyhow::Result<()> {
    let settings = manager.settings();
    let brew = manager.homebrew();

    println!("{}", "==> Configuration".bold().green());
    println!(
        "{:>22}: {}",
        "brew".bold(),
        brew.brew_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "not found".red().to_string())
    );
    if let Some(path) = &settings.brew_path {
        println!("{:>22}: {}", "brew override".bold(), path.display());
    }
    let search: Vec<String> = settings
        .search_paths
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    println!("{:>22}: {}", "search paths".bold(), search.join(", "));
    println!(
        "{:>22}: {}",
        "cache dir".bold(),
        settings.cache_dir.display()
    );
    println!(
        "{:>22}: {}",
        "tap-info concurrency".bold(),
        settings.tap_info_concurrency
    );
    println!(
        "{:>22}: {}",
        "no auto update".bold(),
        settings.no_auto_update
    );
    Ok(())
}

pub async fn install_homebrew(manager: &mut Manager, yes: bool) -> anyhow::Result<()> {
    if manager.is_homebrew_installed() {
        println!("{} Homebrew is already installed", "✓".green());
        return Ok(());
    }

    if !yes {
        print!("Install Homebrew using the official install script? [y/N] ");
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            println!("Aborted");
            return Ok(());
        }
    }

    let pb = spinner("Installing Homebrew (this can take several minutes)...");
    let result = manager.install_homebrew().await;
    pb.finish_and_clear();
    result?;

    println!("{} Homebrew installed", "✓".green());
    Ok(())
}
