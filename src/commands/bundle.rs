use super::utils::{Manager, spinner};
use colored::Colorize;
use kettle::BackupBundle;
use std::path::{Path, PathBuf};

/// Write a backup of packages, services and taps; stdout when no path
pub async fn backup_export(manager: &Manager, path: Option<&Path>) -> anyhow::Result<()> {
    let bundle = manager.backup().await;

    match path {
        Some(path) => {
            bundle.write_to(path)?;
            println!(
                "{} Backed up {} packages, {} services, {} taps to {}",
                "✓".green(),
                bundle.packages.len(),
                bundle.services.len(),
                bundle.taps.len(),
                path.display().to_string().cyan()
            );
        }
        None => println!("{}", bundle.to_json()?),
    }
    Ok(())
}

pub async fn backup_import(manager: &Manager, path: &Path) -> anyhow::Result<()> {
    let bundle = BackupBundle::read_from(path)?;
    let (packages, services, taps) = (
        bundle.packages.len(),
        bundle.services.len(),
        bundle.taps.len(),
    );
    manager.restore(bundle).await;

    println!(
        "{} Restored {} packages, {} services, {} taps from {}",
        "✓".green(),
        packages,
        services,
        taps,
        path.display().to_string().cyan()
    );
    Ok(())
}

/// Write the tap export document into `dir` (current directory by default)
pub async fn export_taps(manager: &Manager, dir: Option<PathBuf>, refresh: bool) -> anyhow::Result<()> {
    if refresh || manager.taps().await.updated_at.is_none() {
        let pb = spinner("Refreshing taps...");
        let result = manager.refresh_taps().await;
        pb.finish_and_clear();
        result?;
    }

    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let export = manager.export_taps().await;
    let path = export.write_into(&dir)?;

    println!(
        "{} Exported {} taps to {}",
        "✓".green(),
        export.taps.len(),
        path.display().to_string().cyan()
    );
    Ok(())
}
