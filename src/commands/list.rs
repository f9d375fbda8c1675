use super::utils::{Manager, format_age, print_json, spinner};
use chrono::Utc;
use colored::Colorize;

pub async fn packages(manager: &Manager, refresh: bool, json: bool) -> anyhow::Result<()> {
    let mut collection = manager.packages().await;
    if refresh || collection.updated_at.is_none() {
        let pb = spinner("Refreshing installed formulae...");
        let result = manager.refresh_packages().await;
        pb.finish_and_clear();
        result?;
        collection = manager.packages().await;
    }

    if json {
        return print_json(&collection.items);
    }

    println!("{}", "==> Installed Formulae".bold().green());
    if collection.is_empty() {
        println!("No formulae installed");
        return Ok(());
    }

    let width = collection
        .items
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(0);
    for pkg in &collection.items {
        println!(
            "{:<width$}  {}",
            pkg.name.cyan(),
            pkg.version.dimmed(),
            width = width
        );
    }

    println!();
    println!(
        "{} {} formulae (updated {})",
        "ℹ".blue(),
        collection.len().to_string().bold(),
        format_age(collection.updated_at, Utc::now())
    );
    Ok(())
}

pub async fn casks(manager: &Manager, refresh: bool, json: bool) -> anyhow::Result<()> {
    let mut collection = manager.casks().await;
    if refresh || collection.updated_at.is_none() {
        let pb = spinner("Refreshing installed casks...");
        let result = manager.refresh_casks().await;
        pb.finish_and_clear();
        result?;
        collection = manager.casks().await;
    }

    if json {
        return print_json(&collection.items);
    }

    println!("{}", "==> Installed Casks".bold().green());
    if collection.is_empty() {
        println!("No casks installed");
        return Ok(());
    }

    for cask in &collection.items {
        println!("{}", cask.name.cyan());
    }

    println!();
    println!(
        "{} {} casks (updated {})",
        "ℹ".blue(),
        collection.len().to_string().bold(),
        format_age(collection.updated_at, Utc::now())
    );
    Ok(())
}
