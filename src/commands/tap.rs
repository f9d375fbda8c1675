use super::utils::{Manager, format_age, print_json, spinner};
use chrono::Utc;
use colored::Colorize;
use kettle::TapInfo;

pub async fn taps(manager: &Manager, refresh: bool, json: bool) -> anyhow::Result<()> {
    let mut collection = manager.taps().await;
    if refresh || collection.updated_at.is_none() {
        let pb = spinner("Refreshing taps...");
        let result = manager.refresh_taps().await;
        pb.finish_and_clear();
        result?;
        collection = manager.taps().await;
    }

    if json {
        return print_json(&collection.items);
    }

    println!("{}", "==> Taps".bold().green());
    if collection.is_empty() {
        println!("No taps installed");
        return Ok(());
    }

    let infos = manager.tap_infos().await;
    for tap in &collection.items {
        let summary = infos
            .get(&tap.name)
            .map(counts_summary)
            .filter(|s| !s.is_empty())
            .map(|s| format!(" ({})", s))
            .unwrap_or_default();
        println!("{}{}", tap.name.cyan(), summary.dimmed());
        println!("  {}", tap.url.dimmed());
    }

    println!();
    println!(
        "{} {} taps (updated {})",
        "ℹ".blue(),
        collection.len().to_string().bold(),
        format_age(collection.updated_at, Utc::now())
    );
    Ok(())
}

fn counts_summary(info: &TapInfo) -> String {
    [&info.formulae, &info.casks, &info.commands]
        .into_iter()
        .flatten()
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}

pub async fn tap_info(manager: &Manager, name: &str, json: bool) -> anyhow::Result<()> {
    let info = manager.tap_info(name).await?;

    if json {
        return print_json(&info);
    }

    println!("{}", format!("==> {}", name).bold().green());
    if info.is_empty() {
        println!(
            "{} No details could be read from brew tap-info",
            "⚠".yellow()
        );
        return Ok(());
    }

    let fields = [
        ("Status", info.status.clone()),
        ("Formulae", info.formulae.clone()),
        ("Casks", info.casks.clone()),
        ("Commands", info.commands.clone()),
        ("Path", info.path.clone()),
        ("Files", info.file_count.map(|n| n.to_string())),
        ("Size", info.size.clone()),
        ("Remote", info.remote_url.clone()),
        ("Branch", info.branch.clone()),
        ("HEAD", info.head.clone()),
        ("Last commit", info.last_commit.clone()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{:>11}: {}", label.bold(), value);
        }
    }
    Ok(())
}

pub async fn tap(manager: &Manager, name: &str, url: Option<&str>) -> anyhow::Result<()> {
    // Validate early for a clearer message than brew's
    kettle::tap::parse_tap_name(name)?;

    println!("Tapping {}...", name.cyan());
    let pb = spinner(format!("brew tap {}", name));
    let result = manager.add_tap(name, url).await;
    pb.finish_and_clear();
    result?;

    println!("  {} Tapped {}", "✓".green(), name.bold().green());
    Ok(())
}

pub async fn untap(manager: &Manager, name: &str) -> anyhow::Result<()> {
    kettle::tap::parse_tap_name(name)?;

    println!("Untapping {}...", name.cyan());
    let pb = spinner(format!("brew untap {}", name));
    let result = manager.remove_tap(name).await;
    pb.finish_and_clear();
    result?;

    println!("  {} Untapped {}", "✓".green(), name.bold().green());
    Ok(())
}
