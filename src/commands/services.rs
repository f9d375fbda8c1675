use super::utils::{Manager, format_age, print_json, spinner};
use chrono::Utc;
use clap::Subcommand;
use colored::Colorize;
use kettle::{PlistValue, ServiceStatus};

#[derive(Subcommand, Debug, Clone)]
pub enum ServicesAction {
    /// List services and their status
    List {
        /// Run `brew services list` even if cached results exist
        #[arg(long)]
        refresh: bool,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Show details for a service
    Info { name: String },
    /// Start a service
    Start { name: String },
    /// Stop a service
    Stop { name: String },
    /// Show a service's launchd configuration
    Config {
        name: String,
        /// Print the property list as XML
        #[arg(long, conflicts_with = "json")]
        xml: bool,
        /// Print the property list as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn services(manager: &Manager, action: Option<ServicesAction>) -> anyhow::Result<()> {
    match action.unwrap_or(ServicesAction::List {
        refresh: false,
        json: false,
    }) {
        ServicesAction::List { refresh, json } => list(manager, refresh, json).await,
        ServicesAction::Info { name } => info(manager, &name).await,
        ServicesAction::Start { name } => {
            println!("Starting service: {}", name.cyan());
            let pb = spinner(format!("brew services start {}", name));
            let result = manager.start_service(&name).await;
            pb.finish_and_clear();
            result?;
            println!("  {} Started {}", "✓".green(), name.bold().green());
            Ok(())
        }
        ServicesAction::Stop { name } => {
            println!("Stopping service: {}", name.cyan());
            let pb = spinner(format!("brew services stop {}", name));
            let result = manager.stop_service(&name).await;
            pb.finish_and_clear();
            result?;
            println!("  {} Stopped {}", "✓".green(), name.bold().green());
            Ok(())
        }
        ServicesAction::Config { name, xml, json } => config(manager, &name, xml, json).await,
    }
}

fn status_label(status: ServiceStatus) -> String {
    match status {
        ServiceStatus::Started | ServiceStatus::Running => status.as_str().green().to_string(),
        ServiceStatus::Stopped => status.as_str().dimmed().to_string(),
        ServiceStatus::Error => status.as_str().red().to_string(),
        ServiceStatus::Unknown => status.as_str().yellow().to_string(),
    }
}

async fn list(manager: &Manager, refresh: bool, json: bool) -> anyhow::Result<()> {
    let mut collection = manager.services().await;
    if refresh || collection.updated_at.is_none() {
        let pb = spinner("Refreshing services...");
        let result = manager.refresh_services().await;
        pb.finish_and_clear();
        result?;
        collection = manager.services().await;
    }

    if json {
        return print_json(&collection.items);
    }

    println!("{}", "==> Services".bold().green());
    println!();

    if collection.is_empty() {
        println!("No services found");
        println!("Services are background processes like databases and web servers.");
        return Ok(());
    }

    println!(
        "{:<20} {:<8} {:<8} {}",
        "Name".bold(),
        "Status".bold(),
        "User".bold(),
        "File".bold()
    );

    for service in &collection.items {
        // Pad before colouring; escape codes would skew the width
        let status = format!("{:<8}", service.status.as_str());
        let status = status.replace(service.status.as_str(), &status_label(service.status));
        println!(
            "{:<20} {} {:<8} {}",
            service.name.cyan(),
            status,
            service.user.as_deref().unwrap_or(""),
            service.file_path.as_deref().unwrap_or("").dimmed()
        );
    }

    let running = collection
        .items
        .iter()
        .filter(|s| s.status.is_active())
        .count();
    println!();
    println!(
        "{} {} services, {} running (updated {})",
        "ℹ".blue(),
        collection.len().to_string().bold(),
        running,
        format_age(collection.updated_at, Utc::now())
    );
    Ok(())
}

async fn info(manager: &Manager, name: &str) -> anyhow::Result<()> {
    let details = manager.service_info(name).await?;

    println!("{}", format!("==> {}", name).bold().green());
    if details.is_empty() {
        println!("No details reported");
        return Ok(());
    }

    let width = details.keys().map(String::len).max().unwrap_or(0);
    for (key, value) in &details {
        let value = match value.as_str() {
            "✔" | "true" => value.green().to_string(),
            "✘" | "false" => value.red().to_string(),
            _ => value.to_string(),
        };
        println!("{:>width$}: {}", key.bold(), value, width = width);
    }
    Ok(())
}

async fn config(manager: &Manager, name: &str, xml: bool, json: bool) -> anyhow::Result<()> {
    let value = manager.service_config(name).await?;

    if xml {
        print!("{}", value.to_xml()?);
        return Ok(());
    }
    if json {
        return print_json(&value);
    }

    println!("{}", format!("==> {}", name).bold().green());
    print_value(&value, 0);
    Ok(())
}

fn print_value(value: &PlistValue, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        PlistValue::Dictionary(map) => {
            for (key, child) in map {
                match child.string_value() {
                    Some(text) => println!("{}{}: {}", indent, key.bold(), text),
                    None => {
                        println!("{}{}:", indent, key.bold());
                        print_value(child, depth + 1);
                    }
                }
            }
        }
        PlistValue::Array(items) => {
            for item in items {
                match item.string_value() {
                    Some(text) => println!("{}- {}", indent, text),
                    None => {
                        println!("{}-", indent);
                        print_value(item, depth + 1);
                    }
                }
            }
        }
        scalar => {
            if let Some(text) = scalar.string_value() {
                println!("{}{}", indent, text);
            }
        }
    }
}
