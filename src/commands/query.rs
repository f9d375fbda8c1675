use super::utils::{Manager, print_json, spinner};
use colored::Colorize;

pub async fn info(manager: &Manager, name: &str, json: bool) -> anyhow::Result<()> {
    let pb = if json {
        indicatif::ProgressBar::hidden()
    } else {
        spinner(format!("Fetching info for {}...", name))
    };
    let result = manager.package_details(name).await;
    pb.finish_and_clear();
    let pkg = result?;

    if json {
        return print_json(&pkg);
    }

    println!("{}", format!("==> {}", pkg.name).bold().green());
    if let Some(desc) = &pkg.description {
        println!("{}", desc);
    }
    if !pkg.version.is_empty() {
        println!("{}: {}", "Version".bold(), pkg.version);
    }
    println!(
        "{}: {}",
        "Installed".bold(),
        if pkg.installed {
            "yes".green().to_string()
        } else {
            "no".dimmed().to_string()
        }
    );
    if !pkg.dependencies.is_empty() {
        println!("{}: {}", "Dependencies".bold(), pkg.dependencies.join(", "));
    }
    Ok(())
}
