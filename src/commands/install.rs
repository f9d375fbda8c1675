use super::utils::{Manager, spinner};
use colored::Colorize;
use kettle::OperationResult;
use std::future::Future;

/// Run one operation per name, reporting each; fails if any failed
async fn for_each<'a, F, Fut>(
    names: &'a [String],
    verb: &str,
    done: &str,
    op: F,
) -> anyhow::Result<()>
where
    F: Fn(&'a str) -> Fut,
    Fut: Future<Output = kettle::Result<OperationResult>>,
{
    let mut failed = 0;
    for name in names {
        let pb = spinner(format!("{} {}...", verb, name));
        let result = op(name).await;
        pb.finish_and_clear();

        match result {
            Ok(result) => println!(
                "  {} {} {} {}",
                "✓".green(),
                done,
                result.name.bold().green(),
                format!("({}ms)", result.time_ms).dimmed()
            ),
            Err(e) => {
                failed += 1;
                println!("  {} {} {}: {}", "✗".red(), verb, name.bold(), e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} operations failed", failed, names.len());
    }
    Ok(())
}

pub async fn install(manager: &Manager, names: &[String]) -> anyhow::Result<()> {
    for_each(names, "Installing", "Installed", move |name| manager.install_package(name)).await
}

pub async fn uninstall(manager: &Manager, names: &[String]) -> anyhow::Result<()> {
    for_each(names, "Uninstalling", "Uninstalled", move |name| {
        manager.uninstall_package(name)
    })
    .await
}

pub async fn upgrade(manager: &Manager, names: &[String]) -> anyhow::Result<()> {
    for_each(names, "Upgrading", "Upgraded", move |name| manager.upgrade_package(name)).await
}
