mod colors;
mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use colors::ColorChoice;
use commands::ServicesAction;
use kettle::{HomebrewManager, Settings};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kettle")]
#[command(author, version, about = "A front end for the Homebrew package manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the brew executable (overrides KETTLE_BREW_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    brew: Option<PathBuf>,

    /// Cache directory (overrides KETTLE_CACHE_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// When to use colors
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Commands {
    /// Show Homebrew installation and cache status
    Status {
        #[arg(long)]
        json: bool,
    },

    /// List installed formulae
    Packages {
        /// Run brew even if cached results exist
        #[arg(long)]
        refresh: bool,
        #[arg(long)]
        json: bool,
    },

    /// Show information about a formula
    Info {
        /// Formula name
        name: String,
        #[arg(long)]
        json: bool,
    },

    /// Install formulae
    Install {
        /// Formula names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Uninstall formulae
    Uninstall {
        /// Formula names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Upgrade formulae
    Upgrade {
        /// Formula names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// List installed casks
    Casks {
        #[arg(long)]
        refresh: bool,
        #[arg(long)]
        json: bool,
    },

    /// Manage background services
    Services {
        #[command(subcommand)]
        action: Option<ServicesAction>,
    },

    /// List taps
    Taps {
        #[arg(long)]
        refresh: bool,
        #[arg(long)]
        json: bool,
    },

    /// Show details for a tap
    TapInfo {
        /// Tap name (user/repo format)
        name: String,
        #[arg(long)]
        json: bool,
    },

    /// Add a tap (third-party repository)
    Tap {
        /// Tap name (user/repo format)
        name: String,
        /// Remote URL, for taps not hosted at github.com/user/homebrew-repo
        url: Option<String>,
    },

    /// Remove a tap
    Untap {
        /// Tap name (user/repo format)
        name: String,
    },

    /// Run brew doctor
    Doctor,

    /// Back up or restore packages, services and taps
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// Export taps and their details to a JSON file
    ExportTaps {
        /// Directory to write into (current directory by default)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Refresh taps before exporting
        #[arg(long)]
        refresh: bool,
    },

    /// Manage the local cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Show effective configuration
    Config,

    /// Install Homebrew using the official install script
    InstallHomebrew {
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate shell completion scripts
    Completions {
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum BackupAction {
    /// Write a backup document (stdout when no path is given)
    Export { path: Option<PathBuf> },
    /// Load a backup document
    Import { path: PathBuf },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Remove all cache entries
    Clear,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    colors::init_colors(cli.color);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Commands::Completions { shell } = command {
        clap_complete::generate(shell, &mut Cli::command(), "kettle", &mut std::io::stdout());
        return Ok(());
    }

    let mut settings = Settings::from_env();
    if let Some(brew) = cli.brew {
        settings = settings.with_brew_path(brew);
    }
    if let Some(dir) = cli.cache_dir {
        settings = settings.with_cache_dir(dir);
    }

    let mut manager = HomebrewManager::new(settings);
    if let Err(e) = manager.load_cached().await {
        tracing::warn!("Failed to load cache: {}", e);
    }

    match command {
        Commands::Status { json } => commands::status(&manager, json).await,
        Commands::Packages { refresh, json } => commands::packages(&manager, refresh, json).await,
        Commands::Info { name, json } => commands::info(&manager, &name, json).await,
        Commands::Install { names } => commands::install(&manager, &names).await,
        Commands::Uninstall { names } => commands::uninstall(&manager, &names).await,
        Commands::Upgrade { names } => commands::upgrade(&manager, &names).await,
        Commands::Casks { refresh, json } => commands::casks(&manager, refresh, json).await,
        Commands::Services { action } => commands::services(&manager, action).await,
        Commands::Taps { refresh, json } => commands::taps(&manager, refresh, json).await,
        Commands::TapInfo { name, json } => commands::tap_info(&manager, &name, json).await,
        Commands::Tap { name, url } => commands::tap(&manager, &name, url.as_deref()).await,
        Commands::Untap { name } => commands::untap(&manager, &name).await,
        Commands::Doctor => commands::doctor(&manager).await,
        Commands::Backup { action } => match action {
            BackupAction::Export { path } => {
                commands::backup_export(&manager, path.as_deref()).await
            }
            BackupAction::Import { path } => commands::backup_import(&manager, &path).await,
        },
        Commands::ExportTaps { dir, refresh } => {
            commands::export_taps(&manager, dir, refresh).await
        }
        Commands::Cache { action } => match action {
            CacheAction::Clear => commands::cache_clear(&manager),
        },
        Commands::Config => commands::config(&manager),
        Commands::InstallHomebrew { yes } => commands::install_homebrew(&mut manager, yes).await,
        Commands::Completions { .. } => Ok(()),
    }
}
