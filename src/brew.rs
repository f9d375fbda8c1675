//! The `brew` executable and the subcommands Kettle drives.
//!
//! Every method returns raw stdout; turning it into records is the parser's
//! job. Commands that change the installation receive the mutation
//! environment from [`Settings::mutation_env`].

use crate::config::Settings;
use crate::error::{KettleError, Result};
use crate::runner::{CommandRunner, ProcessRunner, StreamCallbacks, StreamHandle};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const INSTALL_SCRIPT_URL: &str = "https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh";
const BASH: &str = "/bin/bash";
const CAT: &str = "/bin/cat";

/// Find `brew`: explicit override, then the fixed install locations, then `PATH`
pub fn locate_brew(settings: &Settings) -> Option<PathBuf> {
    if let Some(path) = &settings.brew_path {
        if path.is_file() {
            return Some(path.clone());
        }
        warn!("Configured brew path {} does not exist", path.display());
        return None;
    }

    settings
        .search_paths
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .or_else(|| which::which("brew").ok())
}

/// Reject names that `brew` would read as options
fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() || name.starts_with('-') || name.contains(char::is_whitespace) {
        return Err(KettleError::InvalidState(format!("Invalid name '{}'", name)));
    }
    Ok(name)
}

/// Homebrew client over a [`CommandRunner`]
pub struct Homebrew<R = ProcessRunner> {
    runner: R,
    brew_path: Option<PathBuf>,
    mutation_env: Vec<(String, String)>,
}

impl Homebrew<ProcessRunner> {
    pub fn new(settings: &Settings) -> Self {
        Self::with_runner(settings, ProcessRunner)
    }
}

impl<R: CommandRunner> Homebrew<R> {
    pub fn with_runner(settings: &Settings, runner: R) -> Self {
        let brew_path = locate_brew(settings);
        match &brew_path {
            Some(path) => debug!("Using brew at {}", path.display()),
            None => debug!("Homebrew not found"),
        }
        Self {
            runner,
            brew_path,
            mutation_env: settings.mutation_env(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn is_installed(&self) -> bool {
        self.brew_path.is_some()
    }

    pub fn brew_path(&self) -> Result<&Path> {
        self.brew_path
            .as_deref()
            .ok_or_else(|| KettleError::InvalidState("Homebrew is not installed".to_string()))
    }

    /// Probe again, e.g. after installing Homebrew
    pub fn relocate(&mut self, settings: &Settings) -> bool {
        self.brew_path = locate_brew(settings);
        self.is_installed()
    }

    async fn run(&self, args: &[&str], envs: &[(String, String)]) -> Result<String> {
        let brew = self.brew_path()?;
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let output = self.runner.run(brew, &args, envs).await?;
        let command = args.join(" ");
        if !output.success() {
            warn!(
                "brew {} failed with exit code {}: {}",
                command,
                output.exit_code,
                output.stderr.trim()
            );
        }
        output.into_stdout(&command)
    }

    /// Run a read-only subcommand
    pub async fn execute(&self, args: &[&str]) -> Result<String> {
        self.run(args, &[]).await
    }

    /// Run a subcommand that changes the installation
    pub async fn execute_mutation(&self, args: &[&str]) -> Result<String> {
        self.run(args, &self.mutation_env).await
    }

    /// Stream a subcommand's output
    pub fn stream(&self, args: &[&str], callbacks: StreamCallbacks) -> Result<StreamHandle> {
        let brew = self.brew_path()?;
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.runner.stream(brew, &args, &[], callbacks)
    }

    pub async fn list_formulae(&self) -> Result<String> {
        self.execute(&["list", "--formula"]).await
    }

    pub async fn list_casks(&self) -> Result<String> {
        self.execute(&["list", "--cask"]).await
    }

    pub async fn info(&self, name: &str) -> Result<String> {
        self.execute(&["info", validate_name(name)?]).await
    }

    pub async fn taps(&self) -> Result<String> {
        self.execute(&["tap"]).await
    }

    pub async fn tap_info(&self, name: &str) -> Result<String> {
        self.execute(&["tap-info", validate_name(name)?]).await
    }

    pub async fn tap(&self, name: &str, url: Option<&str>) -> Result<String> {
        let name = validate_name(name)?;
        match url {
            Some(url) => self.execute_mutation(&["tap", name, validate_name(url)?]).await,
            None => self.execute_mutation(&["tap", name]).await,
        }
    }

    pub async fn untap(&self, name: &str) -> Result<String> {
        self.execute_mutation(&["untap", validate_name(name)?]).await
    }

    pub async fn install(&self, name: &str) -> Result<String> {
        self.execute_mutation(&["install", validate_name(name)?]).await
    }

    pub async fn uninstall(&self, name: &str) -> Result<String> {
        self.execute_mutation(&["uninstall", validate_name(name)?]).await
    }

    pub async fn upgrade(&self, name: &str) -> Result<String> {
        self.execute_mutation(&["upgrade", validate_name(name)?]).await
    }

    pub async fn services_list(&self) -> Result<String> {
        self.execute(&["services", "list"]).await
    }

    pub async fn services_info(&self, name: &str) -> Result<String> {
        self.execute(&["services", "info", validate_name(name)?]).await
    }

    pub async fn services_start(&self, name: &str) -> Result<String> {
        self.execute_mutation(&["services", "start", validate_name(name)?])
            .await
    }

    pub async fn services_stop(&self, name: &str) -> Result<String> {
        self.execute_mutation(&["services", "stop", validate_name(name)?])
            .await
    }

    pub async fn version(&self) -> Result<String> {
        self.execute(&["--version"]).await
    }

    /// `brew doctor`, streamed; it routinely runs for a while
    pub fn doctor(&self, callbacks: StreamCallbacks) -> Result<StreamHandle> {
        self.stream(&["doctor"], callbacks)
    }

    /// Read a configuration file, falling back to `cat` when a direct read
    /// is refused (root-owned LaunchDaemons)
    pub async fn read_config_file(&self, path: &Path) -> Result<String> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(e.into()),
            Err(e) => {
                debug!("Direct read of {} failed ({}), trying cat", path.display(), e);
                let args = vec![path.to_string_lossy().into_owned()];
                self.runner.run_checked(Path::new(CAT), &args, &[]).await
            }
        }
    }

    /// Run the official Homebrew install script, then look for `brew` again
    pub async fn install_homebrew(&mut self, settings: &Settings) -> Result<()> {
        info!("Installing Homebrew from {}", INSTALL_SCRIPT_URL);
        let args = vec![
            "-c".to_string(),
            format!("{} -c \"$(curl -fsSL {})\"", BASH, INSTALL_SCRIPT_URL),
        ];
        let envs = vec![("NONINTERACTIVE".to_string(), "1".to_string())];

        let output = self
            .runner
            .run(Path::new(BASH), &args, &envs)
            .await
            .map_err(|e| KettleError::InstallationFailed(e.to_string()))?;

        if !output.success() {
            let detail = output.stderr.trim();
            return Err(KettleError::InstallationFailed(if detail.is_empty() {
                format!("install script exited with code {}", output.exit_code)
            } else {
                detail.to_string()
            }));
        }

        if !self.relocate(settings) {
            return Err(KettleError::InstallationFailed(
                "brew was not found after the install script finished".to_string(),
            ));
        }
        info!("Homebrew installed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CommandOutput;
    use std::sync::Mutex;

    /// Records invocations and answers from a fixed table
    #[derive(Default)]
    struct ScriptedRunner {
        calls: Mutex<Vec<(PathBuf, Vec<String>, Vec<(String, String)>)>>,
        responses: Vec<(String, CommandOutput)>,
    }

    impl ScriptedRunner {
        fn respond(mut self, args: &str, stdout: &str, exit_code: i32) -> Self {
            self.responses.push((
                args.to_string(),
                CommandOutput {
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                    exit_code,
                },
            ));
            self
        }

        fn calls(&self) -> Vec<(PathBuf, Vec<String>, Vec<(String, String)>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CommandRunner for ScriptedRunner {
        async fn run(
            &self,
            program: &Path,
            args: &[String],
            envs: &[(String, String)],
        ) -> Result<CommandOutput> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_path_buf(), args.to_vec(), envs.to_vec()));
            let joined = args.join(" ");
            Ok(self
                .responses
                .iter()
                .find(|(a, _)| *a == joined)
                .map(|(_, out)| out.clone())
                .unwrap_or(CommandOutput {
                    stdout: String::new(),
                    stderr: format!("Unknown command: {}", joined),
                    exit_code: 1,
                }))
        }

        fn stream(
            &self,
            _program: &Path,
            _args: &[String],
            _envs: &[(String, String)],
            _callbacks: StreamCallbacks,
        ) -> Result<StreamHandle> {
            Err(KettleError::InvalidState("streaming not scripted".into()))
        }
    }

    fn settings_with_brew(dir: &tempfile::TempDir) -> Settings {
        let brew = dir.path().join("brew");
        std::fs::write(&brew, "").unwrap();
        Settings::default().with_brew_path(brew)
    }

    #[test]
    fn test_locate_prefers_override() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_with_brew(&dir);
        assert_eq!(locate_brew(&settings), Some(dir.path().join("brew")));
    }

    #[test]
    fn test_locate_missing_override() {
        let settings = Settings::default().with_brew_path("/nonexistent/kettle/brew");
        assert_eq!(locate_brew(&settings), None);
    }

    #[test]
    fn test_locate_search_paths_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let second = dir.path().join("second-brew");
        std::fs::write(&second, "").unwrap();
        let mut settings = Settings::default();
        settings.search_paths = vec![dir.path().join("missing-brew"), second.clone()];
        assert_eq!(locate_brew(&settings), Some(second));
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name(" wget ").unwrap(), "wget");
        assert!(validate_name("--force").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name("two words").is_err());
        assert!(validate_name("homebrew/cask-fonts").is_ok());
    }

    #[tokio::test]
    async fn test_not_installed_is_invalid_state() {
        let settings = Settings::default().with_brew_path("/nonexistent/kettle/brew");
        let brew = Homebrew::with_runner(&settings, ScriptedRunner::default());
        assert!(!brew.is_installed());
        let err = brew.list_formulae().await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid state: Homebrew is not installed");
    }

    #[tokio::test]
    async fn test_execute_returns_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_with_brew(&dir);
        let runner = ScriptedRunner::default().respond("list --formula", "git 2.43.0\n", 0);
        let brew = Homebrew::with_runner(&settings, runner);

        assert_eq!(brew.list_formulae().await.unwrap(), "git 2.43.0\n");
        let calls = brew.runner().calls();
        assert_eq!(calls[0].0, dir.path().join("brew"));
        assert_eq!(calls[0].1, vec!["list", "--formula"]);
    }

    #[tokio::test]
    async fn test_failure_carries_command_and_code() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_with_brew(&dir);
        let runner = ScriptedRunner::default().respond("install nope", "", 1);
        let brew = Homebrew::with_runner(&settings, runner);

        match brew.install("nope").await.unwrap_err() {
            KettleError::CommandFailed { command, code } => {
                assert_eq!(command, "install nope");
                assert_eq!(code, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mutations_carry_environment() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings_with_brew(&dir);
        settings.no_auto_update = true;
        let runner = ScriptedRunner::default()
            .respond("upgrade wget", "", 0)
            .respond("tap", "homebrew/core\n", 0);
        let brew = Homebrew::with_runner(&settings, runner);

        brew.upgrade("wget").await.unwrap();
        brew.taps().await.unwrap();

        let calls = brew.runner().calls();
        assert_eq!(
            calls[0].2,
            vec![("HOMEBREW_NO_AUTO_UPDATE".to_string(), "1".to_string())]
        );
        assert!(calls[1].2.is_empty());
    }

    #[tokio::test]
    async fn test_tap_with_url() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_with_brew(&dir);
        let runner = ScriptedRunner::default()
            .respond("tap user/tools https://example.com/tools.git", "", 0);
        let brew = Homebrew::with_runner(&settings, runner);
        brew.tap("user/tools", Some("https://example.com/tools.git"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_install_homebrew_failure() {
        let settings = Settings::default().with_brew_path("/nonexistent/kettle/brew");
        let mut brew = Homebrew::with_runner(&settings, ScriptedRunner::default());
        let err = brew.install_homebrew(&settings).await.unwrap_err();
        assert!(matches!(err, KettleError::InstallationFailed(_)));
        assert_eq!(brew.runner().calls()[0].0, PathBuf::from(BASH));
    }

    #[tokio::test]
    async fn test_read_config_file_directly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("svc.plist");
        std::fs::write(&path, "<plist/>").unwrap();
        let settings = settings_with_brew(&dir);
        let brew = Homebrew::with_runner(&settings, ScriptedRunner::default());
        assert_eq!(brew.read_config_file(&path).await.unwrap(), "<plist/>");
        assert!(brew.runner().calls().is_empty());
    }
}
