//! External process execution.
//!
//! Two modes are supported:
//!
//! - **Batch** ([`CommandRunner::run`]): wait for the child to exit and hand
//!   back everything it printed together with its exit code.
//! - **Streaming** ([`CommandRunner::stream`]): forward each line of stdout and
//!   stderr to callbacks as it arrives, then report the exit code. Used for
//!   long-running diagnostics such as `brew doctor`.
//!
//! [`ProcessRunner`] is the tokio-backed implementation. The trait exists so
//! the Homebrew client can be driven by something other than a real process.

use crate::error::{KettleError, Result};
use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Exit code reported when the child was terminated by a signal
pub const SIGNALLED_EXIT_CODE: i32 = -1;

/// Captured result of a batch invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout of a successful run, or `CommandFailed` naming `command`
    pub fn into_stdout(self, command: &str) -> Result<String> {
        if self.success() {
            Ok(self.stdout)
        } else {
            Err(KettleError::CommandFailed {
                command: command.to_string(),
                code: self.exit_code,
            })
        }
    }
}

type ChunkSink = Box<dyn FnMut(String) + Send>;
type ExitSink = Box<dyn FnOnce(i32) + Send>;

/// Callbacks for a streamed invocation
pub struct StreamCallbacks {
    on_stdout: ChunkSink,
    on_stderr: ChunkSink,
    on_exit: ExitSink,
}

impl StreamCallbacks {
    pub fn new(
        on_stdout: impl FnMut(String) + Send + 'static,
        on_stderr: impl FnMut(String) + Send + 'static,
        on_exit: impl FnOnce(i32) + Send + 'static,
    ) -> Self {
        Self {
            on_stdout: Box::new(on_stdout),
            on_stderr: Box::new(on_stderr),
            on_exit: Box::new(on_exit),
        }
    }
}

/// A running streamed command
pub struct StreamHandle {
    task: JoinHandle<Result<i32>>,
    cancel: Option<oneshot::Sender<()>>,
    /// Exit code, or the failure message, once the task has been joined
    outcome: Option<std::result::Result<i32, String>>,
}

impl StreamHandle {
    /// Ask the OS to terminate the child. Output already queued may still
    /// reach the callbacks; the exit callback still fires.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the child to exit and return its exit code.
    ///
    /// Dropping the returned future early is fine. Later calls return the
    /// same exit code without waiting.
    pub async fn wait(&mut self) -> Result<i32> {
        match &self.outcome {
            Some(Ok(code)) => return Ok(*code),
            Some(Err(message)) => return Err(KettleError::InvalidState(message.clone())),
            None => {}
        }

        let result = match (&mut self.task).await {
            Ok(result) => result,
            Err(e) => Err(KettleError::Io(std::io::Error::other(e))),
        };
        self.outcome = Some(match &result {
            Ok(code) => Ok(*code),
            Err(e) => Err(e.to_string()),
        });
        result
    }
}

/// Executes external programs
pub trait CommandRunner: Send + Sync {
    /// Run to completion and capture output. A non-zero exit is not an error
    /// at this level; see [`CommandOutput::into_stdout`].
    fn run(
        &self,
        program: &Path,
        args: &[String],
        envs: &[(String, String)],
    ) -> impl Future<Output = Result<CommandOutput>> + Send;

    /// Spawn and forward output to `callbacks` as it arrives
    fn stream(
        &self,
        program: &Path,
        args: &[String],
        envs: &[(String, String)],
        callbacks: StreamCallbacks,
    ) -> Result<StreamHandle>;

    /// Run and return stdout, failing with `CommandFailed` on a non-zero exit
    fn run_checked(
        &self,
        program: &Path,
        args: &[String],
        envs: &[(String, String)],
    ) -> impl Future<Output = Result<String>> + Send {
        async move {
            let output = self.run(program, args, envs).await?;
            output.into_stdout(&args.join(" "))
        }
    }
}

/// Runs commands as tokio child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    fn command(program: &Path, args: &[String], envs: &[(String, String)]) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .envs(envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        envs: &[(String, String)],
    ) -> Result<CommandOutput> {
        ensure_executable(program)?;
        debug!(
            "Running command: {} (envs: {:?})",
            display_command(program, args),
            envs.iter().map(|(k, _)| k).collect::<Vec<_>>()
        );

        let output = Self::command(program, args, envs)
            .output()
            .await
            .inspect_err(|e| error!("Failed to execute {}: {}", program.display(), e))?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(SIGNALLED_EXIT_CODE),
        };

        if result.success() {
            debug!("Command finished successfully");
        } else {
            debug!("Command failed with exit code {}", result.exit_code);
            if !result.stderr.trim().is_empty() {
                debug!("Stderr:\n{}", result.stderr.trim());
            }
        }

        Ok(result)
    }

    fn stream(
        &self,
        program: &Path,
        args: &[String],
        envs: &[(String, String)],
        callbacks: StreamCallbacks,
    ) -> Result<StreamHandle> {
        ensure_executable(program)?;
        let command = display_command(program, args);
        debug!("Streaming command: {}", command);

        let mut child = Self::command(program, args, envs).spawn()?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let StreamCallbacks {
            on_stdout,
            on_stderr,
            on_exit,
        } = callbacks;
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let out_task = stdout.map(|pipe| tokio::spawn(forward_chunks(pipe, on_stdout)));
            let err_task = stderr.map(|pipe| tokio::spawn(forward_chunks(pipe, on_stderr)));

            let exited = tokio::select! {
                status = child.wait() => Some(status?),
                Ok(()) = &mut cancel_rx => None,
            };

            let cancelled = exited.is_none();
            let status = match exited {
                Some(status) => status,
                None => {
                    debug!("Cancelling: {}", command);
                    if let Err(e) = child.start_kill() {
                        warn!("Failed to terminate {}: {}", command, e);
                    }
                    child.wait().await?
                }
            };

            for reader in [out_task, err_task].into_iter().flatten() {
                if cancelled {
                    // Grandchildren may still hold the pipes open
                    reader.abort();
                } else {
                    let _ = reader.await;
                }
            }

            let code = status.code().unwrap_or(SIGNALLED_EXIT_CODE);
            debug!("{} exited with code {}", command, code);
            on_exit(code);
            Ok(code)
        });

        Ok(StreamHandle {
            task,
            cancel: Some(cancel_tx),
            outcome: None,
        })
    }
}

async fn forward_chunks<R: AsyncRead + Unpin>(pipe: R, mut sink: ChunkSink) {
    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => sink(String::from_utf8_lossy(&buf).into_owned()),
            Err(e) => {
                warn!("Stopped reading command output: {}", e);
                break;
            }
        }
    }
}

/// Fail with `InvalidState` unless `program` resolves to an executable
pub fn ensure_executable(program: &Path) -> Result<()> {
    which::which(program).map(|_| ()).map_err(|_| {
        KettleError::InvalidState(format!("Executable not found: {}", program.display()))
    })
}

/// Human-readable command line for logs
pub fn display_command(program: &Path, args: &[String]) -> String {
    if args.is_empty() {
        program.display().to_string()
    } else {
        format!("{} {}", program.display(), args.join(" "))
    }
}
