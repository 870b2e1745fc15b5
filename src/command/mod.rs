use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::process::Command;
use tokio::runtime::Runtime;

use crate::clock;
use crate::error::PanelError;

/// How a single command line ended.
#[derive(Debug)]
pub enum CommandOutcome {
    Exited {
        stdout: String,
        stderr: String,
        exit_code: i32,
    },
    /// Spawn failure or timeout; the process produced no usable result.
    Failed(PanelError),
}

/// One execution of a command line. Built once, never mutated.
#[derive(Debug)]
pub struct CommandResult {
    pub command: String,
    pub timestamp: String,
    pub outcome: CommandOutcome,
}

impl CommandResult {
    pub fn stdout(&self) -> &str {
        match &self.outcome {
            CommandOutcome::Exited { stdout, .. } => stdout,
            CommandOutcome::Failed(_) => "",
        }
    }

    /// Captured stderr, or the error message when the command never completed.
    pub fn stderr(&self) -> String {
        match &self.outcome {
            CommandOutcome::Exited { stderr, .. } => stderr.clone(),
            CommandOutcome::Failed(err) => err.to_string(),
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match &self.outcome {
            CommandOutcome::Exited { exit_code, .. } => Some(*exit_code),
            CommandOutcome::Failed(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.outcome, CommandOutcome::Failed(PanelError::Timeout { .. }))
    }

    /// Lines appended to the output log for this execution.
    pub fn log_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("[{}] $ {}", self.timestamp, self.command)];
        match self.exit_code() {
            Some(code) => {
                let stdout = self.stdout().trim();
                if !stdout.is_empty() {
                    lines.push(stdout.to_string());
                }
                let stderr = self.stderr();
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    lines.push(format!("[stderr] {stderr}"));
                }
                lines.push(format!("[exit code: {code}]"));
            }
            None => lines.push(format!("❌ Error: {}", self.stderr())),
        }
        lines
    }
}

/// Runs command lines through the platform shell.
///
/// The input is handed to the shell as typed, so pipes, redirects and
/// chaining all work. Whoever types into the panel is trusted.
pub struct CommandExecutor {
    runtime: Arc<Runtime>,
}

impl CommandExecutor {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }

    /// Returns `None` for empty or whitespace-only input.
    pub fn execute(&self, command: &str, timeout: Duration) -> Option<CommandResult> {
        let command = command.trim();
        if command.is_empty() {
            return None;
        }

        info!("Executing command: {}", command);
        let result = CommandResult {
            command: command.to_string(),
            timestamp: clock::timestamp(),
            outcome: self.run(command, timeout).unwrap_or_else(CommandOutcome::Failed),
        };

        match result.exit_code() {
            Some(code) => info!("Command `{}` exited with {}", command, code),
            None if result.is_timeout() => warn!("Command `{}` killed: {}", command, result.stderr()),
            None => warn!("Command `{}` failed: {}", command, result.stderr()),
        }
        Some(result)
    }

    fn run(&self, command: &str, timeout: Duration) -> Result<CommandOutcome, PanelError> {
        let mut child = shell_command(command);
        child.stdin(Stdio::null()).kill_on_drop(true);

        // Dropping the `output()` future on timeout kills the child.
        let output = self
            .runtime
            .block_on(async { tokio::time::timeout(timeout, child.output()).await })
            .map_err(|_| PanelError::Timeout {
                what: "command",
                after: timeout,
            })??;

        Ok(CommandOutcome::Exited {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: exit_code(&output.status),
        })
    }
}

/// OS exit code, or `-N` when the process died from signal N.
#[cfg(unix)]
fn exit_code(status: &ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| -sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: &ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    // cmd.exe parses the line itself, so it goes through unescaped
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").raw_arg(line);
    cmd
}

#[cfg(not(windows))]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", line]);
    cmd
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;

    fn executor() -> CommandExecutor {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        CommandExecutor::new(Arc::new(runtime))
    }

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[test]
    fn test_echo_captures_stdout() {
        let result = executor().execute("echo Hello", TIMEOUT).unwrap();
        assert_eq!(result.command, "echo Hello");
        assert_eq!(result.stdout().trim(), "Hello");
        assert_eq!(result.exit_code(), Some(0));
        assert!(result.stderr().is_empty());
    }

    #[test]
    fn test_exit_code_is_reported() {
        let result = executor().execute("exit 3", TIMEOUT).unwrap();
        assert_eq!(result.exit_code(), Some(3));
        assert_eq!(result.log_lines().last().unwrap(), "[exit code: 3]");
    }

    #[test]
    fn test_stderr_is_captured() {
        let result = executor().execute("echo oops 1>&2", TIMEOUT).unwrap();
        assert_eq!(result.stderr().trim(), "oops");
        assert!(result.log_lines().contains(&"[stderr] oops".to_string()));
    }

    #[test]
    fn test_shell_pipes_work() {
        let result = executor()
            .execute("printf 'a\\nb\\nc\\n' | wc -l", TIMEOUT)
            .unwrap();
        assert_eq!(result.stdout().trim(), "3");
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let exec = executor();
        assert!(exec.execute("", TIMEOUT).is_none());
        assert!(exec.execute("   \n\t", TIMEOUT).is_none());
    }

    #[test]
    fn test_input_is_trimmed() {
        let result = executor().execute("  echo hi  \n", TIMEOUT).unwrap();
        assert_eq!(result.command, "echo hi");
    }

    #[test]
    fn test_timeout_does_not_hang() {
        let started = Instant::now();
        let result = executor()
            .execute("sleep 5", Duration::from_secs(1))
            .unwrap();
        assert!(started.elapsed() < Duration::from_secs(4));
        assert!(result.is_timeout());
        assert_eq!(result.exit_code(), None);
        assert!(result.stderr().contains("timed out"));

        let lines = result.log_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("❌ Error: "));
    }

    #[test]
    fn test_signal_is_reported_as_negative_code() {
        let result = executor().execute("kill -9 $$", TIMEOUT).unwrap();
        assert_eq!(result.exit_code(), Some(-9));
        assert_eq!(result.log_lines().last().unwrap(), "[exit code: -9]");
    }

    #[test]
    fn test_missing_program_reports_nonzero() {
        let result = executor()
            .execute("definitely-not-a-real-program-xyz", TIMEOUT)
            .unwrap();
        assert_eq!(result.exit_code(), Some(127));
        assert!(!result.stderr().is_empty());
    }

    #[test]
    fn test_log_lines_layout() {
        let result = CommandResult {
            command: "echo Hello".to_string(),
            timestamp: "12:00:00".to_string(),
            outcome: CommandOutcome::Exited {
                stdout: "Hello\n".to_string(),
                stderr: String::new(),
                exit_code: 0,
            },
        };
        assert_eq!(
            result.log_lines(),
            vec!["[12:00:00] $ echo Hello", "Hello", "[exit code: 0]"]
        );
    }
}
