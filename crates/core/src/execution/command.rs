//! External process invocation
//!
//! Every step that shells out goes through a [`ProcessInvoker`], so the engine can be
//! driven by [`CommandExecutor`] in production and by a recording double in tests.

use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::types::{ChoreError, ChoreResult};

/// A fully resolved external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: Vec::new(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Exit status and output of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub code: i32,
    /// Empty unless output is captured
    pub stdout: String,
    pub stderr: String,
}

/// Runs external programs to completion
pub trait ProcessInvoker {
    /// Run `invocation` and wait for it. A non-zero exit is an error.
    fn run(&self, invocation: &Invocation) -> ChoreResult<ProcessOutput>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Forward the child's stdout/stderr to ours
    #[default]
    Inherit,
    /// Collect stdout/stderr into the returned [`ProcessOutput`]
    Capture,
}

/// [`ProcessInvoker`] backed by `std::process::Command`
#[derive(Debug, Clone, Default)]
pub struct CommandExecutor {
    output: OutputMode,
}

impl CommandExecutor {
    pub fn new(output: OutputMode) -> Self {
        Self { output }
    }

    fn build_command(invocation: &Invocation) -> Command {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).stdin(Stdio::null());

        if let Some(dir) = &invocation.working_dir {
            command.current_dir(dir);
        }
        for (key, value) in &invocation.env {
            command.env(key, value);
        }
        command
    }

    fn launch_error(invocation: &Invocation, source: std::io::Error) -> ChoreError {
        ChoreError::ProcessLaunch {
            program: invocation.program.clone(),
            source,
        }
    }
}

impl ProcessInvoker for CommandExecutor {
    fn run(&self, invocation: &Invocation) -> ChoreResult<ProcessOutput> {
        debug!(command = %invocation, dir = ?invocation.working_dir, "spawning process");
        let mut command = Self::build_command(invocation);

        let (status, stdout, stderr) = match self.output {
            OutputMode::Inherit => {
                let status = command
                    .status()
                    .map_err(|e| Self::launch_error(invocation, e))?;
                (status, String::new(), String::new())
            }
            OutputMode::Capture => {
                let output = command
                    .output()
                    .map_err(|e| Self::launch_error(invocation, e))?;
                (
                    output.status,
                    String::from_utf8_lossy(&output.stdout).into_owned(),
                    String::from_utf8_lossy(&output.stderr).into_owned(),
                )
            }
        };

        if !status.success() {
            if !stderr.is_empty() {
                warn!(command = %invocation, "{}", stderr.trim_end());
            }
            return Err(ChoreError::ProcessExecution {
                program: invocation.program.clone(),
                code: status.code(),
            });
        }

        Ok(ProcessOutput {
            code: status.code().unwrap_or(0),
            stdout,
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display() {
        let invocation = Invocation::new("docker-compose").args(["-f", "local.yml", "up", "-d"]);
        assert_eq!(invocation.to_string(), "docker-compose -f local.yml up -d");
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let executor = CommandExecutor::new(OutputMode::Capture);
        let err = executor
            .run(&Invocation::new("definitely-not-an-installed-program-42"))
            .unwrap_err();
        assert!(matches!(err, ChoreError::ProcessLaunch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_output() {
        let executor = CommandExecutor::new(OutputMode::Capture);
        let output = executor
            .run(&Invocation::new("sh").args(["-c", "echo $GREETING"]).env("GREETING", "hi"))
            .unwrap();
        assert_eq!(output.code, 0);
        assert_eq!(output.stdout.trim(), "hi");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_execution_error() {
        let executor = CommandExecutor::new(OutputMode::Capture);
        let err = executor
            .run(&Invocation::new("sh").args(["-c", "exit 3"]))
            .unwrap_err();
        match err {
            ChoreError::ProcessExecution { program, code } => {
                assert_eq!(program, "sh");
                assert_eq!(code, Some(3));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_working_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("marker.txt"), "").unwrap();
        let executor = CommandExecutor::new(OutputMode::Capture);
        let output = executor
            .run(&Invocation::new("ls").current_dir(temp_dir.path()))
            .unwrap();
        assert!(output.stdout.contains("marker.txt"));
    }
}
