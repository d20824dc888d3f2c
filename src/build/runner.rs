use super::command::CommandLine;
use crate::error::ToolStatus;
use std::io;
use std::path::PathBuf;
use std::process::Command;

/// Result of one finished tool invocation.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// `None` when the process ended without an exit code
    pub code: Option<i32>,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn status(&self) -> ToolStatus {
        match self.code {
            Some(code) => ToolStatus::Exited(code),
            None => ToolStatus::Terminated,
        }
    }
}

/// Runs compiler and linker invocations, one at a time, to completion.
pub trait ToolRunner {
    /// Launch errors are returned as `Err`; a tool that ran and failed is
    /// `Ok` with a non-zero code.
    fn run(&mut self, cmd: &CommandLine) -> io::Result<ToolOutput>;
}

/// Spawns real processes with the project root as working directory.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    cwd: PathBuf,
}

impl SystemRunner {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

impl ToolRunner for SystemRunner {
    fn run(&mut self, cmd: &CommandLine) -> io::Result<ToolOutput> {
        let output = Command::new(&cmd.program)
            .args(&cmd.args)
            .current_dir(&self.cwd)
            .output()?;
        Ok(ToolOutput {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
