//! Command templates
//!
//! A device command is configured as a whitespace-separated argument list
//! with `{name}` placeholders, e.g. `arecord -q -f cd {output}`.

use crate::device::error::DeviceError;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::{debug, error};

/// Placeholder for the file a device should write
pub const OUTPUT_VAR: &str = "output";

/// Placeholder for the resource a device should read
pub const URI_VAR: &str = "uri";

/// A parsed command line with placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    program: String,
    args: Vec<String>,
}

impl CommandTemplate {
    /// Create a template from an explicit argument list
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parse a template; blank input yields `None`
    pub fn parse(template: &str) -> Option<Self> {
        let mut parts = template.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Executable to run
    pub fn program(&self) -> &str {
        &self.program
    }

    /// True if any argument mentions `{name}`
    pub fn uses(&self, name: &str) -> bool {
        let placeholder = format!("{{{}}}", name);
        self.args.iter().any(|a| a.contains(&placeholder))
    }

    /// Arguments with every `{name}` replaced by its value
    pub fn render_args(&self, vars: &[(&str, &str)]) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                vars.iter().fold(arg.clone(), |acc, (name, value)| {
                    acc.replace(&format!("{{{}}}", name), value)
                })
            })
            .collect()
    }

    /// Build a process for this template
    ///
    /// stdin is closed; stdout and stderr are left for the caller to set.
    pub fn command(&self, vars: &[(&str, &str)]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.render_args(vars)).stdin(Stdio::null());
        cmd
    }

    /// Run to completion, capturing output
    ///
    /// A non-zero exit is not an error here; callers decide what it means.
    pub async fn output(&self, vars: &[(&str, &str)]) -> Result<Output, DeviceError> {
        let mut cmd = self.command(vars);
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        debug!(command = %self.program, args = ?self.render_args(vars), "Spawning device process");

        cmd.output().await.map_err(|e| {
            error!(command = %self.program, error = %e, "Failed to spawn device process");
            DeviceError::SpawnFailed(e)
        })
    }
}

/// Describe a failed process for error reporting
pub(crate) fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let exit_code = output.status.code().unwrap_or(-1);
    format!("Process exited with code {}: {}", exit_code, stderr.trim())
}
