use std::process::Command;

use tracing::debug;

use crate::error::{AgentError, Result};

/// Whether `name` is on PATH and executable.
pub fn is_tool(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Run a program to completion and return its stdout.
pub fn run_tool(program: &str, args: &[&str]) -> Result<Vec<u8>> {
    debug!("running {} {}", program, args.join(" "));
    let output = Command::new(program).args(args).output()?;

    if !output.status.success() {
        return Err(AgentError::ToolFailed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output.stdout)
}

/// Run a shell snippet and return its trimmed stdout.
pub fn run_shell(command: &str) -> Result<String> {
    let stdout = run_tool("sh", &["-c", command])?;
    Ok(String::from_utf8_lossy(&stdout).trim().to_string())
}
