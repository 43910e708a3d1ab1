// src/system/shell.rs

use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Command '{command}' could not be started: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Command '{command}' exited with a non-zero status ({status}).")]
    NonZeroExit {
        command: String,
        status: std::process::ExitStatus,
        output: String,
    },
}

impl ShellError {
    /// The diagnostic text captured from the failed command, if any.
    pub fn captured_output(&self) -> &str {
        match self {
            Self::Spawn { .. } => "",
            Self::NonZeroExit { output, .. } => output,
        }
    }
}

/// Executes a raw command string through the platform shell and captures its
/// combined stdout/stderr output.
///
/// The whole line is handed to `sh -c` (or `cmd /C` on Windows) unparsed, so
/// pipes, redirections, and compound commands behave as in a shell script.
/// This blocks until the command exits; there is no timeout and no streaming.
/// A non-zero exit is reported as `ShellError::NonZeroExit` carrying the
/// captured diagnostic text, never as a panic.
pub fn execute_capture(command_line: &str, cwd: Option<&Path>) -> Result<String, ShellError> {
    let trimmed_command = command_line.trim();
    if trimmed_command.is_empty() {
        return Ok(String::new()); // An empty command is a success, not an error.
    }

    let mut command = if cfg!(target_os = "windows") {
        let mut command = StdCommand::new("cmd");
        command.arg("/C").arg(trimmed_command);
        command
    } else {
        let mut command = StdCommand::new("sh");
        command.arg("-c").arg(trimmed_command);
        command
    };

    if let Some(dir) = cwd {
        command.current_dir(dunce::simplified(dir));
    }

    log::debug!(
        "Executing '{}' in {}",
        trimmed_command,
        cwd.map_or_else(|| "the current directory".to_string(), |d| d.display().to_string())
    );

    let command_output = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| ShellError::Spawn {
            command: trimmed_command.to_string(),
            source: e,
        })?;

    // stdout first, then stderr, so the log reads in the order a terminal
    // user would roughly see it. Invalid UTF-8 is replaced, not rejected.
    let mut output = String::from_utf8_lossy(&command_output.stdout).into_owned();
    output.push_str(&String::from_utf8_lossy(&command_output.stderr));

    if !command_output.status.success() {
        return Err(ShellError::NonZeroExit {
            command: trimmed_command.to_string(),
            status: command_output.status,
            output,
        });
    }

    Ok(output)
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout() {
        let output = execute_capture("echo hi", None).unwrap();
        assert_eq!(output, "hi\n");
    }

    #[test]
    fn test_captures_stderr_combined() {
        let output = execute_capture("echo out && echo err 1>&2", None).unwrap();
        assert_eq!(output, "out\nerr\n");
    }

    #[test]
    fn test_runs_in_given_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = execute_capture("pwd", Some(dir.path())).unwrap();
        let reported = std::fs::canonicalize(output.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn test_non_zero_exit_reports_diagnostic_text() {
        let err = execute_capture("echo broken 1>&2; exit 3", None).unwrap_err();
        match &err {
            ShellError::NonZeroExit { status, output, .. } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(output, "broken\n");
            }
            other => panic!("expected NonZeroExit, got {:?}", other),
        }
        assert_eq!(err.captured_output(), "broken\n");
    }

    #[test]
    fn test_empty_command_is_a_success() {
        assert_eq!(execute_capture("   ", None).unwrap(), "");
    }
}
