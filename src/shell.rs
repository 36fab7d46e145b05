//! Elevated command execution.
//!
//! Daemon launch and teardown both go through a root shell. The trait
//! keeps the engine testable; the real implementation wraps each command
//! line in `su -c`.

use std::cell::RefCell;
use std::process::Command;

use tracing::debug;

use crate::error::{InjectorError, Result};

const SU_BIN: &str = "su";

/// Run a command line with elevated privileges
pub trait ElevatedShell {
    fn run(&self, command: &str) -> Result<()>;
}

/// Shell that wraps every command in `su -c`
#[derive(Debug, Default)]
pub struct SuShell;

impl SuShell {
    pub fn new() -> Self {
        Self
    }

    /// Probe whether `su` actually grants root by running `id` elevated
    /// and looking for `uid=0` in its output.
    pub fn check_root(&self) -> bool {
        match Command::new(SU_BIN).args(["-c", "id"]).output() {
            Ok(output) => String::from_utf8_lossy(&output.stdout).contains("uid=0"),
            Err(err) => {
                debug!("su probe failed: {}", err);
                false
            }
        }
    }
}

impl ElevatedShell for SuShell {
    fn run(&self, command: &str) -> Result<()> {
        let status = Command::new(SU_BIN)
            .args(["-c", command])
            .status()
            .map_err(|err| {
                InjectorError::PermissionDenied(format!("failed to run su: {}", err))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(InjectorError::PermissionDenied(format!(
                "su -c '{}' exited with {}",
                command, status
            )))
        }
    }
}

/// Test double that records command lines instead of running them
#[derive(Debug, Default)]
pub struct RecordingShell {
    commands: RefCell<Vec<String>>,
    fail: bool,
}

impl RecordingShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recording shell whose every `run` fails after recording.
    pub fn failing() -> Self {
        Self {
            commands: RefCell::new(Vec::new()),
            fail: true,
        }
    }

    /// Command lines seen so far, oldest first.
    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }
}

impl ElevatedShell for RecordingShell {
    fn run(&self, command: &str) -> Result<()> {
        self.commands.borrow_mut().push(command.to_string());
        if self.fail {
            return Err(InjectorError::PermissionDenied(format!(
                "elevated run refused: {}",
                command
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_shell_captures_commands_in_order() {
        let shell = RecordingShell::new();
        shell.run("id").expect("recording run should succeed");
        shell.run("pkill -f location_injector").expect("recording run should succeed");

        assert_eq!(shell.commands(), vec!["id", "pkill -f location_injector"]);
    }

    #[test]
    fn test_failing_shell_records_then_errors() {
        let shell = RecordingShell::failing();
        let result = shell.run("id");

        assert!(result.is_err(), "failing shell should report an error");
        assert_eq!(
            shell.commands(),
            vec!["id"],
            "command should be recorded even when the run fails"
        );
    }
}
