use std::time::{Duration, Instant};
use tokio::process::Command;

use crate::error::ExecutionError;

const SHELL: &str = "bash";

// Outcome of one command run, output is kept even when it failed
#[derive(Debug)]
pub struct ExecutionResult {
    pub error: Option<ExecutionError>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Run `command` as a single `bash -c` command line and wait for it.
///
/// There is no timeout. The child is not killed if this future is dropped,
/// so a caller going away never interrupts a command that already started.
pub async fn execute(command: &str) -> ExecutionResult {
    let start = Instant::now();
    let output = Command::new(SHELL).arg("-c").arg(command).output().await;
    let duration = start.elapsed();

    match output {
        Ok(output) => ExecutionResult {
            error: (!output.status.success()).then(|| ExecutionError::Exit(output.status)),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration,
        },
        Err(e) => ExecutionResult {
            error: Some(ExecutionError::Spawn(e)),
            stdout: String::new(),
            stderr: String::new(),
            duration,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout() {
        let result = execute("echo hello").await;
        assert!(result.is_success());
        assert_eq!(result.stdout, "hello\n");
        assert_eq!(result.stderr, "");
    }

    #[tokio::test]
    async fn nonzero_exit_is_an_error() {
        let result = execute("echo partial; echo broken >&2; exit 3").await;
        assert!(!result.is_success());
        assert_eq!(result.stdout, "partial\n");
        assert_eq!(result.stderr, "broken\n");
        match result.error {
            Some(ExecutionError::Exit(status)) => assert_eq!(status.code(), Some(3)),
            other => panic!("expected exit error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn measures_duration() {
        let result = execute("sleep 0.2").await;
        assert!(result.is_success());
        assert!(result.duration >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn runs_through_a_shell() {
        let result = execute("for i in 1 2; do printf $i; done | tr 12 ab").await;
        assert_eq!(result.stdout, "ab");
    }
}
