//! Code execution for submitted snippets.
//!
//! A `CodeExecutor` runs one snippet and reports what the process printed, or an
//! `ExecutorError` when the run itself could not happen. `RunOutcome` folds that
//! result into the single piece of text handed back to the caller, keeping the
//! "errors become content" rule in one place.

use async_trait::async_trait;

use crate::errors::ExecutorError;

pub mod local;

/// Text returned when a program finishes without writing to either stream.
pub const NO_OUTPUT_PLACEHOLDER: &str = "Program ran with no output";

/// Captured streams of a finished interpreter process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// Recorded for logging; never used to select the output text.
    pub exit_code: Option<i32>,
}

#[async_trait]
pub trait CodeExecutor: Send + Sync {
    async fn execute_code(&self, code: &str) -> Result<ProcessOutput, ExecutorError>;

    /// Execute `code` and resolve the result into its user-facing outcome.
    async fn run(&self, code: &str) -> RunOutcome {
        RunOutcome::from_execution(self.execute_code(code).await)
    }
}

/// What a run amounts to from the caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The program ran; carries stderr, stdout or the placeholder, in that order.
    Output(String),
    /// The program could not be run to completion; carries the reason.
    Failure(String),
}

impl RunOutcome {
    pub fn from_execution(result: Result<ProcessOutput, ExecutorError>) -> Self {
        match result {
            Err(e) => RunOutcome::Failure(e.to_string()),
            Ok(output) if !output.stderr.is_empty() => RunOutcome::Output(output.stderr),
            Ok(output) if !output.stdout.is_empty() => RunOutcome::Output(output.stdout),
            Ok(_) => RunOutcome::Output(NO_OUTPUT_PLACEHOLDER.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RunOutcome::Failure(_))
    }

    pub fn into_text(self) -> String {
        match self {
            RunOutcome::Output(text) | RunOutcome::Failure(text) => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn finished(stdout: &str, stderr: &str, exit_code: i32) -> Result<ProcessOutput, ExecutorError> {
        Ok(ProcessOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code: Some(exit_code),
        })
    }

    #[test]
    fn test_stdout_is_returned_verbatim() {
        let outcome = RunOutcome::from_execution(finished("hi\n", "", 0));
        assert_eq!(outcome, RunOutcome::Output("hi\n".to_string()));
    }

    #[test]
    fn test_stderr_wins_even_on_success_status() {
        let outcome = RunOutcome::from_execution(finished("printed\n", "DeprecationWarning\n", 0));
        assert_eq!(outcome, RunOutcome::Output("DeprecationWarning\n".to_string()));
    }

    #[test]
    fn test_exit_code_does_not_affect_selection() {
        let outcome = RunOutcome::from_execution(finished("partial\n", "", 3));
        assert_eq!(outcome.into_text(), "partial\n");
    }

    #[test]
    fn test_empty_streams_yield_placeholder() {
        let outcome = RunOutcome::from_execution(finished("", "", 0));
        assert!(!outcome.is_failure());
        assert_eq!(outcome.into_text(), "Program ran with no output");
    }

    #[test]
    fn test_whitespace_only_stdout_is_not_empty() {
        let outcome = RunOutcome::from_execution(finished("\n", "", 0));
        assert_eq!(outcome.into_text(), "\n");
    }

    #[test]
    fn test_executor_error_becomes_failure_text() {
        let outcome = RunOutcome::from_execution(Err(ExecutorError::Timeout {
            command: "python /tmp/neon-x.py".to_string(),
            timeout: Duration::from_secs(5),
        }));
        assert!(outcome.is_failure());
        assert_eq!(
            outcome.into_text(),
            "Command 'python /tmp/neon-x.py' timed out after 5 seconds"
        );
    }

    struct FixedExecutor;

    #[async_trait]
    impl CodeExecutor for FixedExecutor {
        async fn execute_code(&self, code: &str) -> Result<ProcessOutput, ExecutorError> {
            Ok(ProcessOutput {
                stdout: format!("ran {} bytes", code.len()),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_run_resolves_through_policy() {
        let outcome = FixedExecutor.run("abc").await;
        assert_eq!(outcome, RunOutcome::Output("ran 3 bytes".to_string()));
    }
}
