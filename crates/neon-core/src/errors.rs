//! Error types for code execution failures
//!
//! Every variant here describes a run that never produced program output: the
//! source file could not be written, the interpreter could not be started or
//! waited on, the wall-clock limit expired, or the output was not text. Errors
//! raised by the submitted program itself are not errors at this layer; they
//! arrive as standard-error text in a normal `ProcessOutput`.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Could not create temporary source file: {0}")]
    TempFile(#[source] std::io::Error),
    #[error("Failed to start interpreter '{interpreter}': {source}")]
    Spawn {
        interpreter: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Command '{command}' timed out after {} seconds", .timeout.as_secs_f64())]
    Timeout { command: String, timeout: Duration },
    #[error("I/O error while waiting for interpreter: {0}")]
    Io(#[from] std::io::Error),
    #[error("Interpreter output is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_command_and_limit() {
        let err = ExecutorError::Timeout {
            command: "python /tmp/neon-abc.py".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert_eq!(
            err.to_string(),
            "Command 'python /tmp/neon-abc.py' timed out after 5 seconds"
        );
    }

    #[test]
    fn test_sub_second_timeout_message() {
        let err = ExecutorError::Timeout {
            command: "sh script.sh".to_string(),
            timeout: Duration::from_millis(250),
        };
        assert!(err.to_string().ends_with("timed out after 0.25 seconds"));
    }

    #[test]
    fn test_spawn_message_includes_interpreter() {
        let err = ExecutorError::Spawn {
            interpreter: "python".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("'python'"));
        assert!(msg.contains("not found"));
    }
}
