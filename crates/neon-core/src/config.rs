//! Executor configuration.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_INTERPRETER: &str = "python";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_FILE_SUFFIX: &str = ".py";

/// Settings for spawning the interpreter against a submitted snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Interpreter binary, resolved through `PATH` when not absolute
    pub interpreter: String,
    /// Wall-clock limit for a single run
    pub timeout: Duration,
    /// Suffix given to the temporary source file
    pub file_suffix: String,
    /// Directory for temporary source files (if None, uses the OS temp dir)
    pub temp_dir: Option<PathBuf>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            timeout: DEFAULT_TIMEOUT,
            file_suffix: DEFAULT_FILE_SUFFIX.to_string(),
            temp_dir: None,
        }
    }
}

impl ExecutorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.file_suffix = suffix.into();
        self
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExecutorConfig::default();
        assert_eq!(config.interpreter, "python");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.file_suffix, ".py");
        assert!(config.temp_dir.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let config = ExecutorConfig::new()
            .with_interpreter("python3")
            .with_timeout(Duration::from_millis(1500))
            .with_file_suffix(".sh")
            .with_temp_dir("/var/tmp/neon");

        assert_eq!(config.interpreter, "python3");
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.file_suffix, ".sh");
        assert_eq!(config.temp_dir, Some(PathBuf::from("/var/tmp/neon")));
    }
}
