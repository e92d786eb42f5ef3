// src/executors/local.rs
use async_trait::async_trait;
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use tempfile::{Builder, TempPath};
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use super::{CodeExecutor, ProcessOutput};
use crate::config::ExecutorConfig;
use crate::errors::ExecutorError;

/// Runs snippets with an interpreter on the host, one child process per call.
///
/// The child inherits the server's environment, working directory and
/// privileges. Nothing is shared between calls apart from the configuration,
/// so concurrent calls only contend on the OS.
#[derive(Debug, Clone, Default)]
pub struct LocalCodeExecutor {
    config: ExecutorConfig,
}

impl LocalCodeExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Write `code` to a fresh, uniquely named file and close it.
    ///
    /// The returned `TempPath` removes the file when dropped, which covers
    /// early returns and unwinding. The normal path removes it explicitly.
    fn write_source(&self, code: &str) -> Result<TempPath, ExecutorError> {
        let mut builder = Builder::new();
        builder.prefix("neon-").suffix(&self.config.file_suffix);

        let mut file = match &self.config.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(ExecutorError::TempFile)?;

        file.write_all(code.as_bytes())
            .map_err(ExecutorError::TempFile)?;
        file.flush().map_err(ExecutorError::TempFile)?;

        Ok(file.into_temp_path())
    }

    async fn run_interpreter(&self, script: &Path) -> Result<ProcessOutput, ExecutorError> {
        let interpreter = &self.config.interpreter;

        let mut child = Command::new(interpreter)
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutorError::Spawn {
                interpreter: interpreter.clone(),
                source,
            })?;

        let mut stdout_pipe = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("child stdout was not captured"))?;
        let mut stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("child stderr was not captured"))?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        // Both pipes are drained while waiting so a chatty child cannot block on a full pipe.
        let collect = async {
            let (status, _, _) = tokio::try_join!(
                child.wait(),
                stdout_pipe.read_to_end(&mut stdout),
                stderr_pipe.read_to_end(&mut stderr)
            )?;
            Ok::<_, std::io::Error>(status)
        };
        let waited = tokio::time::timeout(self.config.timeout, collect).await;

        let status = match waited {
            Ok(status) => status?,
            Err(_) => {
                log::warn!(
                    "Execution of {} exceeded {:?}, killing interpreter",
                    script.display(),
                    self.config.timeout
                );
                if let Err(e) = child.kill().await {
                    log::warn!("Failed to kill timed out interpreter: {}", e);
                }
                return Err(ExecutorError::Timeout {
                    command: format!("{} {}", interpreter, script.display()),
                    timeout: self.config.timeout,
                });
            }
        };

        log::debug!(
            "Interpreter exited with {:?} ({} bytes stdout, {} bytes stderr)",
            status.code(),
            stdout.len(),
            stderr.len()
        );

        Ok(ProcessOutput {
            stdout: decode_text(stdout)?,
            stderr: decode_text(stderr)?,
            exit_code: status.code(),
        })
    }
}

/// Decode a captured stream as UTF-8 with universal newlines: `\r\n` and a
/// lone `\r` both become `\n`.
fn decode_text(bytes: Vec<u8>) -> Result<String, std::string::FromUtf8Error> {
    let text = String::from_utf8(bytes)?;
    if !text.contains('\r') {
        return Ok(text);
    }
    Ok(text.replace("\r\n", "\n").replace('\r', "\n"))
}

#[async_trait]
impl CodeExecutor for LocalCodeExecutor {
    async fn execute_code(&self, code: &str) -> Result<ProcessOutput, ExecutorError> {
        let script = self.write_source(code)?;
        log::debug!("Wrote {} bytes of source to {}", code.len(), script.display());

        let result = self.run_interpreter(&script).await;

        if let Err(e) = script.close() {
            log::warn!("Failed to remove temporary source file: {}", e);
        }

        result
    }
}
