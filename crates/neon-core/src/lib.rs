//! Core execution layer for the Neon Code runner
//!
//! Turns a snippet of source text into a single line of feedback for the editor:
//! the snippet is written to a throwaway file, handed to an interpreter in a child
//! process with a wall-clock limit, and whatever the process printed is reduced to
//! one `output` string. Failures to run the program at all are reported through
//! the same string so callers never have to branch on transport status.

pub mod config;
pub mod errors;
pub mod executors;

pub use config::{ExecutorConfig, DEFAULT_FILE_SUFFIX, DEFAULT_INTERPRETER, DEFAULT_TIMEOUT};
pub use errors::ExecutorError;
pub use executors::local::LocalCodeExecutor;
pub use executors::{CodeExecutor, ProcessOutput, RunOutcome, NO_OUTPUT_PLACEHOLDER};
