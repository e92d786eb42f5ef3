//! neon-server binary
//!
//! Serves the `/run` endpoint backed by a local interpreter.

use anyhow::Result;
use clap::Parser;
use neon_core::{ExecutorConfig, LocalCodeExecutor, DEFAULT_FILE_SUFFIX, DEFAULT_INTERPRETER};
use neon_server::{shutdown_signal, NeonServer, ServerConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Command line arguments for the runner server.
#[derive(Parser, Debug)]
#[command(name = "neon-server")]
#[command(about = "Runs submitted code snippets and returns their output over HTTP")]
#[command(version)]
struct Args {
    /// Server bind address
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    bind: String,

    /// Interpreter used to run submitted code
    #[arg(long, env = "NEON_INTERPRETER", default_value = DEFAULT_INTERPRETER)]
    interpreter: String,

    /// Execution timeout in seconds
    #[arg(long, env = "NEON_TIMEOUT", default_value = "5")]
    timeout: u64,

    /// Suffix of the temporary source file
    #[arg(long, env = "NEON_FILE_SUFFIX", default_value = DEFAULT_FILE_SUFFIX)]
    suffix: String,

    /// Directory for temporary source files (defaults to the OS temp dir)
    #[arg(long, env = "NEON_TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// Enable CORS
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    cors: bool,

    /// CORS allowed origins (comma-separated)
    #[arg(long)]
    cors_origins: Option<String>,

    /// Maximum request body size in bytes (unbounded when omitted)
    #[arg(long)]
    max_body_size: Option<usize>,

    /// Enable request logging
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    logging: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    let mut executor_config = ExecutorConfig::new()
        .with_interpreter(args.interpreter.as_str())
        .with_timeout(Duration::from_secs(args.timeout))
        .with_file_suffix(args.suffix.as_str());
    if let Some(ref dir) = args.temp_dir {
        executor_config = executor_config.with_temp_dir(dir);
    }

    let mut server_config = ServerConfig::new()
        .with_bind_addr_str(&args.bind)?
        .with_cors(args.cors)
        .with_logging(args.logging);
    if let Some(size) = args.max_body_size {
        server_config = server_config.with_max_body_size(size);
    }
    if let Some(ref origins) = args.cors_origins {
        server_config = server_config
            .with_cors_origins(origins.split(',').map(|s| s.trim().to_string()).collect());
    }

    log::info!("Starting Neon runner...");
    log::info!("Configuration:");
    log::info!("  Bind address: {}", server_config.bind_addr);
    log::info!("  Interpreter: {}", executor_config.interpreter);
    log::info!("  Timeout: {}s", args.timeout);
    log::info!("  Source suffix: {}", executor_config.file_suffix);
    log::info!(
        "  Temp dir: {}",
        executor_config
            .temp_dir
            .as_ref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| std::env::temp_dir().display().to_string())
    );
    log::info!("  CORS enabled: {}", server_config.enable_cors);
    match server_config.max_body_size {
        Some(size) => log::info!("  Max body size: {} bytes", size),
        None => log::info!("  Max body size: unbounded"),
    }
    log::warn!("Submitted code runs unsandboxed with this process's privileges");

    let server = NeonServer::with_config(LocalCodeExecutor::new(executor_config), server_config);

    if let Err(e) = server.serve_with_shutdown(shutdown_signal()).await {
        log::error!("Server failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
