//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::db::Database;
use clap::Parser;
use tracing::error;

/// Shortest accepted token secret. HS256 keys should carry at least 256 bits.
pub const MIN_TOKEN_SECRET_LENGTH: usize = 32;

/// Environment variable holding the token secret.
pub const TOKEN_SECRET_ENV: &str = "TOKEN_SECRET";

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "tokengate", about = "Bearer token authentication service")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Path to file containing the token secret. Prefer using TOKEN_SECRET env var instead
    #[arg(long)]
    pub token_secret_file: Option<String>,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load the token secret from the environment variable or a file.
/// Returns None and logs an error if the secret is missing or too short.
///
/// Must be called before any other thread is started, including the tokio
/// runtime's workers, because it removes the environment variable.
pub fn load_token_secret(token_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Some(secret) = take_env_secret(TOKEN_SECRET_ENV) {
        secret
    } else if let Some(path) = token_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read token secret file");
                return None;
            }
        }
    } else {
        error!(
            "Token secret is required. Set TOKEN_SECRET environment variable (recommended) or use --token-secret-file"
        );
        return None;
    };

    validate_token_secret(secret)
}

/// Read and clear an environment variable so the secret does not leak to
/// child processes.
fn take_env_secret(name: &str) -> Option<String> {
    let secret = std::env::var(name).ok()?;
    // SAFETY: only reached from `load_token_secret`, which runs before the
    // process starts any other thread.
    unsafe { std::env::remove_var(name) };
    Some(secret)
}

fn validate_token_secret(secret: String) -> Option<String> {
    if secret.len() < MIN_TOKEN_SECRET_LENGTH {
        error!(
            "Token secret is shorter than {} characters. Use a longer secret",
            MIN_TOKEN_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Build ServerConfig from validated arguments with in-memory stores.
pub fn build_config(token_secret: String) -> ServerConfig {
    ServerConfig {
        db: Database::in_memory(),
        token_secret: token_secret.into_bytes(),
        hasher: None,
    }
}
