use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::cli::{ClaudeCli, DEFAULT_PROGRAM};

/// Startup options. Every flag can also come from the environment (or a
/// `.env` file loaded before parsing).
#[derive(Debug, Clone, Parser)]
#[command(
    name = "claude-http-wrapper",
    version,
    about = "Exposes the Claude CLI as an HTTP API."
)]
pub struct WrapperConfig {
    /// Host to bind to
    #[arg(long, env = "CLAUDE_WRAPPER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "CLAUDE_WRAPPER_PORT", default_value_t = 8765)]
    pub port: u16,

    /// Claude CLI executable, resolved through PATH when not a path
    #[arg(long = "claude-bin", env = "CLAUDE_BIN", default_value = DEFAULT_PROGRAM)]
    pub claude_bin: PathBuf,

    /// Seconds a single CLI invocation may run before it is killed
    #[arg(long, env = "CLAUDE_TIMEOUT_SECS", default_value_t = 120)]
    pub timeout_secs: u64,
}

impl WrapperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cli(&self) -> ClaudeCli {
        ClaudeCli::new(self.claude_bin.clone(), self.timeout())
    }
}
