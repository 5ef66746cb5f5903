pub mod api;
pub mod cli;
pub mod config;
pub mod error;

pub use cli::{ClaudeCli, CliOutput};
pub use error::ChatError;
