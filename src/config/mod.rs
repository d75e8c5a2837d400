// Configuration - Chain fork schedule and system-call economics
// Principle: Loaded once at startup, read-only afterwards

pub mod chain;
pub mod syscall;

pub use chain::*;
pub use syscall::*;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported fork ordering: {fork} not enabled, but {next} enabled at block {next_block}")]
    MissingFork {
        fork: &'static str,
        next: &'static str,
        next_block: u64,
    },

    #[error("Unsupported fork ordering: {fork} enabled at block {fork_block}, but {next} enabled at block {next_block}")]
    ForkOrder {
        fork: &'static str,
        fork_block: u64,
        next: &'static str,
        next_block: u64,
    },

    #[error("Invalid PoA parameters: {0}")]
    InvalidParlia(String),
}
