use thiserror::Error;

/// Top-level error type for recall.
#[derive(Error, Debug)]
pub enum RecallError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Cannot locate the running executable: {0}")]
    Executable(#[source] std::io::Error),
}
