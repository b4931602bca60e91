use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration source not found")]
    SourceNotFound,

    #[error("configuration parsing failed: {0}")]
    ParseError(#[from] config::ConfigError),

    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
