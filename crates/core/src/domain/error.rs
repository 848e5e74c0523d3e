// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid priority: {0} (expected a decimal in [0.0, 1.0])")]
    InvalidPriority(String),

    #[error("Invalid change frequency: {0}")]
    InvalidChangeFrequency(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
