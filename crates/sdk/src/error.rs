//! SDK Error Types

use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// JSON-RPC code the daemon uses when it throttles callers
pub const THROTTLED_CODE: i32 = 4003;

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("RPC error ({code}): {message}")]
    Rpc { code: i32, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl SdkError {
    /// The daemon rejected the call by rate limit; retrying later may succeed
    pub fn is_throttled(&self) -> bool {
        matches!(self, SdkError::Rpc { code, .. } if *code == THROTTLED_CODE)
    }
}

impl From<jsonrpsee::core::ClientError> for SdkError {
    fn from(e: jsonrpsee::core::ClientError) -> Self {
        match e {
            jsonrpsee::core::ClientError::Call(call_err) => SdkError::Rpc {
                code: call_err.code(),
                message: call_err.message().to_string(),
            },
            jsonrpsee::core::ClientError::Transport(e) => SdkError::Transport(e.to_string()),
            jsonrpsee::core::ClientError::RestartNeeded(_) => {
                SdkError::Connection("Connection restart needed".to_string())
            }
            _ => SdkError::Other(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonrpsee::types::ErrorObjectOwned;

    #[test]
    fn test_call_error_keeps_code() {
        let err: SdkError = jsonrpsee::core::ClientError::Call(ErrorObjectOwned::owned(
            4003,
            "Rate limit exceeded",
            None::<()>,
        ))
        .into();

        assert!(err.is_throttled());
        assert!(err.to_string().contains("4003"));
    }

    #[test]
    fn test_other_rpc_error_not_throttled() {
        let err = SdkError::Rpc {
            code: 5001,
            message: "database locked".to_string(),
        };
        assert!(!err.is_throttled());
    }
}
