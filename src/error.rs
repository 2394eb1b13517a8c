//! Error types for lockview.
//!
//! Uses thiserror for derive macros and provides caller-actionable error
//! messages. Decode failures on stored values are deliberately not errors;
//! they are absorbed by the raw-value fallback in the registry.

use thiserror::Error;

/// Main error type for lockview operations.
#[derive(Error, Debug)]
pub enum LockviewError {
    /// Caller asked for a listing with a mode outside the allowed set.
    #[error("invalid mode '{0}' (only job, batch, default, all allowed)")]
    InvalidMode(String),

    /// The underlying key-value store reported a failure.
    #[error("store operation failed: {0}")]
    Store(String),
}

/// Result type alias for lockview operations.
pub type Result<T> = std::result::Result<T, LockviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_mode_error_names_the_allowed_set() {
        let err = LockviewError::InvalidMode("everything".to_string());
        assert_eq!(
            err.to_string(),
            "invalid mode 'everything' (only job, batch, default, all allowed)"
        );
    }

    #[test]
    fn store_error_carries_the_backend_message() {
        let err = LockviewError::Store("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "store operation failed: connection refused"
        );
    }
}
