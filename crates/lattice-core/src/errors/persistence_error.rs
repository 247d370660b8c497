/// Failures reported by a `PersistenceAdapter`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("persistence operation {operation} failed: {reason}")]
    OperationFailed { operation: String, reason: String },

    #[error("persistence operation {operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("persistence backend unavailable: {reason}")]
    Unavailable { reason: String },
}

impl PersistenceError {
    pub fn failed(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}
