use thiserror::Error;

/// Unified error type for the entire stock-variance-core library.
/// Every public fallible function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Filters / Configuration ─────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    // ── Service / Network ───────────────────────────────────────────
    #[error("Service error: {0}")]
    Service(String),

    #[error("Service fault (no message provided)")]
    ServiceFault,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Rendering ───────────────────────────────────────────────────
    #[error("Chart backend error: {0}")]
    ChartBackend(String),
}

impl CoreError {
    /// The human-readable message supplied by the transport or the service,
    /// if there is one worth showing to the user as-is.
    ///
    /// Faults without a message and malformed payloads return `None`, and the
    /// dashboard falls back to its generic error text.
    pub fn user_message(&self) -> Option<&str> {
        let msg = match self {
            CoreError::ValidationError(m) | CoreError::Service(m) | CoreError::Network(m) => m,
            _ => return None,
        };
        let trimmed = msg.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Network messages reach the status banner; keep the endpoint URL out of them.
        CoreError::Network(e.without_url().to_string())
    }
}
