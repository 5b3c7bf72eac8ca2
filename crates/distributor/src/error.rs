//! Distributor error types

use thiserror::Error;

/// Distributor-specific errors
#[derive(Debug, Error)]
pub enum DistributorError {
    /// Inbound control message could not be parsed
    #[error("control message parse error: {message}")]
    ControlParse { message: String },

    /// Service error (from contract)
    #[error("distribution error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl DistributorError {
    /// Create a control message parse error
    pub fn control_parse(message: impl Into<String>) -> Self {
        Self::ControlParse {
            message: message.into(),
        }
    }
}
