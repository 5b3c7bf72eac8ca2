//! Archiver error types

use thiserror::Error;

/// Archiver-specific errors
#[derive(Debug, Error)]
pub enum ArchiverError {
    /// Entry body is not a form upload
    #[error("form upload parse error: {message}")]
    UploadParse { message: String },

    /// Service error (from contract)
    #[error("archive error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl ArchiverError {
    /// Create a form upload parse error
    pub fn upload_parse(message: impl Into<String>) -> Self {
        Self::UploadParse {
            message: message.into(),
        }
    }
}
