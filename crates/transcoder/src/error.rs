//! Transcoder error types

use thiserror::Error;

/// Transcoder-specific errors
#[derive(Debug, Error)]
pub enum TranscoderError {
    /// Inbound payload could not be parsed
    #[error("payload parse error: {message}")]
    PayloadParse { message: String },

    /// Submission text does not follow the delimited format
    #[error("submission format error: {message}")]
    SubmissionFormat { message: String },

    /// Form definition could not be parsed
    #[error("form definition error for '{form_id}': {message}")]
    FormDefinition { form_id: String, message: String },

    /// Transport error (from contract)
    #[error("transcode error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl TranscoderError {
    /// Create a payload parse error
    pub fn payload_parse(message: impl Into<String>) -> Self {
        Self::PayloadParse {
            message: message.into(),
        }
    }

    /// Create a submission format error
    pub fn submission_format(message: impl Into<String>) -> Self {
        Self::SubmissionFormat {
            message: message.into(),
        }
    }

    /// Create a form definition error
    pub fn form_definition(form_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FormDefinition {
            form_id: form_id.into(),
            message: message.into(),
        }
    }
}
