//! Form upload payload

use serde::Deserialize;

use crate::error::ArchiverError;

/// One form upload as carried by an entry body.
///
/// `data` keeps the submission's flattened key/value shape; the instance id
/// under `meta/instanceID` is the natural row key.
#[derive(Debug, Clone, Deserialize)]
pub struct FormUpload {
    /// Form identifier; doubles as the destination table name
    #[serde(rename = "formId")]
    pub form_id: String,

    /// Submission content
    #[serde(default)]
    pub data: serde_json::Value,
}

impl FormUpload {
    /// Parse an entry body as a form upload.
    pub fn parse(body: &[u8]) -> Result<Self, ArchiverError> {
        serde_json::from_slice(body).map_err(|e| ArchiverError::upload_parse(e.to_string()))
    }

    /// The submission's own instance id, if present.
    pub fn instance_id(&self) -> Option<&str> {
        self.data.get("meta/instanceID").and_then(|v| v.as_str())
    }
}
