//! Delimited submission parsing

use serde_json::{Map, Value};

use crate::error::TranscoderError;
use crate::form::FormDefinition;

/// One parsed delimited submission.
///
/// Wire format: `form_id;tag;value;tag;value;...` with an optional trailing
/// delimiter. Tags are the short per-field markers defined by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsSubmission {
    /// Form identifier (first segment)
    pub form_id: String,

    /// Tag/value pairs in wire order
    pub fields: Vec<(String, String)>,
}

impl SmsSubmission {
    /// Remap short tags to canonical field names using the form definition.
    ///
    /// Tags the form does not define are kept as-is, so a submission never
    /// loses content to a stale definition.
    pub fn remap(&self, form: &FormDefinition) -> Map<String, Value> {
        let mut data = Map::new();
        for (tag, value) in &self.fields {
            let field = form.field_for_tag(tag).unwrap_or(tag);
            data.insert(field.to_string(), Value::String(value.clone()));
        }
        data
    }
}

/// Parse a delimited text payload into a submission.
pub fn parse_submission(text: &str) -> Result<SmsSubmission, TranscoderError> {
    let mut segments: Vec<&str> = text.split(';').collect();

    // Trailing delimiter produces one empty segment; drop it
    if segments.last() == Some(&"") {
        segments.pop();
    }

    if segments.is_empty() {
        return Err(TranscoderError::submission_format("empty submission"));
    }

    let form_id = segments.remove(0);
    if form_id.is_empty() {
        return Err(TranscoderError::submission_format("missing form id"));
    }

    if segments.len() % 2 != 0 {
        return Err(TranscoderError::submission_format(format!(
            "unpaired field segments ({} after form id)",
            segments.len()
        )));
    }

    let fields = segments
        .chunks(2)
        .map(|pair| (pair[0].to_string(), pair[1].to_string()))
        .collect();

    Ok(SmsSubmission {
        form_id: form_id.to_string(),
        fields,
    })
}
