//! Submission transcoder - inbound SMS to structured form submission

use serde::Deserialize;
use tracing::{debug, info, instrument};

use observability::record_submission_transcoded;

use crate::assembler::{Fragment, FragmentAssembler};
use crate::error::TranscoderError;
use crate::form::FormDefinition;
use crate::gateway::FormGateway;
use crate::submission::parse_submission;

/// One inbound SMS payload as delivered by the messaging gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundSms {
    /// Sender number
    #[serde(default)]
    pub msisdn: Option<String>,

    /// Receiving number
    #[serde(default)]
    pub to: Option<String>,

    /// Gateway message id
    #[serde(rename = "messageId", default)]
    pub message_id: Option<String>,

    /// Submission text
    pub text: String,

    /// Routing keyword
    #[serde(default)]
    pub keyword: Option<String>,

    /// Gateway timestamp
    #[serde(rename = "message-timestamp", default)]
    pub timestamp: Option<String>,

    /// "true" when this message is one fragment of a longer payload
    #[serde(default)]
    pub concat: Option<String>,

    /// Reference shared by all fragments of one payload
    #[serde(rename = "concat-ref", default)]
    pub concat_ref: Option<String>,

    /// Total fragment count (gateway sends it as a string)
    #[serde(rename = "concat-total", default)]
    pub concat_total: Option<String>,

    /// This fragment's 1-based position
    #[serde(rename = "concat-part", default)]
    pub concat_part: Option<String>,
}

impl InboundSms {
    /// Parse a gateway payload.
    ///
    /// Some gateways deliver pseudo-JSON with single quotes; those payloads
    /// are normalized before the parse is retried.
    pub fn parse(body: &str) -> Result<Self, TranscoderError> {
        serde_json::from_str(body)
            .or_else(|_| serde_json::from_str(&body.replace('\'', "\"")))
            .map_err(|e| TranscoderError::payload_parse(e.to_string()))
    }

    /// The multipart fragment carried by this message, if any.
    fn fragment(&self) -> Result<Option<Fragment>, TranscoderError> {
        if self.concat.as_deref() != Some("true") {
            return Ok(None);
        }

        let reference = self
            .concat_ref
            .clone()
            .ok_or_else(|| TranscoderError::payload_parse("multipart message without concat-ref"))?;
        let part = parse_counter(self.concat_part.as_deref(), "concat-part")?;
        let total = parse_counter(self.concat_total.as_deref(), "concat-total")?;

        Ok(Some(Fragment {
            reference,
            part,
            total,
            text: self.text.clone(),
        }))
    }
}

fn parse_counter(value: Option<&str>, field: &str) -> Result<u32, TranscoderError> {
    value
        .ok_or_else(|| TranscoderError::payload_parse(format!("multipart message without {field}")))?
        .parse()
        .map_err(|_| TranscoderError::payload_parse(format!("non-numeric {field}")))
}

/// Result of one fully transcoded submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeOutcome {
    /// Form the submission belongs to
    pub form_id: String,

    /// Fields forwarded after remapping
    pub field_count: usize,
}

/// The submission transcoder.
///
/// Stateful only for multipart reassembly; everything else is a pure
/// transform plus two gateway calls.
pub struct Transcoder<G> {
    gateway: G,
    assembler: FragmentAssembler,
}

impl<G: FormGateway + Sync> Transcoder<G> {
    /// Create a transcoder over the given gateway.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            assembler: FragmentAssembler::new(),
        }
    }

    /// Parse and process one raw gateway payload.
    pub async fn process_raw(
        &mut self,
        body: &str,
    ) -> Result<Option<TranscodeOutcome>, TranscoderError> {
        let sms = InboundSms::parse(body)?;
        self.process(&sms).await
    }

    /// Process one inbound message.
    ///
    /// Returns `None` while a multipart payload is still incomplete;
    /// otherwise transcodes and forwards the submission.
    #[instrument(name = "transcoder_process", skip(self, sms), fields(message_id = ?sms.message_id))]
    pub async fn process(
        &mut self,
        sms: &InboundSms,
    ) -> Result<Option<TranscodeOutcome>, TranscoderError> {
        let text = match sms.fragment()? {
            Some(fragment) => match self.assembler.push(fragment)? {
                Some(text) => text,
                None => {
                    debug!("Multipart payload incomplete, waiting for fragments");
                    return Ok(None);
                }
            },
            None => sms.text.clone(),
        };

        let submission = parse_submission(&text)?;
        let xml = self.gateway.fetch_form_xml(&submission.form_id).await?;
        let form = FormDefinition::parse(&submission.form_id, &xml)?;
        let data = submission.remap(&form);
        let field_count = data.len();

        self.gateway.submit(&submission.form_id, &data).await?;
        record_submission_transcoded(&submission.form_id);
        info!(form_id = %submission.form_id, field_count, "Submission forwarded");

        Ok(Some(TranscodeOutcome {
            form_id: submission.form_id,
            field_count,
        }))
    }
}
