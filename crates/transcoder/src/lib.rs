//! # Transcoder
//!
//! Turns delimited text submissions into structured records and forwards them
//! to the downstream form-processing endpoint. Multi-part payloads are
//! reassembled in order before transcoding; field tags are remapped to
//! canonical field names using the form definition served by the endpoint.
//!
//! Independent HTTP-triggered component; not fed by the distributor.

mod assembler;
mod error;
mod form;
mod gateway;
mod submission;
mod transcoder;

pub use assembler::{Fragment, FragmentAssembler};
pub use error::TranscoderError;
pub use form::FormDefinition;
pub use gateway::{FormGateway, HttpFormGateway};
pub use submission::{parse_submission, SmsSubmission};
pub use transcoder::{InboundSms, TranscodeOutcome, Transcoder};
