//! Multipart fragment reassembly

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::TranscoderError;

/// One fragment of a multi-part payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Reference shared by all fragments of one payload
    pub reference: String,

    /// 1-based position within the payload
    pub part: u32,

    /// Total number of fragments
    pub total: u32,

    /// Fragment text
    pub text: String,
}

/// Reassembles ordered fragment sequences.
///
/// Fragments may arrive out of order; the concatenated text is yielded
/// exactly once, when the last missing part arrives, and the reference is
/// forgotten afterwards. A repeated part overwrites its predecessor.
#[derive(Debug, Default)]
pub struct FragmentAssembler {
    pending: HashMap<String, BTreeMap<u32, String>>,
}

impl FragmentAssembler {
    /// Create an empty assembler
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one fragment; returns the full text once all parts are present.
    pub fn push(&mut self, fragment: Fragment) -> Result<Option<String>, TranscoderError> {
        if fragment.total == 0 || fragment.part == 0 || fragment.part > fragment.total {
            return Err(TranscoderError::payload_parse(format!(
                "fragment {}/{} out of range",
                fragment.part, fragment.total
            )));
        }

        let parts = self.pending.entry(fragment.reference.clone()).or_default();
        parts.insert(fragment.part, fragment.text);

        if parts.len() < fragment.total as usize {
            debug!(
                reference = %fragment.reference,
                have = parts.len(),
                total = fragment.total,
                "Fragment buffered"
            );
            return Ok(None);
        }

        let parts = self
            .pending
            .remove(&fragment.reference)
            .unwrap_or_default();
        Ok(Some(parts.into_values().collect::<Vec<_>>().concat()))
    }

    /// Number of payloads still waiting for fragments
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
