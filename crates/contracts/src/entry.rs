//! Entry - one delivery attempt read from a channel

use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

use crate::ChannelName;

/// Receipt token for one delivery attempt.
///
/// Identifies the attempt, not the payload: the same entry redelivered after a
/// visibility timeout carries a fresh token. Deleting by a stale token is a
/// provider-side no-op.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ReceiptToken(Arc<str>);

impl ReceiptToken {
    /// Create a new ReceiptToken from a string slice.
    #[inline]
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the underlying string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ReceiptToken {
    #[inline]
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for ReceiptToken {
    #[inline]
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl fmt::Display for ReceiptToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ReceiptToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReceiptToken({:?})", self.0)
    }
}

/// One data entry as read from the incoming channel.
///
/// Immutable once read. The body is forwarded verbatim to every subscriber;
/// the receipt token is only valid against the originating channel.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Provider-assigned message id (diagnostics only)
    pub message_id: String,

    /// Receipt token for this delivery attempt
    pub receipt: ReceiptToken,

    /// Opaque payload, forwarded verbatim
    pub body: Bytes,

    /// Channel the entry was read from
    pub channel: ChannelName,
}

impl Entry {
    /// Body as UTF-8, lossy. For logging only.
    pub fn body_preview(&self, max_len: usize) -> String {
        let text = String::from_utf8_lossy(&self.body);
        if text.chars().count() > max_len {
            let truncated: String = text.chars().take(max_len).collect();
            format!("{truncated}...")
        } else {
            text.into_owned()
        }
    }
}
