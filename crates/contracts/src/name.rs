//! ChannelName / SubscriberId - cheap-to-clone pipeline identifiers
//!
//! Both use Arc<str> internally for O(1) clone operations.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Durable channel identifier with cheap cloning.
///
/// Internally uses `Arc<str>` so cloning only increments a reference count
/// instead of allocating new memory. Channel names are created once per
/// control message and cloned for every forwarded entry.
///
/// # Examples
/// ```
/// use contracts::{ChannelName, SubscriberId};
///
/// let incoming: ChannelName = "field-data".into();
/// let sub = SubscriberId::new("writer-01");
/// assert_eq!(incoming.derived(&sub).as_str(), "field-data-writer-01");
/// ```
#[derive(Clone, Default)]
pub struct ChannelName(Arc<str>);

impl ChannelName {
    /// Create a new ChannelName from a string slice.
    #[inline]
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the underlying string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the per-subscriber channel name: `base + "-" + subscriber_id`.
    ///
    /// Deterministic, and injective over distinct subscriber ids for a fixed
    /// base name. Both the Directory and the Provisioner rely on this.
    pub fn derived(&self, subscriber: &SubscriberId) -> ChannelName {
        ChannelName::from(format!("{}-{}", self.0, subscriber))
    }
}

impl Deref for ChannelName {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for ChannelName {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ChannelName {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChannelName {
    #[inline]
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for ChannelName {
    #[inline]
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChannelName({:?})", self.0)
    }
}

impl PartialEq for ChannelName {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        // Fast path: same Arc pointer
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for ChannelName {}

impl PartialEq<str> for ChannelName {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for ChannelName {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Hash for ChannelName {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl Serialize for ChannelName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ChannelName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}

/// Subscriber identifier: a live resource's stable instance tag, or the fixed
/// archival subscriber id.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct SubscriberId(Arc<str>);

impl SubscriberId {
    /// Create a new SubscriberId from a string slice.
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

impl From<&str> for SubscriberId {
    #[inline]
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for SubscriberId {
    #[inline]
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriberId({:?})", self.0)
    }
}

impl PartialEq<str> for SubscriberId {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for SubscriberId {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Serialize for SubscriberId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SubscriberId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_clone_is_cheap() {
        let name: ChannelName = "field-data".into();
        let clone = name.clone();

        // Both should point to same underlying data (Arc clone is O(1))
        assert_eq!(name.as_str().as_ptr(), clone.as_str().as_ptr());
    }

    #[test]
    fn test_derived_is_deterministic() {
        let base: ChannelName = "field-data".into();
        let sub = SubscriberId::new("writer-01");
        assert_eq!(base.derived(&sub), base.derived(&sub));
        assert_eq!(base.derived(&sub), "field-data-writer-01");
    }

    #[test]
    fn test_derived_is_injective() {
        let base: ChannelName = "field-data".into();
        let a = base.derived(&SubscriberId::new("instance-a"));
        let b = base.derived(&SubscriberId::new("instance-b"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_hashmap_key() {
        let mut map: HashMap<ChannelName, i32> = HashMap::new();
        map.insert("queue-a".into(), 1);
        map.insert("queue-b".into(), 2);

        // Can lookup with &str
        assert_eq!(map.get("queue-a"), Some(&1));
        assert_eq!(map.get("queue-b"), Some(&2));
    }

    #[test]
    fn test_serde() {
        let name: ChannelName = "field-data".into();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"field-data\"");

        let parsed: ChannelName = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, name);
    }
}
