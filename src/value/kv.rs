use std::cmp::Ordering;

use faststr::FastStr;

use super::node::Value;

/// A single object member.
///
/// Entries order by key first. The value only breaks ties, which keeps the
/// order total for containers that are sorted by entry.
#[derive(Debug, Clone, Default)]
pub struct KeyValue {
    pub(crate) key: FastStr,
    pub(crate) value: Value,
}

impl KeyValue {
    pub fn new<K: AsRef<str>, V: Into<Value>>(key: K, value: V) -> Self {
        Self {
            key: FastStr::new(key),
            value: value.into(),
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Replaces the value, returning the old one.
    pub fn set_value<V: Into<Value>>(&mut self, value: V) -> Value {
        std::mem::replace(&mut self.value, value.into())
    }

    pub fn into_parts(self) -> (FastStr, Value) {
        (self.key, self.value)
    }

    pub(crate) fn as_pair(&self) -> (&str, &Value) {
        (self.key.as_str(), &self.value)
    }
}

impl<K: AsRef<str>, V: Into<Value>> From<(K, V)> for KeyValue {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

impl PartialEq for KeyValue {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

impl Eq for KeyValue {}

impl PartialOrd for KeyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for KeyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .as_str()
            .cmp(other.key.as_str())
            .then_with(|| self.value.cmp(&other.value))
    }
}
