use serde::Serialize;

use crate::core::field::{FieldName, FieldValues};
use crate::core::fingerprint::Fingerprint;

/// A single record of the callsign corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// The callsign, trimmed and uppercased
    pub key: String,

    /// Fingerprint derived from the key
    #[serde(skip)]
    pub fingerprint: Fingerprint,

    /// Additional values from a call history file
    #[serde(skip_serializing_if = "FieldValues::is_empty")]
    pub fields: FieldValues,
}

impl Entry {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self::with_fields(key, FieldValues::new())
    }

    pub fn with_fields(key: impl AsRef<str>, fields: FieldValues) -> Self {
        let key = key.as_ref().trim().to_uppercase();
        let fingerprint = Fingerprint::extract(&key);
        Self {
            key,
            fingerprint,
            fields,
        }
    }

    /// Value of the given field, `""` if the entry has no such field
    #[must_use]
    pub fn get(&self, name: &FieldName) -> &str {
        self.fields.get(name)
    }

    /// Values of the given fields, in the order of the names
    #[must_use]
    pub fn values(&self, names: &[FieldName]) -> Vec<&str> {
        names.iter().map(|name| self.get(name)).collect()
    }
}
