use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Name of a column in a call history file
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldName(String);

impl FieldName {
    /// The column that holds the callsign
    pub const CALL: &'static str = "Call";
    /// The operator's name
    pub const NAME: &'static str = "Name";
    /// Free text
    pub const USER_TEXT: &'static str = "UserText";

    /// Create a field name, surrounding whitespace is removed
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_string())
    }

    pub fn call() -> Self {
        Self::new(Self::CALL)
    }

    /// The empty name marks a column that is ignored
    pub fn ignored() -> Self {
        Self(String::new())
    }

    #[must_use]
    pub fn is_call(&self) -> bool {
        self.0 == Self::CALL
    }

    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Field values of a single entry.
///
/// Missing fields read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(HashMap<FieldName, String>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: FieldName, value: impl Into<String>) {
        self.0.insert(name, value.into());
    }

    /// Get the value of the given field, or `""` if the field is not set
    #[must_use]
    pub fn get(&self, name: &FieldName) -> &str {
        self.0.get(name).map_or("", String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &FieldName) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &str)> {
        self.0.iter().map(|(name, value)| (name, value.as_str()))
    }
}

impl<N: Into<FieldName>, V: Into<String>> FromIterator<(N, V)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

/// Column layout of a call history file.
///
/// The position of a name in the set is the column index of that field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet(Vec<FieldName>);

/// Columns used when a call history file has no `!!Order!!` directive
pub const DEFAULT_FIELD_NAMES: [&str; 12] = [
    "Call",
    "Name",
    "Loc1",
    "Loc2",
    "Sect",
    "State",
    "CK",
    "BirthDate",
    "Exch1",
    "Misc",
    "UserText",
    "LastUpdateNote",
];

impl FieldSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(names.into_iter().map(FieldName::new).collect())
    }

    /// Column index of the given field, if it is part of this set
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.0.iter().position(|n| n.as_str() == name)
    }

    #[must_use]
    pub fn call_index(&self) -> Option<usize> {
        self.index_of(FieldName::CALL)
    }

    /// Field name of the given column; columns beyond the set are ignored
    #[must_use]
    pub fn get(&self, index: usize) -> FieldName {
        self.0.get(index).cloned().unwrap_or_else(FieldName::ignored)
    }

    /// All names except `Call` and ignored columns
    #[must_use]
    pub fn usable_names(&self) -> Vec<FieldName> {
        self.0
            .iter()
            .filter(|n| !n.is_call() && !n.is_ignored())
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldName> {
        self.0.iter()
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD_NAMES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_name_is_trimmed() {
        assert_eq!(FieldName::new("  Name "), FieldName::new("Name"));
        assert!(FieldName::new(" Call").is_call());
        assert!(FieldName::new("   ").is_ignored());
    }

    #[test]
    fn test_missing_value_is_empty() {
        let mut values = FieldValues::new();
        values.insert(FieldName::new("Name"), "Klaus");

        assert_eq!(values.get(&FieldName::new("Name")), "Klaus");
        assert_eq!(values.get(&FieldName::new("CK")), "");
        assert!(!values.contains(&FieldName::new("CK")));
    }

    #[test]
    fn test_default_field_set() {
        let set = FieldSet::default();
        assert_eq!(set.len(), 12);
        assert_eq!(set.call_index(), Some(0));
        assert_eq!(set.index_of("UserText"), Some(10));
        assert_eq!(set.index_of(" Sect "), Some(4));
        assert_eq!(set.index_of("Exch2"), None);
    }

    #[test]
    fn test_get_out_of_range_is_ignored() {
        let set = FieldSet::new(["Call", "Name"]);
        assert_eq!(set.get(1), FieldName::new("Name"));
        assert!(set.get(2).is_ignored());
        assert!(set.get(100).is_ignored());
    }

    #[test]
    fn test_usable_names() {
        let set = FieldSet::new(["Name", "", "Call", "CK"]);
        assert_eq!(set.call_index(), Some(2));
        assert_eq!(
            set.usable_names(),
            vec![FieldName::new("Name"), FieldName::new("CK")]
        );
    }

    #[test]
    fn test_no_call_column() {
        let set = FieldSet::new(["Name", "Exch1"]);
        assert_eq!(set.call_index(), None);
    }
}
