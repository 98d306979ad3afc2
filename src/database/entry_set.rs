use std::collections::HashMap;
use std::sync::Arc;

use crate::core::entry::Entry;

/// A set of entries, keyed by their normalized callsign.
///
/// Adding an entry with a key that is already present replaces the stored entry.
#[derive(Debug, Clone, Default)]
pub struct EntrySet {
    entries: HashMap<String, Arc<Entry>>,
}

impl EntrySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, returns `true` if its key was not in the set before
    pub fn add(&mut self, entry: Arc<Entry>) -> bool {
        self.entries.insert(entry.key.clone(), entry).is_none()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arc<Entry>> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Entry>> {
        self.entries.values()
    }

    /// All entries, sorted by key
    #[must_use]
    pub fn entries(&self) -> Vec<Arc<Entry>> {
        self.filter(|_| true)
    }

    /// The entries that satisfy the predicate, sorted by key
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Vec<Arc<Entry>>
    where
        F: FnMut(&Entry) -> bool,
    {
        let mut result: Vec<Arc<Entry>> = self
            .entries
            .values()
            .filter(|entry| predicate(entry))
            .cloned()
            .collect();
        result.sort_by(|a, b| a.key.cmp(&b.key));
        result
    }
}

impl FromIterator<Arc<Entry>> for EntrySet {
    fn from_iter<I: IntoIterator<Item = Arc<Entry>>>(iter: I) -> Self {
        let mut set = Self::new();
        for entry in iter {
            set.add(entry);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str) -> Arc<Entry> {
        Arc::new(Entry::new(key))
    }

    #[test]
    fn test_add_deduplicates_by_key() {
        let mut set = EntrySet::new();
        assert!(set.entries().is_empty(), "should be empty after creation");

        assert!(set.add(entry("one")));
        assert_eq!(set.len(), 1);

        assert!(!set.add(entry("ONE ")));
        assert_eq!(set.len(), 1);

        set.add(entry("two"));
        set.add(entry("abc"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_entries_are_sorted() {
        let set: EntrySet = ["two", "one", "abc"].into_iter().map(entry).collect();
        let keys: Vec<_> = set.entries().iter().map(|e| e.key.clone()).collect();
        assert_eq!(keys, vec!["ABC", "ONE", "TWO"]);
    }

    #[test]
    fn test_filter() {
        let set: EntrySet = ["one", "two", "abc"].into_iter().map(entry).collect();

        let entries = set.filter(|e| e.key == "ABC");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "ABC");

        assert!(set.filter(|e| e.key.starts_with('X')).is_empty());
    }

    #[test]
    fn test_re_add_replaces_entry() {
        let mut set = EntrySet::new();
        set.add(entry("dl1abc"));

        let fields = [("Name", "Klaus")].into_iter().collect();
        set.add(Arc::new(Entry::with_fields("DL1ABC", fields)));

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("DL1ABC").unwrap().get(&"Name".into()), "Klaus");
        assert!(set.contains("DL1ABC"));
    }
}
