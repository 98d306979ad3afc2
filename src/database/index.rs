use std::collections::HashSet;

use crate::core::fingerprint::Fingerprint;

use super::entry_set::EntrySet;
use super::store::Database;

/// Finds the buckets that may hold candidates for a query
pub struct CandidateFinder<'a> {
    database: &'a Database,
}

impl<'a> CandidateFinder<'a> {
    pub fn new(database: &'a Database) -> Self {
        Self { database }
    }

    /// One non-empty bucket per distinct character of the fingerprint, in order of
    /// first occurrence
    pub fn find_buckets(&self, fingerprint: &Fingerprint) -> Vec<&'a EntrySet> {
        fingerprint
            .distinct()
            .into_iter()
            .filter_map(|b| self.database.bucket(b))
            .filter(|bucket| !bucket.is_empty())
            .collect()
    }

    /// Number of distinct entries that share at least one character with the fingerprint
    pub fn count_candidates(&self, fingerprint: &Fingerprint) -> usize {
        let mut seen: HashSet<&str> = HashSet::new();
        for bucket in self.find_buckets(fingerprint) {
            seen.extend(bucket.iter().map(|entry| entry.key.as_str()));
        }
        seen.len()
    }
}
