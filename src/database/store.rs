use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::core::entry::Entry;
use crate::core::field::FieldSet;
use crate::matching::assembly::MatchingAssembly;
use crate::matching::engine::{Match, MatchingConfig, MatchingEngine};
use crate::parsing::call_history::CallHistoryParser;
use crate::parsing::scp::ScpParser;
use crate::parsing::EntryParser;

use super::entry_set::EntrySet;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to read corpus: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Search was cancelled")]
    Cancelled,

    #[error("Search worker panicked")]
    WorkerPanicked,
}

/// The callsign index.
///
/// Every entry is stored in one bucket per distinct character of its fingerprint, so
/// the candidates for a query are the union of the buckets of the query's characters.
#[derive(Debug, Default)]
pub struct Database {
    /// Index: fingerprint character -> entries containing that character
    items: HashMap<u8, EntrySet>,

    /// Column layout of the call history this database was read from
    field_set: Option<FieldSet>,

    config: MatchingConfig,
}

impl Database {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty database with a custom matching configuration
    pub fn with_config(config: MatchingConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Read a database from a line source, using the given parser for every line.
    ///
    /// Lines are trimmed, blank lines are skipped. Lines the parser rejects are
    /// skipped as well; only failing to read the source is an error.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ReadError` if reading from the source fails.
    pub fn read<R: BufRead, P: EntryParser>(reader: R, parser: P) -> Result<Self, DatabaseError> {
        Self::read_with_config(reader, parser, MatchingConfig::default())
    }

    /// Read a database with a custom matching configuration
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ReadError` if reading from the source fails.
    pub fn read_with_config<R: BufRead, P: EntryParser>(
        mut reader: R,
        mut parser: P,
        config: MatchingConfig,
    ) -> Result<Self, DatabaseError> {
        let mut database = Self::with_config(config);
        let mut buffer = Vec::new();
        let mut line_count = 0usize;
        let mut entry_count = 0usize;

        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            // Corpus files are ASCII, a stray byte must not abort loading
            let line = String::from_utf8_lossy(&buffer);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            line_count += 1;

            match parser.parse_entry(line) {
                Some(entry) => {
                    database.insert(Arc::new(entry));
                    entry_count += 1;
                }
                None => trace!(line, "Not a data line"),
            }
        }

        database.field_set = parser.field_set().cloned();

        debug!(
            lines = line_count,
            entries = entry_count,
            buckets = database.items.len(),
            "Database read"
        );
        Ok(database)
    }

    /// Read a database in the Super Check Partial format
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ReadError` if reading from the source fails.
    pub fn read_scp<R: BufRead>(reader: R) -> Result<Self, DatabaseError> {
        Self::read(reader, ScpParser::new())
    }

    /// Read a database from a call history file
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ReadError` if reading from the source fails.
    pub fn read_call_history<R: BufRead>(reader: R) -> Result<Self, DatabaseError> {
        Self::read(reader, CallHistoryParser::new())
    }

    /// Add the given callsigns
    pub fn add<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_entries(keys.into_iter().map(Entry::new));
    }

    /// Add the given entries, replacing entries with the same key
    pub fn add_entries<I: IntoIterator<Item = Entry>>(&mut self, entries: I) {
        for entry in entries {
            self.insert(Arc::new(entry));
        }
    }

    fn insert(&mut self, entry: Arc<Entry>) {
        if entry.fingerprint.is_empty() {
            trace!(key = %entry.key, "Entry without callsign characters, not indexed");
            return;
        }
        for b in entry.fingerprint.distinct() {
            self.items.entry(b).or_default().add(Arc::clone(&entry));
        }
    }

    /// The bucket of entries containing the given character
    #[must_use]
    pub fn bucket(&self, b: u8) -> Option<&EntrySet> {
        self.items.get(&b.to_ascii_uppercase())
    }

    /// Number of buckets, i.e. distinct characters in the corpus
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.items.len()
    }

    /// Number of distinct entries
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.items
            .values()
            .flat_map(EntrySet::iter)
            .map(|entry| entry.key.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Column layout of the call history this database was read from
    #[must_use]
    pub fn field_set(&self) -> Option<&FieldSet> {
        self.field_set.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: MatchingConfig) {
        self.config = config;
    }

    /// Find the entries that partially match the query, best match first
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::WorkerPanicked` if a search worker panicked.
    pub fn find(&self, query: &str) -> Result<Vec<Match>, DatabaseError> {
        self.find_cancellable(query, &CancellationToken::new())
    }

    /// Like [`Database::find`], but stops early when the token is cancelled
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Cancelled` if the token was cancelled before the search
    /// finished, or `DatabaseError::WorkerPanicked` if a search worker panicked.
    pub fn find_cancellable(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Match>, DatabaseError> {
        MatchingEngine::new(self).find_matches(query, cancel)
    }

    /// The keys of the matching entries, best match first
    ///
    /// # Errors
    ///
    /// See [`Database::find`].
    pub fn find_strings(&self, query: &str) -> Result<Vec<String>, DatabaseError> {
        Ok(self
            .find(query)?
            .into_iter()
            .map(|m| m.entry.key.clone())
            .collect())
    }

    /// The alignments of the query to the matching entries, best match first
    ///
    /// # Errors
    ///
    /// See [`Database::find`].
    pub fn find_annotated(&self, query: &str) -> Result<Vec<MatchingAssembly>, DatabaseError> {
        Ok(self.find(query)?.into_iter().map(|m| m.assembly).collect())
    }

    /// The matching entries, best match first
    ///
    /// # Errors
    ///
    /// See [`Database::find`].
    pub fn find_entries(&self, query: &str) -> Result<Vec<Arc<Entry>>, DatabaseError> {
        Ok(self.find(query)?.into_iter().map(|m| m.entry).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SCP: &str = "# This is a comment
    2E0AOZ
    2E0BNI
    2E0BPP
    N1MM";

    fn bucket_len(database: &Database, b: u8) -> usize {
        database.bucket(b).map_or(0, EntrySet::len)
    }

    #[test]
    fn test_read_scp() {
        let database = Database::read_scp(TEST_SCP.as_bytes()).unwrap();

        let expected = [
            (b'0', 3),
            (b'1', 1),
            (b'2', 3),
            (b'A', 1),
            (b'B', 2),
            (b'E', 3),
            (b'I', 1),
            (b'N', 2),
            (b'M', 1),
            (b'O', 1),
            (b'P', 1),
            (b'Z', 1),
        ];
        assert_eq!(database.bucket_count(), expected.len());
        for (b, len) in expected {
            assert_eq!(
                bucket_len(&database, b),
                len,
                "bucket {:?}",
                char::from(b)
            );
        }
        assert_eq!(database.entry_count(), 4);
        assert!(database.field_set().is_none());
    }

    #[test]
    fn test_read_skips_invalid_utf8() {
        let source: &[u8] = b"DL1ABC\n\xff\xfe\nDK1AB\n";
        let database = Database::read_scp(source).unwrap();
        assert_eq!(database.entry_count(), 2);
    }

    #[test]
    fn test_read_call_history_keeps_field_set() {
        let source = "!!Order!!,Call,Name,Exch1\nDL3NEY,Florian,B36\n";
        let database = Database::read_call_history(source.as_bytes()).unwrap();

        assert_eq!(
            database.field_set(),
            Some(&FieldSet::new(["Call", "Name", "Exch1"]))
        );
        let entry = database.bucket(b'N').unwrap().get("DL3NEY").unwrap();
        assert_eq!(entry.get(&"Exch1".into()), "B36");
    }

    #[test]
    fn test_read_failure_is_reported() {
        struct FailingReader;

        impl std::io::Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("connection reset"))
            }
        }

        let result = Database::read_scp(std::io::BufReader::new(FailingReader));
        assert!(matches!(result, Err(DatabaseError::ReadError(_))));
    }

    #[test]
    fn test_re_adding_keeps_bucket_sizes() {
        let mut database = Database::new();
        database.add(["DL1ABC", "DK1AB"]);
        let sizes: Vec<_> = b"DL1ABCK".iter().map(|&b| bucket_len(&database, b)).collect();

        database.add(["DL1ABC", "dk1ab", " DL1ABC "]);
        let again: Vec<_> = b"DL1ABCK".iter().map(|&b| bucket_len(&database, b)).collect();

        assert_eq!(sizes, again);
        assert_eq!(database.entry_count(), 2);
    }

    #[test]
    fn test_entry_is_in_every_bucket_of_its_characters() {
        let mut database = Database::new();
        database.add(["DL1ABC"]);

        for b in b"DL1ABC" {
            assert!(database.bucket(*b).unwrap().contains("DL1ABC"));
        }
        assert!(database.bucket(b'X').is_none());
        assert_eq!(database.bucket_count(), 6);
    }

    #[test]
    fn test_entry_without_callsign_characters_is_not_indexed() {
        let mut database = Database::new();
        database.add(["---"]);
        assert!(database.is_empty());
    }

    #[test]
    fn test_short_query_returns_nothing() {
        let mut database = Database::new();
        database.add(["DL1ABC"]);

        for query in ["", "D", "DL", "  DL  "] {
            assert!(database.find(query).unwrap().is_empty(), "{query:?}");
        }
    }

    #[test]
    fn test_cancelled_search() {
        let mut database = Database::new();
        database.add(["DL1ABC", "DL2ABC"]);

        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(matches!(
            database.find_cancellable("DL1ABC", &cancel),
            Err(DatabaseError::Cancelled)
        ));
        // a short query never starts a search
        assert!(database.find_cancellable("DL", &cancel).unwrap().is_empty());
    }
}
