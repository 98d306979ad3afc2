use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::entry::Entry;
use crate::core::fingerprint::Fingerprint;
use crate::database::entry_set::EntrySet;
use crate::database::index::CandidateFinder;
use crate::database::store::{Database, DatabaseError};
use crate::matching::assembly::MatchingAssembly;
use crate::matching::scoring::{self, EditCosts};

/// Default minimum accuracy for a candidate to be reported
pub const DEFAULT_MIN_ACCURACY: f64 = 0.65;

/// Default minimum query length; shorter queries match too much of a callsign corpus
pub const DEFAULT_MIN_QUERY_LEN: usize = 3;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the matching engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum accuracy for including a candidate in the results
    pub min_accuracy: f64,
    /// Queries with fewer characters return no results
    pub min_query_len: usize,
    /// Costs of the edit operations
    pub costs: EditCosts,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_accuracy: DEFAULT_MIN_ACCURACY,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            costs: EditCosts::default(),
        }
    }
}

impl MatchingConfig {
    /// Load the configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file cannot be read,
    /// `ConfigError::ParseError` if it is not valid JSON, or `ConfigError::Invalid`
    /// if a value is out of range.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse the configuration from JSON; missing values take their defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for invalid JSON or `ConfigError::Invalid`
    /// if a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the accuracy is outside `[0, 1]` or an edit
    /// operation is free.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.min_accuracy) {
            return Err(ConfigError::Invalid(format!(
                "min_accuracy must be between 0 and 1, got {}",
                self.min_accuracy
            )));
        }
        let EditCosts {
            insert,
            delete,
            substitute,
        } = self.costs;
        if insert == 0 || delete == 0 || substitute == 0 {
            return Err(ConfigError::Invalid(
                "edit costs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// A corpus entry that matches a query
#[derive(Debug, Clone)]
pub struct Match {
    /// The matched entry
    pub entry: Arc<Entry>,

    /// Edit distance between query and entry, one less if a false friend was found
    pub distance: u32,

    /// Share of both fingerprints not covered by the distance, in `[0, 1]`
    pub accuracy: f64,

    /// How the query aligns to the entry
    pub assembly: MatchingAssembly,
}

impl Match {
    /// Score the entry against the query fingerprint
    #[must_use]
    pub fn calculate(query: &Fingerprint, entry: Arc<Entry>, costs: &EditCosts) -> Self {
        let source = query.as_bytes();
        let target = entry.fingerprint.as_bytes();

        let matrix = scoring::cost_matrix(source, target, costs);
        let script = scoring::edit_script(&matrix, source, target, costs);
        let assembly = MatchingAssembly::from_script(source, target, &script);

        // A false friend is the cheapest explanation of a mis-copy
        let mut distance = scoring::distance(&matrix);
        if assembly.contains_false_friend() {
            distance = distance.saturating_sub(1);
        }
        let accuracy = scoring::accuracy(source.len(), target.len(), distance);

        Self {
            entry,
            distance,
            accuracy,
            assembly,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.entry.key
    }

    #[must_use]
    pub fn longest_part(&self) -> usize {
        self.assembly.longest_part()
    }

    #[must_use]
    pub fn contains_false_friend(&self) -> bool {
        self.assembly.contains_false_friend()
    }
}

/// Ranking of matches, better matches order first.
///
/// The longest run of matching characters decides first, then higher accuracy,
/// lower distance, the shorter key, and finally the key itself.
#[must_use]
pub fn compare_matches(a: &Match, b: &Match) -> Ordering {
    b.longest_part()
        .cmp(&a.longest_part())
        .then_with(|| {
            b.accuracy
                .partial_cmp(&a.accuracy)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.distance.cmp(&b.distance))
        .then_with(|| a.key().len().cmp(&b.key().len()))
        .then_with(|| a.key().cmp(b.key()))
}

/// Searches a database concurrently, one worker per distinct query character
pub struct MatchingEngine<'a> {
    database: &'a Database,
    config: &'a MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create a matching engine that uses the database's configuration
    pub fn new(database: &'a Database) -> Self {
        Self {
            database,
            config: database.config(),
        }
    }

    /// Create a matching engine with a custom configuration
    pub fn with_config(database: &'a Database, config: &'a MatchingConfig) -> Self {
        Self { database, config }
    }

    /// Find all entries that match the query, best match first.
    ///
    /// Blocks until every worker is done. Queries shorter than the configured minimum
    /// length return no matches.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Cancelled` if the token was cancelled before the search
    /// finished, or `DatabaseError::WorkerPanicked` if a worker thread panicked.
    pub fn find_matches(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Match>, DatabaseError> {
        if query.trim().chars().count() < self.config.min_query_len {
            return Ok(Vec::new());
        }

        let fingerprint = Fingerprint::extract(query);
        let buckets = CandidateFinder::new(self.database).find_buckets(&fingerprint);
        if buckets.is_empty() {
            return Ok(Vec::new());
        }
        let worker_count = buckets.len();

        let (sender, receiver) = crossbeam_channel::unbounded();
        let (workers_ok, collected) = std::thread::scope(|scope| {
            let collector = scope.spawn(move || collect_matches(&receiver));

            let workers: Vec<_> = buckets
                .into_iter()
                .map(|bucket| {
                    let sender = sender.clone();
                    let fingerprint = &fingerprint;
                    let config = self.config;
                    scope.spawn(move || search_bucket(bucket, fingerprint, config, cancel, &sender))
                })
                .collect();
            drop(sender);

            // Join every worker before the collector, its channel closes with the last sender
            let workers_ok = workers
                .into_iter()
                .map(std::thread::ScopedJoinHandle::join)
                .fold(true, |ok, outcome| ok && outcome.is_ok());
            (workers_ok, collector.join())
        });

        let matches = match collected {
            Ok(matches) if workers_ok => matches,
            _ => return Err(DatabaseError::WorkerPanicked),
        };
        if cancel.is_cancelled() {
            return Err(DatabaseError::Cancelled);
        }

        debug!(
            query,
            workers = worker_count,
            matches = matches.len(),
            "Search finished"
        );
        Ok(matches)
    }
}

/// Score every entry of the bucket and send the ones above the threshold
fn search_bucket(
    bucket: &EntrySet,
    query: &Fingerprint,
    config: &MatchingConfig,
    cancel: &CancellationToken,
    matches: &Sender<Match>,
) {
    for entry in bucket.iter() {
        if cancel.is_cancelled() {
            return;
        }
        let candidate = Match::calculate(query, Arc::clone(entry), &config.costs);
        if candidate.accuracy >= config.min_accuracy && matches.send(candidate).is_err() {
            return;
        }
    }
}

/// Drain the channel, keep the first match of every key, and rank the result
fn collect_matches(matches: &Receiver<Match>) -> Vec<Match> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut result: Vec<Match> = Vec::new();

    for candidate in matches {
        if seen.insert(candidate.entry.key.clone()) {
            result.push(candidate);
        }
    }

    result.sort_by(compare_matches);
    result
}
