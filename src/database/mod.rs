//! The callsign index and its storage.
//!
//! A [`Database`] keeps one bucket per callsign character. Each bucket is an
//! [`EntrySet`] of all entries whose fingerprint contains that character, so an entry
//! is reachable through every one of its characters and a query only needs to look at
//! the buckets of its own characters.
//!
//! ## Example
//!
//! ```rust
//! use supercheck::Database;
//!
//! let corpus = "# MASTER.SCP\nDJ8BB\nDK9BB\nDL1ABC\n";
//! let database = Database::read_scp(corpus.as_bytes()).unwrap();
//!
//! let keys = database.find_strings("dbb").unwrap();
//! assert_eq!(keys, vec!["DJ8BB", "DK9BB"]);
//! ```
//!
//! ## Concurrency
//!
//! A query runs one worker thread per distinct query character. Workers only read
//! their bucket; mutation needs `&mut Database`, so it cannot overlap with a query.
//!
//! [`Database`]: store::Database
//! [`EntrySet`]: entry_set::EntrySet

pub mod entry_set;
pub mod index;
pub mod store;
