//! Approximate callsign matching and scoring.
//!
//! This module provides the matching functionality on top of the index:
//!
//! - [`MatchingEngine`]: Concurrent search of a [`Database`](crate::Database)
//! - [`Match`]: A scored candidate with its alignment to the query
//! - [`MatchingAssembly`]: The alignment as a sequence of annotated parts
//!
//! ## Matching Algorithm
//!
//! 1. **Candidates**: every entry that shares at least one character with the query
//! 2. **Edit distance**: weighted, asymmetric costs (insert 1, substitute 2, delete 100),
//!    so entries that extend the query are cheap and entries that lack query characters
//!    are practically excluded
//! 3. **Assembly**: the backtraced edit script is grouped into runs of matching, inserted,
//!    deleted and substituted characters
//! 4. **False friends**: a single substituted character that is easily mis-copied in
//!    Morse code (e.g. `D` and `N`) lowers the distance by one
//!
//! ## Scoring
//!
//! ```text
//! accuracy = (|query| + |entry| - distance) / (|query| + |entry|)
//! ```
//!
//! Candidates with an accuracy below the threshold (0.65 by default) are dropped. The
//! remaining matches are ranked by their longest matching run, then accuracy, distance,
//! key length and key.
//!
//! ## Example
//!
//! ```rust
//! use supercheck::Database;
//! use supercheck::matching::assembly::Operation;
//!
//! let mut database = Database::new();
//! database.add(["DL3NEY", "DK1AB"]);
//!
//! let matches = database.find("dl3dy").unwrap();
//! assert_eq!(matches[0].key(), "DL3NEY");
//! assert!(matches[0].contains_false_friend());
//! assert_eq!(matches[0].assembly.parts()[1].op, Operation::FalseFriend);
//! ```
//!
//! [`MatchingEngine`]: engine::MatchingEngine
//! [`Match`]: engine::Match
//! [`MatchingAssembly`]: assembly::MatchingAssembly

pub mod assembly;
pub mod engine;
pub mod false_friends;
pub mod scoring;
