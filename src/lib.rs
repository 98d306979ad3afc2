//! # supercheck
//!
//! A library for finding callsigns that partially match a noisy copy.
//!
//! In amateur radio contests, callsigns are often copied incompletely or with errors,
//! especially in Morse code. Super Check Partial looks up such a partial copy in a corpus
//! of known active callsigns (`MASTER.SCP`) and suggests the most likely candidates.
//!
//! `supercheck` indexes the corpus by character and scores every candidate with an
//! asymmetric edit distance, so callsigns that extend the copy rank high, while callsigns
//! that lack characters of the copy are dropped.
//!
//! ## Features
//!
//! - **Partial matching**: Finds callsigns containing the copied characters in order
//! - **False friends**: Knows which characters are easily confused in Morse code
//! - **Annotated results**: Shows how the copy aligns to every suggested callsign
//! - **Call histories**: Reads N1MM call history files with additional fields
//! - **Local copy**: Keeps `MASTER.SCP` up to date in `~/.config/hamradio`
//!
//! ## Example
//!
//! ```rust
//! use supercheck::Database;
//!
//! // Load a corpus in the Super Check Partial format
//! let corpus = "# MASTER.SCP\nDL1ABC\nDL2ABC\nDK1AB\n";
//! let database = Database::read_scp(corpus.as_bytes()).unwrap();
//!
//! // Find matching callsigns, best match first
//! let matches = database.find("d1ab").unwrap();
//!
//! for m in &matches {
//!     println!("{}: {:.1}% ({})", m.key(), m.accuracy * 100.0, m.assembly);
//! }
//! assert_eq!(matches[0].key(), "DK1AB");
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for fingerprints, fields and entries
//! - [`parsing`]: Parsers for Super Check Partial and call history files
//! - [`database`]: The callsign index
//! - [`matching`]: Matching engine and scoring algorithms
//! - [`loader`]: Local and remote corpus files
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod database;
pub mod loader;
pub mod matching;
pub mod parsing;

// Re-export commonly used types for convenience
pub use crate::core::entry::Entry;
pub use crate::core::field::{FieldName, FieldSet, FieldValues};
pub use crate::core::fingerprint::Fingerprint;
pub use database::store::{Database, DatabaseError};
pub use matching::assembly::{MatchingAssembly, Operation, Part};
pub use matching::engine::{Match, MatchingConfig, MatchingEngine};
