//! Parsers that turn corpus lines into entries.
//!
//! Two line formats are supported:
//!
//! - **Super Check Partial** (`MASTER.SCP`): one callsign per line, `#` starts a comment
//! - **Call history** (N1MM Logger+): comma or semicolon separated columns, with an
//!   optional `!!Order!!` directive that defines the meaning of the columns
//!
//! ## Example
//!
//! ```rust
//! use supercheck::parsing::{call_history::CallHistoryParser, EntryParser};
//!
//! let mut parser = CallHistoryParser::new();
//! assert!(parser.parse_entry("!!Order!!,Call,Name,CK,Sect").is_none());
//!
//! let entry = parser.parse_entry("DL1ABC, Klaus ,43,B01").unwrap();
//! assert_eq!(entry.key, "DL1ABC");
//! assert_eq!(entry.get(&"Name".into()), "Klaus");
//! ```
//!
//! ## Malformed lines
//!
//! A parser never fails. Lines it cannot make sense of are reported as
//! "not a data line" and skipped by the database, so a stray or truncated line does
//! not abort loading a corpus.

use crate::core::entry::Entry;
use crate::core::field::FieldSet;

pub mod call_history;
pub mod scp;

/// Converts single corpus lines into entries.
///
/// The database hands every trimmed, non-blank line of a corpus to its parser, in
/// order. A parser may keep state between lines, e.g. a column layout defined by a
/// directive line.
pub trait EntryParser {
    /// Parse the given line.
    ///
    /// Returns `None` if the line is not a data line (comments, directives, or lines
    /// that cannot be parsed).
    fn parse_entry(&mut self, line: &str) -> Option<Entry>;

    /// The column layout that is active after the lines seen so far, if the format
    /// has one
    fn field_set(&self) -> Option<&FieldSet> {
        None
    }
}

impl<P: EntryParser + ?Sized> EntryParser for &mut P {
    fn parse_entry(&mut self, line: &str) -> Option<Entry> {
        (**self).parse_entry(line)
    }

    fn field_set(&self) -> Option<&FieldSet> {
        (**self).field_set()
    }
}
