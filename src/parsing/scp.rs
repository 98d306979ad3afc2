//! Parser for the Super Check Partial format.
//!
//! The file is plain ASCII text with one callsign per line. Lines that begin with `#`
//! are comments.

use crate::core::entry::Entry;
use crate::parsing::EntryParser;

/// Parser for `MASTER.SCP` files
#[derive(Debug, Clone, Copy, Default)]
pub struct ScpParser;

impl ScpParser {
    pub fn new() -> Self {
        Self
    }
}

impl EntryParser for ScpParser {
    fn parse_entry(&mut self, line: &str) -> Option<Entry> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        Some(Entry::new(line))
    }
}
