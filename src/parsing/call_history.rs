//! Parser for N1MM Logger+ call history files.
//!
//! A call history line holds the callsign and additional information about the
//! station, separated by `,` or `;`:
//!
//! ```text
//! # comments start with a hash
//! !!Order!!,Call,Name,CK,Sect
//! DL1ABC,Klaus,43,B01
//! ```
//!
//! The `!!Order!!` directive names the columns of all following lines. Without it the
//! default layout of twelve columns applies (see [`DEFAULT_FIELD_NAMES`]). Other
//! `!!` directives are ignored.
//!
//! [`DEFAULT_FIELD_NAMES`]: crate::core::field::DEFAULT_FIELD_NAMES

use tracing::trace;

use crate::core::entry::Entry;
use crate::core::field::{FieldSet, FieldValues};
use crate::parsing::EntryParser;

/// Prefix of the directive that defines the column layout
pub const ORDER_DIRECTIVE: &str = "!!Order!!,";

/// Prefix of all directives
pub const DIRECTIVE_PREFIX: &str = "!!";

/// Parser for call history files, carrying the active column layout
#[derive(Debug, Clone, Default)]
pub struct CallHistoryParser {
    field_set: FieldSet,
}

impl CallHistoryParser {
    /// Create a parser that starts with the default column layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser that starts with the given column layout
    pub fn with_field_set(field_set: FieldSet) -> Self {
        Self { field_set }
    }

    fn handle_order_directive(&mut self, names: &str) {
        self.field_set = FieldSet::new(split_columns(names));
        trace!(columns = self.field_set.len(), "Column layout redefined");
    }

    fn parse_data_line(&self, line: &str) -> Option<Entry> {
        let values = split_columns(line);

        let Some(call_index) = self.field_set.call_index() else {
            trace!(line, "Column layout has no Call column, skipping line");
            return None;
        };
        let Some(key) = values.get(call_index).map(|v| v.trim()) else {
            trace!(line, "Line has no Call column, skipping");
            return None;
        };
        if key.is_empty() {
            trace!(line, "Empty callsign, skipping line");
            return None;
        }

        let mut fields = FieldValues::new();
        for (i, value) in values.iter().enumerate() {
            let name = self.field_set.get(i);
            if name.is_call() || name.is_ignored() {
                continue;
            }
            fields.insert(name, value.trim());
        }

        Some(Entry::with_fields(key, fields))
    }
}

impl EntryParser for CallHistoryParser {
    fn parse_entry(&mut self, line: &str) -> Option<Entry> {
        if line.starts_with('#') {
            None
        } else if let Some(names) = line.strip_prefix(ORDER_DIRECTIVE) {
            self.handle_order_directive(names);
            None
        } else if line.starts_with(DIRECTIVE_PREFIX) {
            trace!(line, "Ignoring unknown directive");
            None
        } else {
            self.parse_data_line(line)
        }
    }

    fn field_set(&self) -> Option<&FieldSet> {
        Some(&self.field_set)
    }
}

/// Split a line into columns, preferring `;` over `,` as separator
fn split_columns(line: &str) -> Vec<&str> {
    let columns: Vec<&str> = line.split(';').collect();
    if columns.len() > 1 {
        columns
    } else {
        line.split(',').collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldName;

    fn field(name: &str) -> FieldName {
        FieldName::new(name)
    }

    #[test]
    fn test_parse_comment() {
        let mut parser = CallHistoryParser::new();
        assert!(parser.parse_entry("# a single comment").is_none());
    }

    #[test]
    fn test_parse_with_default_field_set() {
        let mut parser = CallHistoryParser::new();
        let entry = parser
            .parse_entry("Call,Name,Loc1,Loc2,Sect,State,CK,BirthDate,Exch1,Misc,UserText,LastUpdateNote")
            .unwrap();

        assert_eq!(entry.key, "CALL");
        assert_eq!(entry.fields.len(), 11);
        assert_eq!(entry.get(&field("Name")), "Name");
        assert_eq!(entry.get(&field("Exch1")), "Exch1");
        assert_eq!(entry.get(&field("LastUpdateNote")), "LastUpdateNote");
        assert!(!entry.fields.contains(&field("Call")));
    }

    #[test]
    fn test_order_directive_redefines_fields() {
        let mut parser = CallHistoryParser::new();
        assert!(parser.parse_entry("!!Order!!,Call,Name,CK,Sect").is_none());

        let entry = parser.parse_entry("DL1ABC, Klaus ,43,B01").unwrap();
        assert_eq!(entry.key, "DL1ABC");

        let expected: FieldValues = [("Name", "Klaus"), ("CK", "43"), ("Sect", "B01")]
            .into_iter()
            .collect();
        assert_eq!(entry.fields, expected);
        assert_eq!(
            parser.field_set(),
            Some(&FieldSet::new(["Call", "Name", "CK", "Sect"]))
        );
    }

    #[test]
    fn test_order_directive_with_semicolons() {
        let mut parser = CallHistoryParser::new();
        assert!(parser.parse_entry("!!Order!!,Name;Call;Exch1").is_none());

        let entry = parser.parse_entry("Hans;dk1ab;R09").unwrap();
        assert_eq!(entry.key, "DK1AB");
        assert_eq!(entry.get(&field("Name")), "Hans");
        assert_eq!(entry.get(&field("Exch1")), "R09");
    }

    #[test]
    fn test_extra_and_unnamed_columns_are_ignored() {
        let mut parser = CallHistoryParser::new();
        parser.parse_entry("!!Order!!,Call,,Exch1");

        let entry = parser.parse_entry("DL3NEY,skip me,B36,overflow").unwrap();
        assert_eq!(entry.key, "DL3NEY");
        assert_eq!(entry.fields.len(), 1);
        assert_eq!(entry.get(&field("Exch1")), "B36");
    }

    #[test]
    fn test_unknown_directive_is_ignored() {
        let mut parser = CallHistoryParser::new();
        assert!(parser.parse_entry("!!Version!!,1.2").is_none());
        assert_eq!(parser.field_set(), Some(&FieldSet::default()));
    }

    #[test]
    fn test_call_column_out_of_range() {
        let mut parser = CallHistoryParser::new();
        parser.parse_entry("!!Order!!,Name,Exch1,Call");

        assert!(parser.parse_entry("Klaus,B01").is_none());
        assert!(parser.parse_entry("Klaus,B01,DL1ABC").is_some());
    }

    #[test]
    fn test_layout_without_call_column() {
        let mut parser = CallHistoryParser::new();
        parser.parse_entry("!!Order!!,Name,Exch1");
        assert!(parser.parse_entry("Klaus,B01").is_none());
    }

    #[test]
    fn test_empty_callsign_is_skipped() {
        let mut parser = CallHistoryParser::new();
        assert!(parser.parse_entry(" ,Klaus").is_none());
    }

    #[test]
    fn test_split_columns() {
        assert_eq!(split_columns("a;b,c;d"), vec!["a", "b,c", "d"]);
        assert_eq!(split_columns("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_columns("abc"), vec!["abc"]);
    }
}
