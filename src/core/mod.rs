//! Core data types for callsign matching.
//!
//! - [`Fingerprint`]: the normalized character sequence of a callsign
//! - [`Entry`]: one record of the corpus (callsign plus optional field values)
//! - [`FieldName`], [`FieldValues`], [`FieldSet`]: the columns of a call history file
//!
//! ## Fingerprints
//!
//! | Input          | Fingerprint  |
//! |----------------|--------------|
//! | `dl1abc`       | `DL1ABC`     |
//! | `EA7/DL1ABC/p` | `EA7DL1ABCP` |
//! | `n1mm / qrp`   | `N1MMQRP`    |
//!
//! Indexing and scoring work on fingerprints only; the original key is what gets
//! reported back to the caller.
//!
//! [`Fingerprint`]: fingerprint::Fingerprint
//! [`Entry`]: entry::Entry
//! [`FieldName`]: field::FieldName
//! [`FieldValues`]: field::FieldValues
//! [`FieldSet`]: field::FieldSet

pub mod entry;
pub mod field;
pub mod fingerprint;
