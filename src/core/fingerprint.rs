use std::collections::HashSet;

/// The normalized character sequence of a callsign.
///
/// Only ASCII letters and digits survive extraction, letters are uppercased and the
/// original order is kept. The fingerprint is both the indexing key of the database
/// and the input of the edit distance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(Vec<u8>);

impl Fingerprint {
    /// Extract the fingerprint of the given string.
    ///
    /// `"EA7/dl1abc/p"` becomes `EA7DL1ABCP`.
    #[must_use]
    pub fn extract(s: &str) -> Self {
        Self(
            s.bytes()
                .map(|b| b.to_ascii_uppercase())
                .filter(|&b| is_callsign_char(b))
                .collect(),
        )
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The distinct characters of this fingerprint, in order of first occurrence
    #[must_use]
    pub fn distinct(&self) -> Vec<u8> {
        let mut seen = HashSet::with_capacity(self.0.len());
        self.0.iter().copied().filter(|&b| seen.insert(b)).collect()
    }
}

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Self::extract(s)
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Extraction only keeps ASCII, so every byte is a char
        for &b in &self.0 {
            write!(f, "{}", char::from(b))?;
        }
        Ok(())
    }
}

/// Check if the byte is a character that may appear in a fingerprint (`A-Z`, `0-9`)
#[must_use]
pub fn is_callsign_char(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit()
}
