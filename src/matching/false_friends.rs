//! Characters that are easily confused when a callsign is copied by ear.
//!
//! Most pairs differ by a single trailing element in Morse code, which is exactly
//! what gets lost or added when a signal fades or the operator's timing is off:
//!
//! | Pair  | Morse               |
//! |-------|---------------------|
//! | B ↔ D | `-...` / `-..`      |
//! | B ↔ 6 | `-...` / `-....`    |
//! | D ↔ N | `-..` / `-.`        |
//! | H ↔ S | `....` / `...`      |
//! | H ↔ 5 | `....` / `.....`    |
//! | J ↔ 1 | `.---` / `.----`    |
//! | V ↔ 4 | `...-` / `....-`    |
//! | G ↔ Z | `--.` / `--..`      |
//!
//! A few pairs are in the table because they also look alike when written down
//! (O ↔ 0).

/// Unordered pairs of confusable characters
const FALSE_FRIENDS: &[(u8, u8)] = &[
    (b'B', b'D'),
    (b'B', b'6'),
    (b'D', b'6'),
    (b'D', b'N'),
    (b'H', b'S'),
    (b'H', b'5'),
    (b'S', b'5'),
    (b'S', b'I'),
    (b'J', b'1'),
    (b'W', b'J'),
    (b'A', b'W'),
    (b'V', b'4'),
    (b'U', b'V'),
    (b'O', b'0'),
    (b'G', b'Z'),
    (b'Z', b'7'),
    (b'M', b'O'),
];

/// Check if one character is likely to be mis-copied as the other.
///
/// The relation is symmetric and never holds for a character and itself.
#[must_use]
pub fn is_false_friend(a: u8, b: u8) -> bool {
    let (a, b) = (a.to_ascii_uppercase(), b.to_ascii_uppercase());
    FALSE_FRIENDS
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}
