//! Letter-presence masks.

use std::fmt;
use std::ops::BitOr;

use super::station::Station;

/// The set of letters `a`..=`z` occurring in a string, one bit per letter.
///
/// Bit `i` is set iff the `i`th letter of the alphabet appears in the
/// source string, case-insensitively. Anything that is not an ASCII letter
/// after lowercasing is ignored.
///
/// # Examples
///
/// ```
/// use tube_journeys::graph::LetterMask;
///
/// let bank = LetterMask::of("Bank");
/// assert_eq!(bank, LetterMask::of("knab"));
/// assert!(bank.intersects(LetterMask::of("K")));
/// assert!(!bank.intersects(LetterMask::of("Oxford Circus")));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LetterMask(u32);

impl LetterMask {
    /// The empty set.
    pub const EMPTY: LetterMask = LetterMask(0);

    /// Compute the mask of a string.
    pub fn of(s: &str) -> Self {
        let bits = s
            .to_lowercase()
            .chars()
            .filter(char::is_ascii_lowercase)
            .fold(0u32, |bits, c| bits | 1 << (c as u32 - 'a' as u32));
        LetterMask(bits)
    }

    /// The raw bits; bit 0 is `a`.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Whether the two sets share any letter.
    pub fn intersects(self, other: LetterMask) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether `letter` (case-insensitive) is in the set.
    pub fn contains(self, letter: char) -> bool {
        self.intersects(LetterMask::of(letter.encode_utf8(&mut [0; 4])))
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The letters in the set, alphabetically.
    pub fn letters(self) -> String {
        ('a'..='z')
            .enumerate()
            .filter(|(i, _)| self.0 & (1 << i) != 0)
            .map(|(_, c)| c)
            .collect()
    }
}

impl BitOr for LetterMask {
    type Output = LetterMask;

    fn bitor(self, rhs: LetterMask) -> LetterMask {
        LetterMask(self.0 | rhs.0)
    }
}

impl fmt::Debug for LetterMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LetterMask({:#09x} {:?})", self.0, self.letters())
    }
}

impl fmt::Display for LetterMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters())
    }
}

/// True iff the station's name uses none of the `banned` letters.
pub fn passes(banned: LetterMask, station: &Station) -> bool {
    !banned.intersects(station.letters())
}
