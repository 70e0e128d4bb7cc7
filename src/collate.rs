//! Locale collation for ranking tie-breaks.

use std::cmp::Ordering;

/// String comparison under a display locale. The ranker takes this as a
/// seam so tie-break ordering stays testable with other collations.
pub trait Collation {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Collation for the Korean display locale.
///
/// Modern Hangul syllables occupy U+AC00..U+D7A3 in dictionary order, so
/// scalar-value comparison yields 가 < 나 < 다 as expected.
#[derive(Debug, Clone, Copy, Default)]
pub struct KoreanCollation;

impl Collation for KoreanCollation {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.chars().cmp(b.chars())
    }
}
