//! Lexicographic prefix ranges.

/// Sentinel code point appended to a prefix to form the inclusive upper bound.
///
/// `U+F8FF` sits at the top of the BMP private-use area, so every string that
/// starts with the prefix (and uses ordinary characters afterwards) sorts at
/// or below `prefix + U+F8FF`.
pub const PREFIX_SENTINEL: char = '\u{f8ff}';

/// An inclusive `[start, end]` range that selects strings beginning with a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixRange {
    /// Lower bound, the prefix itself.
    pub start: String,
    /// Upper bound, the prefix followed by [`PREFIX_SENTINEL`].
    pub end: String,
}

impl PrefixRange {
    /// Build the range for `prefix`.
    pub fn new(prefix: &str) -> Self {
        let mut end = String::with_capacity(prefix.len() + PREFIX_SENTINEL.len_utf8());
        end.push_str(prefix);
        end.push(PREFIX_SENTINEL);
        Self {
            start: prefix.to_string(),
            end,
        }
    }

    /// Whether `value` falls inside the range, comparing by code point.
    pub fn contains(&self, value: &str) -> bool {
        value >= self.start.as_str() && value <= self.end.as_str()
    }
}
