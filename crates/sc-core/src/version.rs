//! Alphanumeric ordering of change script versions.
//!
//! A version string is split on maximal runs of ASCII digits. Digit runs
//! compare as integers and everything between them compares as lowercased
//! text, so `1.2.10` sorts after `1.2.2` and before `1.10.0`.

use std::cmp::Ordering;

/// One token of a [`VersionKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Lowercased text between digit runs (possibly empty)
    Text(String),
    /// Digit run with leading zeros removed, so `"007"` and `"7"` are equal.
    /// Zero is stored as `"0"`.
    Number(String),
}

impl Segment {
    fn number(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Segment::Number("0".to_string())
        } else {
            Segment::Number(trimmed.to_string())
        }
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
            // Normalized digit strings: the longer one is the larger number.
            (Segment::Number(a), Segment::Number(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            // Never met between two parsed keys; text ranks first so the
            // order stays total.
            (Segment::Text(_), Segment::Number(_)) => Ordering::Less,
            (Segment::Number(_), Segment::Text(_)) => Ordering::Greater,
        }
    }
}

/// Comparable form of a version string.
///
/// Segments alternate text, number, text, ... and always begin and end
/// with a (possibly empty) text segment, so two keys never hold a number and
/// a text segment at the same position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionKey(Vec<Segment>);

impl VersionKey {
    /// Build the key for a version string.
    ///
    /// # Examples
    /// ```
    /// use sc_core::version::{Segment, VersionKey};
    /// let key = VersionKey::parse("1.2");
    /// assert_eq!(
    ///     key.segments(),
    ///     &[
    ///         Segment::Text(String::new()),
    ///         Segment::Number("1".to_string()),
    ///         Segment::Text(".".to_string()),
    ///         Segment::Number("2".to_string()),
    ///         Segment::Text(String::new()),
    ///     ]
    /// );
    /// ```
    pub fn parse(version: &str) -> Self {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut digits = String::new();

        for c in version.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
            } else {
                if !digits.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text).to_lowercase()));
                    segments.push(Segment::number(&digits));
                    digits.clear();
                }
                text.push(c);
            }
        }
        if !digits.is_empty() {
            segments.push(Segment::Text(std::mem::take(&mut text).to_lowercase()));
            segments.push(Segment::number(&digits));
        }
        segments.push(Segment::Text(text.to_lowercase()));

        Self(segments)
    }

    /// The alternating text/number segments of this key.
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }
}

impl From<&str> for VersionKey {
    fn from(version: &str) -> Self {
        Self::parse(version)
    }
}

/// Compare two version strings under the alphanumeric order.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    VersionKey::parse(a).cmp(&VersionKey::parse(b))
}

/// Sort version-bearing items ascending by the key of `version_of(item)`.
pub fn sort_by_version<T, F>(items: &mut [T], version_of: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_cached_key(|item| VersionKey::parse(version_of(item)));
}

/// Return the greatest version under the alphanumeric order.
///
/// `None` when `versions` is empty.
pub fn max_version<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions
        .into_iter()
        .map(|v| (VersionKey::parse(v), v))
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, v)| v)
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
