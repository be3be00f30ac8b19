//! Path segmentation and wildcard key construction.
//!
//! # Responsibilities
//! - Normalize request paths (strip one leading `/`)
//! - Split paths into segments on `/`
//! - Build the single-segment wildcard candidate for each position
//! - Recognize stored keys that are wildcard keys
//!
//! # Design Decisions
//! - Byte-for-byte comparison, no case folding or trailing-slash cleanup
//! - The empty path is one empty segment, so it still has one candidate (`%s`)
//! - Exactly one wildcard segment per key

use std::fmt;

/// Literal token marking the wildcard segment of a key.
pub const WILDCARD_TOKEN: &str = "%s";

/// Strip a single leading `/` from a request path.
pub fn normalize(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Strip a single trailing `/` from a request path. `/docs/` names the
/// same short link as `/docs`.
pub fn trim_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// A normalized request path split on `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegments<'a> {
    segments: Vec<&'a str>,
}

impl<'a> PathSegments<'a> {
    pub fn split(path: &'a str) -> Self {
        Self {
            segments: path.split('/').collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&'a str> {
        self.segments.get(position).copied()
    }

    /// The key obtained by replacing segment `position` with the wildcard
    /// token. `None` when `position` is out of range.
    pub fn wildcard_key(&self, position: usize) -> Option<WildcardKey> {
        if position >= self.segments.len() {
            return None;
        }
        let key = self
            .segments
            .iter()
            .enumerate()
            .map(|(i, &segment)| if i == position { WILDCARD_TOKEN } else { segment })
            .collect::<Vec<_>>()
            .join("/");
        Some(WildcardKey { key, position })
    }

    /// Wildcard candidates in probe order, leftmost position first.
    pub fn wildcard_keys(&self) -> impl Iterator<Item = WildcardKey> + '_ {
        (0..self.segments.len()).filter_map(move |position| self.wildcard_key(position))
    }
}

/// A registry key with exactly one segment equal to [`WILDCARD_TOKEN`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WildcardKey {
    key: String,
    position: usize,
}

impl WildcardKey {
    /// Recognize a stored key as a wildcard key.
    ///
    /// Returns `None` for exact keys and for keys with more than one
    /// wildcard segment.
    pub fn parse(key: &str) -> Option<Self> {
        let mut found = None;
        for (i, segment) in key.split('/').enumerate() {
            if segment == WILDCARD_TOKEN {
                if found.is_some() {
                    return None;
                }
                found = Some(i);
            }
        }
        found.map(|position| Self {
            key: key.to_owned(),
            position,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Index of the wildcard segment.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn into_string(self) -> String {
        self.key
    }
}

impl fmt::Display for WildcardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/docs"), "docs");
        assert_eq!(normalize("docs"), "docs");
        assert_eq!(normalize("/"), "");
        assert_eq!(normalize("//x"), "/x");
    }

    #[test]
    fn test_trim_trailing_slash() {
        assert_eq!(trim_trailing_slash("docs/"), "docs");
        assert_eq!(trim_trailing_slash("team/eng"), "team/eng");
        assert_eq!(trim_trailing_slash("a//"), "a/");
        assert_eq!(trim_trailing_slash(""), "");
    }

    #[test]
    fn test_wildcard_candidates() {
        let segments = PathSegments::split("a/b/c");
        let keys: Vec<String> = segments.wildcard_keys().map(WildcardKey::into_string).collect();
        assert_eq!(keys, vec!["%s/b/c", "a/%s/c", "a/b/%s"]);
        assert!(segments.wildcard_key(3).is_none());
    }

    #[test]
    fn test_root_path_has_one_candidate() {
        let segments = PathSegments::split("");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments.get(0), Some(""));
        let keys: Vec<String> = segments.wildcard_keys().map(WildcardKey::into_string).collect();
        assert_eq!(keys, vec!["%s"]);
    }

    #[test]
    fn test_empty_segments_are_kept() {
        let segments = PathSegments::split("team/");
        let keys: Vec<String> = segments.wildcard_keys().map(WildcardKey::into_string).collect();
        assert_eq!(keys, vec!["%s/", "team/%s"]);
    }

    #[test]
    fn test_parse_wildcard_key() {
        let key = WildcardKey::parse("team/%s/board").unwrap();
        assert_eq!(key.position(), 1);
        assert_eq!(key.as_str(), "team/%s/board");

        assert!(WildcardKey::parse("docs").is_none());
        assert!(WildcardKey::parse("a%s").is_none());
        assert!(WildcardKey::parse("%s/%s").is_none());
        assert_eq!(WildcardKey::parse("%s").unwrap().position(), 0);
    }
}
