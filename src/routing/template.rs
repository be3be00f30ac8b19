//! Destination templates with a single wildcard slot.

use crate::routing::matcher::WILDCARD_TOKEN;

/// A stored destination, split at its first wildcard token.
///
/// Only the first `%s` is a slot; any later occurrence is literal text and
/// is emitted unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationTemplate<'a> {
    /// No wildcard slot; renders verbatim.
    Literal(&'a str),
    /// Text around the first wildcard slot.
    Slotted { before: &'a str, after: &'a str },
}

impl<'a> DestinationTemplate<'a> {
    pub fn parse(destination: &'a str) -> Self {
        match destination.split_once(WILDCARD_TOKEN) {
            Some((before, after)) => Self::Slotted { before, after },
            None => Self::Literal(destination),
        }
    }

    pub fn has_slot(&self) -> bool {
        matches!(self, Self::Slotted { .. })
    }

    /// Fill the slot with `segment`.
    pub fn render(&self, segment: &str) -> String {
        match *self {
            Self::Literal(text) => text.to_owned(),
            Self::Slotted { before, after } => {
                let mut out = String::with_capacity(before.len() + segment.len() + after.len());
                out.push_str(before);
                out.push_str(segment);
                out.push_str(after);
                out
            }
        }
    }
}

/// Number of wildcard tokens in a destination.
pub fn slot_count(destination: &str) -> usize {
    destination.matches(WILDCARD_TOKEN).count()
}
