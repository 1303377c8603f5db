use serde::Serialize;

use crate::models::brand::{or_sentinel, SENTINEL};

/// Generic colour-word segment names. A candidate containing any of these
/// (case-sensitive substring) is never kept.
pub const GENERIC_NAME_DENYLIST: &[&str] = &[
    "Red", "Blue", "Green", "Yellow", "Orange", "Purple", "Pink", "Teal", "Gold", "Silver",
];

/// True when `name` contains a denylisted generic name.
pub fn is_generic_name(name: &str) -> bool {
    GENERIC_NAME_DENYLIST.iter().any(|generic| name.contains(generic))
}

/// A named audience profile ("Dart").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub name: String,
    pub characteristics: String,
    pub psychographic_drivers: String,
}

impl Segment {
    /// Builds a segment; empty detail fields fall back to the sentinel.
    pub fn new(name: String, characteristics: String, psychographic_drivers: String) -> Self {
        Self {
            name,
            characteristics: or_sentinel(characteristics),
            psychographic_drivers: or_sentinel(psychographic_drivers),
        }
    }

    /// Segments with nothing but sentinels stay in the collection but are not shown.
    pub fn is_presentable(&self) -> bool {
        !(self.characteristics == SENTINEL && self.psychographic_drivers == SENTINEL)
    }
}

/// Ordered mapping of segment name to segment, in first-extraction order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SegmentCollection {
    segments: Vec<Segment>,
}

impl SegmentCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a segment, keeping the position of an earlier segment with the
    /// same name (last write wins on content). Empty or generic names are
    /// refused and `false` is returned.
    pub fn insert(&mut self, segment: Segment) -> bool {
        if segment.name.trim().is_empty() || is_generic_name(&segment.name) {
            return false;
        }
        match self.segments.iter_mut().find(|s| s.name == segment.name) {
            Some(existing) => *existing = segment,
            None => self.segments.push(segment),
        }
        true
    }

    pub fn get(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments worth showing to a user.
    pub fn presentable(&self) -> Vec<&Segment> {
        self.segments.iter().filter(|s| s.is_presentable()).collect()
    }
}

impl FromIterator<Segment> for SegmentCollection {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        let mut collection = SegmentCollection::new();
        for segment in iter {
            collection.insert(segment);
        }
        collection
    }
}
