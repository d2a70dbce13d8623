use std::rc::Rc;

/// Reverse map from an x-axis coordinate back to a real timestamp.
///
/// Cloning is cheap; sequence lookups share one table.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CoordinateMapping {
    /// The x axis already is real time.
    #[default]
    Identity,
    /// The x axis is the compacted sequence axis.
    Sequence(SequenceLookup),
}

impl CoordinateMapping {
    /// Returns `None` for non-finite input, or for a sequence coordinate that
    /// no real event occupies.
    #[must_use]
    pub fn to_timestamp(&self, coordinate: f64) -> Option<f64> {
        if !coordinate.is_finite() {
            return None;
        }
        match self {
            Self::Identity => Some(coordinate),
            Self::Sequence(lookup) => lookup.timestamp_at(coordinate),
        }
    }
}

/// Sorted `(coordinate, timestamp)` pairs for every real event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SequenceLookup {
    entries: Rc<[(u32, f64)]>,
}

impl SequenceLookup {
    /// Builds a lookup. Entries must already be ordered by coordinate.
    pub(crate) fn from_sorted(entries: Vec<(u32, f64)>) -> Self {
        debug_assert!(entries.windows(2).all(|pair| pair[0].0 < pair[1].0));
        Self {
            entries: entries.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn timestamp_at(&self, coordinate: f64) -> Option<f64> {
        if coordinate.fract() != 0.0 || coordinate < 0.0 || coordinate > f64::from(u32::MAX) {
            return None;
        }
        let key = coordinate as u32;
        self.entries
            .binary_search_by_key(&key, |(coordinate, _)| *coordinate)
            .ok()
            .map(|idx| self.entries[idx].1)
    }
}
