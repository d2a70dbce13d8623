use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{IntervalMarker, TimeRange};
use crate::core::time::utc_str_to_tai_millis;
use crate::error::ChartResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HorizonCrossing {
    // Declared first so that at equal timestamps a set closes the open
    // interval before a rise reopens it.
    Set,
    Rise,
}

/// One rise or set of a body (the moon) in TAI milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonEvent {
    pub time: f64,
    pub crossing: HorizonCrossing,
}

impl HorizonEvent {
    #[must_use]
    pub fn rise(time: f64) -> Self {
        Self {
            time,
            crossing: HorizonCrossing::Rise,
        }
    }

    #[must_use]
    pub fn set(time: f64) -> Self {
        Self {
            time,
            crossing: HorizonCrossing::Set,
        }
    }

    /// Builds rise/set events from almanac `yyyy-mm-dd HH:MM:SS` UTC strings.
    pub fn from_almanac_row(rise_utc: &str, set_utc: &str) -> ChartResult<[Self; 2]> {
        Ok([
            Self::rise(utc_str_to_tai_millis(rise_utc)?),
            Self::set(utc_str_to_tai_millis(set_utc)?),
        ])
    }
}

/// Pairs rise/set events into "up" intervals inside `window`.
///
/// Policies:
/// - events are sorted by time; at equal times `Set` sorts before `Rise`;
/// - a leading `Set` means the body was already up: `[window.start, set]`;
/// - a trailing `Rise` before `window.end` means it is still up: `[rise, window.end]`;
/// - a `Set` with nothing open (other than the leading one) is ignored, as is a
///   `Rise` while one is already open (the later rise wins);
/// - intervals are clamped to the window and dropped if they end up empty.
#[must_use]
pub fn pair_rise_set_events(events: &[HorizonEvent], window: TimeRange) -> Vec<IntervalMarker> {
    let mut sorted: Vec<HorizonEvent> = events
        .iter()
        .copied()
        .filter(|event| event.time.is_finite())
        .collect();
    if sorted.is_empty() {
        return Vec::new();
    }
    sorted.sort_by(|a, b| a.time.total_cmp(&b.time).then(a.crossing.cmp(&b.crossing)));

    let mut raw: Vec<(f64, f64)> = Vec::new();
    let mut open: Option<f64> = None;

    if sorted[0].crossing == HorizonCrossing::Set {
        raw.push((window.start(), sorted[0].time));
    }

    for event in &sorted {
        match event.crossing {
            HorizonCrossing::Rise => open = Some(event.time),
            HorizonCrossing::Set => {
                if let Some(start) = open.take() {
                    raw.push((start, event.time));
                }
            }
        }
    }

    if let Some(start) = open {
        if start < window.end() {
            raw.push((start, window.end()));
        }
    }

    let intervals: Vec<IntervalMarker> = raw
        .into_iter()
        .filter_map(|(start, end)| {
            let start = start.max(window.start());
            let end = end.min(window.end());
            (start < end).then_some(IntervalMarker { start, end })
        })
        .collect();
    trace!(
        events = sorted.len(),
        intervals = intervals.len(),
        "paired rise/set events"
    );
    intervals
}
