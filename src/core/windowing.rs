use crate::core::{IntervalMarker, TimeRange, TimelineEvent};

/// Returns events whose time falls inside an inclusive window.
#[must_use]
pub fn events_in_time_window(events: &[TimelineEvent], window: TimeRange) -> Vec<TimelineEvent> {
    events
        .iter()
        .filter(|event| window.contains(event.time))
        .cloned()
        .collect()
}

/// Clips intervals to a window, dropping the ones that do not overlap it.
#[must_use]
pub fn clip_intervals_to_window(
    intervals: &[IntervalMarker],
    window: TimeRange,
) -> Vec<IntervalMarker> {
    intervals
        .iter()
        .filter(|interval| interval.end >= window.start() && interval.start <= window.end())
        .map(|interval| IntervalMarker {
            start: interval.start.max(window.start()),
            end: interval.end.min(window.end()),
        })
        .collect()
}
