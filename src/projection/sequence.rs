use ordered_float::OrderedFloat;
use tracing::{trace, warn};

use crate::core::IntervalMarker;

use super::{
    AxisMode, CoordinateMapping, DayBucket, DayTick, ProjectedBucket, ProjectedEvent,
    ProjectedInterval, Projection, ProjectionConfig, ProjectionInput, SequenceLookup,
    SpacingConfig, Tick, TickConfig, trim_empty_edges,
};

/// Slot 0 stays empty so no event sits on the axis baseline.
const FIRST_COORDINATE: u32 = 1;

/// Gap inserted after every dayobs on the sequence axis.
///
/// `max(floor, min(budget / n - 1, events * density / n))`, rounded up to an
/// even integer so the gap midpoint is an integer too. Results too large for
/// a `u32` coordinate fall back to the floor.
#[must_use]
pub fn compute_gap(bucket_count: usize, total_events: usize, spacing: &SpacingConfig) -> u32 {
    let floor = round_up_even(spacing.floor.max(8));
    if bucket_count == 0 {
        return floor;
    }

    let n = bucket_count as f64;
    let by_buckets = spacing.bucket_budget / n - 1.0;
    let by_events = total_events as f64 * spacing.event_density / n;
    let raw = by_buckets.min(by_events).max(f64::from(floor)).ceil();
    if !raw.is_finite() || raw >= f64::from(u32::MAX - 1) {
        return floor;
    }
    round_up_even(raw as u32)
}

/// Odd values round up, or down at `u32::MAX`.
fn round_up_even(value: u32) -> u32 {
    if value % 2 == 0 {
        return value;
    }
    value.checked_add(1).unwrap_or(value - 1)
}

fn tick_step(bucket_len: usize, ticks: &TickConfig) -> usize {
    let step = (bucket_len as f64 / ticks.ticks_per_bucket)
        .min(f64::from(ticks.max_tick_step))
        .ceil();
    (step as usize).max(1)
}

pub(super) fn project_sequence(
    buckets: &[DayBucket],
    total_events: usize,
    input: ProjectionInput<'_>,
    config: ProjectionConfig,
) -> Projection {
    let trimmed = trim_empty_edges(buckets);
    let gap = compute_gap(trimmed.len(), total_events, &config.spacing);
    let half_gap = f64::from(gap / 2);

    let mut cursor = FIRST_COORDINATE;
    let mut projected_buckets = Vec::with_capacity(trimmed.len());
    let mut flat = Vec::with_capacity(total_events);
    let mut lookup = Vec::with_capacity(total_events);
    let mut major_ticks = Vec::new();
    let mut day_ticks = Vec::with_capacity(trimmed.len());
    let mut day_breaks = Vec::new();
    let mut no_data_markers = Vec::new();

    for (idx, bucket) in trimmed.iter().enumerate() {
        let lead = if idx == 0 { 0 } else { gap };
        let Some((first, end)) = cursor.checked_add(lead).and_then(|first| {
            let len = u32::try_from(bucket.events.len()).ok()?;
            Some((first, first.checked_add(len)?))
        }) else {
            warn!(
                day_obs = %bucket.day_obs,
                gap,
                "sequence axis out of coordinates; later dayobs dropped"
            );
            break;
        };
        cursor = first;
        let step = tick_step(bucket.events.len(), &config.ticks);
        let mut events = Vec::with_capacity(bucket.events.len());

        for (i, event) in bucket.events.iter().enumerate() {
            let coordinate = f64::from(cursor);
            if i % step == 0 {
                major_ticks.push(Tick {
                    coordinate,
                    label: event.seq_num.to_string(),
                });
            }
            lookup.push((cursor, event.time));
            events.push(ProjectedEvent {
                event: event.clone(),
                coordinate,
            });
            cursor += 1;
        }

        let gap_before_mid = f64::from(first) - half_gap;
        let gap_after_mid = f64::from(end) + half_gap;

        if bucket.is_empty() {
            no_data_markers.push(gap_after_mid);
            day_ticks.push(DayTick {
                coordinate: gap_after_mid,
                day_obs: bucket.day_obs,
                no_data: true,
            });
        } else {
            let mid = ((f64::from(end) - f64::from(first)) / 2.0 + f64::from(first)).floor();
            day_ticks.push(DayTick {
                coordinate: mid,
                day_obs: bucket.day_obs,
                no_data: false,
            });
        }

        if idx > 0 {
            day_breaks.push(gap_before_mid);
        }

        flat.extend(events.iter().cloned());
        projected_buckets.push(ProjectedBucket {
            day_obs: bucket.day_obs,
            first_coordinate: events.first().map(|e| e.coordinate),
            last_coordinate: events.last().map(|e| e.coordinate),
            events,
            gap_before_mid: Some(gap_before_mid),
            gap_after_mid: Some(gap_after_mid),
            no_data: bucket.is_empty(),
        });
    }

    // No trailing gap after the last dayobs.
    let domain_end = f64::from(cursor);
    let domain = (0.0, domain_end);

    let intervals: Vec<ProjectedInterval> = input
        .intervals
        .iter()
        .filter_map(|interval| reposition_interval(*interval, &projected_buckets, domain))
        .collect();
    trace!(
        gap,
        events = flat.len(),
        kept_intervals = intervals.len(),
        dropped_intervals = input.intervals.len() - intervals.len(),
        "sequence projection"
    );

    Projection {
        mode: AxisMode::Sequence,
        domain,
        buckets: projected_buckets,
        events: flat,
        intervals,
        major_ticks,
        day_ticks,
        day_breaks,
        no_data_markers,
        gap,
        mapping: CoordinateMapping::Sequence(SequenceLookup::from_sorted(lookup)),
    }
}

/// Where an instant falls relative to the non-empty buckets.
enum Placement<'a> {
    BeforeAll,
    Inside(&'a ProjectedBucket),
    /// In the gap between `before` and `after`.
    Between {
        before: &'a ProjectedBucket,
        after: &'a ProjectedBucket,
    },
    AfterAll,
}

fn place<'a>(instant: f64, buckets: &'a [ProjectedBucket]) -> Placement<'a> {
    let mut previous: Option<&ProjectedBucket> = None;
    for bucket in buckets.iter().filter(|bucket| !bucket.events.is_empty()) {
        let (Some(first), Some(last)) = (bucket.events.first(), bucket.events.last()) else {
            continue;
        };
        if instant < first.event.time {
            return match previous {
                Some(before) => Placement::Between {
                    before,
                    after: bucket,
                },
                None => Placement::BeforeAll,
            };
        }
        if instant <= last.event.time {
            return Placement::Inside(bucket);
        }
        previous = Some(bucket);
    }
    Placement::AfterAll
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Start,
    End,
}

/// Nearest event of `bucket` to `instant`. Ties go toward the interval
/// interior: the later event for a start, the earlier one for an end.
fn nearest_coordinate(instant: f64, bucket: &ProjectedBucket, endpoint: Endpoint) -> Option<f64> {
    bucket
        .events
        .iter()
        .min_by_key(|projected| {
            let distance = OrderedFloat((projected.event.time - instant).abs());
            let toward_interior = match endpoint {
                Endpoint::Start => projected.event.time >= instant,
                Endpoint::End => projected.event.time <= instant,
            };
            (distance, !toward_interior)
        })
        .map(|projected| projected.coordinate)
}

fn reposition_endpoint(
    instant: f64,
    endpoint: Endpoint,
    buckets: &[ProjectedBucket],
    domain: (f64, f64),
) -> Option<(f64, bool)> {
    match place(instant, buckets) {
        Placement::Inside(bucket) => {
            nearest_coordinate(instant, bucket, endpoint).map(|c| (c, false))
        }
        Placement::Between { before, after } => {
            let mid = match endpoint {
                Endpoint::Start => after.gap_before_mid,
                Endpoint::End => before.gap_after_mid,
            };
            mid.map(|mid| (mid, true))
        }
        // Real time before the first event or after the last is squeezed
        // into the plot edge.
        Placement::BeforeAll => Some((domain.0, true)),
        Placement::AfterAll => Some((domain.1, true)),
    }
}

fn reposition_interval(
    interval: IntervalMarker,
    buckets: &[ProjectedBucket],
    domain: (f64, f64),
) -> Option<ProjectedInterval> {
    let covers_event = buckets
        .iter()
        .flat_map(|bucket| bucket.events.iter())
        .any(|projected| interval.contains(projected.event.time));
    if !covers_event {
        return None;
    }

    let (start, start_is_boundary) =
        reposition_endpoint(interval.start, Endpoint::Start, buckets, domain)?;
    let (end, end_is_boundary) = reposition_endpoint(interval.end, Endpoint::End, buckets, domain)?;
    Some(ProjectedInterval {
        start: start.min(end),
        end: start.max(end),
        start_is_boundary,
        end_is_boundary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_matches_event_density_when_sparse() {
        // 3 buckets, 300 events: min(200/3 - 1, 300 * 0.2 / 3) = min(65.67, 20) = 20
        assert_eq!(compute_gap(3, 300, &SpacingConfig::default()), 20);
    }

    #[test]
    fn gap_is_rounded_up_to_even() {
        // 2 buckets, 105 events: min(99, 10.5) -> ceil 11 -> 12
        assert_eq!(compute_gap(2, 105, &SpacingConfig::default()), 12);
    }

    #[test]
    fn gap_never_drops_below_floor() {
        assert_eq!(compute_gap(1, 0, &SpacingConfig::default()), 8);
        assert_eq!(compute_gap(500, 100_000, &SpacingConfig::default()), 8);
        assert_eq!(compute_gap(0, 0, &SpacingConfig::default()), 8);
    }

    #[test]
    fn gap_stays_even_at_the_top_of_the_range() {
        let spacing = SpacingConfig {
            floor: u32::MAX,
            ..SpacingConfig::default()
        };
        assert_eq!(compute_gap(0, 0, &spacing), u32::MAX - 1);
        assert_eq!(compute_gap(3, 10, &spacing), u32::MAX - 1);
        assert_eq!(round_up_even(7), 8);
        assert_eq!(round_up_even(u32::MAX), u32::MAX - 1);
    }

    #[test]
    fn tick_step_keeps_density_roughly_constant() {
        let ticks = TickConfig::default();
        assert_eq!(tick_step(0, &ticks), 1);
        assert_eq!(tick_step(5, &ticks), 1);
        assert_eq!(tick_step(60, &ticks), 10);
        assert_eq!(tick_step(10_000, &ticks), 50);
    }
}
