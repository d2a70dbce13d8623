//! Dual x-axis projection of timeline events.
//!
//! The same events can be drawn against real time or against a compacted
//! sequence axis where every event takes one integer slot and every dayobs is
//! followed by a fixed gap, so idle daytime hours do not eat the plot.

pub mod bucketing;
pub mod intervals;
pub mod mapping;
mod sequence;

use chrono::{Duration, DurationRound};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    DayObs, EntityId, IntervalMarker, TimeRange, TimelineEvent, clip_intervals_to_window,
    events_in_time_window,
};
use crate::core::time::{format_hh_mm, millis_to_datetime};
use crate::error::{ChartError, ChartResult};

pub use bucketing::{DayBucket, bucket_events, trim_empty_edges};
pub use intervals::{HorizonCrossing, HorizonEvent, pair_rise_set_events};
pub use mapping::{CoordinateMapping, SequenceLookup};
pub use sequence::compute_gap;

/// Largest accepted `SpacingConfig::floor`.
pub const MAX_GAP_FLOOR: u32 = 10_000;
/// Largest accepted `TickConfig::time_tick_hours` (one leap year).
pub const MAX_TIME_TICK_HOURS: u32 = 24 * 366;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisMode {
    Time,
    Sequence,
}

/// Sizing of the gap inserted after each dayobs on the sequence axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacingConfig {
    /// Smallest allowed gap. Must be >= 8 so boundary zigzags never overlap.
    pub floor: u32,
    /// `budget / buckets - 1` caps the gap when there are many dayobs.
    pub bucket_budget: f64,
    /// `events * density / buckets` caps the gap when data is sparse.
    pub event_density: f64,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            floor: 8,
            bucket_budget: 200.0,
            event_density: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickConfig {
    /// Roughly this many labelled ticks per dayobs on the sequence axis.
    pub ticks_per_bucket: f64,
    /// Upper bound on events between two sequence ticks.
    pub max_tick_step: u32,
    /// Spacing of time-axis ticks.
    pub time_tick_hours: u32,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            ticks_per_bucket: 6.0,
            max_tick_step: 50,
            time_tick_hours: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default)]
    pub spacing: SpacingConfig,
    #[serde(default)]
    pub ticks: TickConfig,
}

impl ProjectionConfig {
    pub fn validate(self) -> ChartResult<Self> {
        if !(8..=MAX_GAP_FLOOR).contains(&self.spacing.floor) {
            return Err(ChartError::InvalidConfig(format!(
                "sequence gap floor must be in 8..={MAX_GAP_FLOOR}"
            )));
        }
        if !self.spacing.bucket_budget.is_finite()
            || !self.spacing.event_density.is_finite()
            || self.spacing.bucket_budget <= 0.0
            || self.spacing.event_density <= 0.0
        {
            return Err(ChartError::InvalidConfig(
                "sequence gap budget and density must be finite and > 0".to_owned(),
            ));
        }
        if !self.ticks.ticks_per_bucket.is_finite() || self.ticks.ticks_per_bucket <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "ticks per bucket must be finite and > 0".to_owned(),
            ));
        }
        if self.ticks.max_tick_step == 0 || self.ticks.time_tick_hours == 0 {
            return Err(ChartError::InvalidConfig(
                "tick steps must be > 0".to_owned(),
            ));
        }
        if self.ticks.time_tick_hours > MAX_TIME_TICK_HOURS {
            return Err(ChartError::InvalidConfig(format!(
                "time tick spacing must be <= {MAX_TIME_TICK_HOURS} hours"
            )));
        }
        Ok(self)
    }
}

/// Everything the projector needs for one data/time-window change.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInput<'a> {
    pub events: &'a [TimelineEvent],
    pub day_keys: &'a [DayObs],
    pub window: TimeRange,
    pub intervals: &'a [IntervalMarker],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedEvent {
    pub event: TimelineEvent,
    /// Timestamp on the time axis, synthetic slot on the sequence axis.
    pub coordinate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedBucket {
    pub day_obs: DayObs,
    pub events: Vec<ProjectedEvent>,
    pub first_coordinate: Option<f64>,
    pub last_coordinate: Option<f64>,
    /// Midpoint of the gap in front of this bucket (sequence axis only).
    pub gap_before_mid: Option<f64>,
    /// Midpoint of the gap after this bucket (sequence axis only).
    pub gap_after_mid: Option<f64>,
    pub no_data: bool,
}

/// An interval overlay in axis coordinates.
///
/// A boundary endpoint was squeezed into a synthetic gap and is drawn with a
/// zigzag edge instead of a straight one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedInterval {
    pub start: f64,
    pub end: f64,
    pub start_is_boundary: bool,
    pub end_is_boundary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub coordinate: f64,
    pub label: String,
}

/// Secondary-axis tick naming a dayobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayTick {
    pub coordinate: f64,
    pub day_obs: DayObs,
    pub no_data: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub mode: AxisMode,
    pub domain: (f64, f64),
    pub buckets: Vec<ProjectedBucket>,
    pub events: Vec<ProjectedEvent>,
    pub intervals: Vec<ProjectedInterval>,
    pub major_ticks: Vec<Tick>,
    pub day_ticks: Vec<DayTick>,
    /// Vertical separators between dayobs (sequence axis only).
    pub day_breaks: Vec<f64>,
    /// Centers of "no data" markers for empty dayobs (sequence axis only).
    pub no_data_markers: Vec<f64>,
    /// Sequence-axis gap between dayobs; 0 on the time axis.
    pub gap: u32,
    pub mapping: CoordinateMapping,
}

impl Projection {
    #[must_use]
    pub fn coordinate_to_timestamp(&self, coordinate: f64) -> Option<f64> {
        self.mapping.to_timestamp(coordinate)
    }

    #[must_use]
    pub fn coordinate_of(&self, id: &EntityId) -> Option<f64> {
        self.events
            .iter()
            .find(|projected| &projected.event.id == id)
            .map(|projected| projected.coordinate)
    }
}

/// Projects events onto the requested axis.
///
/// Events outside `input.window` are filtered out first.
pub fn project(
    mode: AxisMode,
    input: ProjectionInput<'_>,
    config: ProjectionConfig,
) -> ChartResult<Projection> {
    let config = config.validate()?;
    let events = events_in_time_window(input.events, input.window);
    let buckets = bucket_events(&events, input.day_keys);
    debug!(
        ?mode,
        events = events.len(),
        buckets = buckets.len(),
        intervals = input.intervals.len(),
        "project timeline"
    );

    let projection = match mode {
        AxisMode::Time => project_time(&buckets, events.len(), input, config),
        AxisMode::Sequence => sequence::project_sequence(&buckets, events.len(), input, config),
    };
    Ok(projection)
}

fn project_time(
    buckets: &[DayBucket],
    total_events: usize,
    input: ProjectionInput<'_>,
    config: ProjectionConfig,
) -> Projection {
    let mut projected_buckets = Vec::with_capacity(buckets.len());
    let mut flat = Vec::with_capacity(total_events);
    let mut day_ticks = Vec::with_capacity(buckets.len());

    for bucket in buckets {
        let events: Vec<ProjectedEvent> = bucket
            .events
            .iter()
            .map(|event| ProjectedEvent {
                event: event.clone(),
                coordinate: event.time,
            })
            .collect();

        let tick_coordinate = match (bucket.first_time(), bucket.last_time()) {
            (Some(first), Some(last)) => ((first + last) / 2.0).floor(),
            _ => bucket.day_obs.night_midpoint_tai_millis(),
        };
        day_ticks.push(DayTick {
            coordinate: tick_coordinate,
            day_obs: bucket.day_obs,
            no_data: bucket.no_data(),
        });

        flat.extend(events.iter().cloned());
        projected_buckets.push(ProjectedBucket {
            day_obs: bucket.day_obs,
            events,
            first_coordinate: bucket.first_time(),
            last_coordinate: bucket.last_time(),
            gap_before_mid: None,
            gap_after_mid: None,
            no_data: bucket.no_data(),
        });
    }

    let intervals = clip_intervals_to_window(input.intervals, input.window)
        .into_iter()
        .map(|interval| ProjectedInterval {
            start: interval.start,
            end: interval.end,
            start_is_boundary: false,
            end_is_boundary: false,
        })
        .collect();

    Projection {
        mode: AxisMode::Time,
        domain: (input.window.start(), input.window.end()),
        buckets: projected_buckets,
        events: flat,
        intervals,
        major_ticks: hourly_ticks(input.window, config.ticks.time_tick_hours),
        day_ticks,
        day_breaks: Vec::new(),
        no_data_markers: Vec::new(),
        gap: 0,
        mapping: CoordinateMapping::Identity,
    }
}

/// Whole-hour ticks inside `window`, labelled `HH:MM`.
fn hourly_ticks(window: TimeRange, every_hours: u32) -> Vec<Tick> {
    let step = Duration::hours(i64::from(every_hours.max(1)));
    let Some(start) = millis_to_datetime(window.start()) else {
        return Vec::new();
    };
    let Ok(mut cursor) = start.duration_trunc(Duration::hours(1)) else {
        return Vec::new();
    };

    let mut ticks = Vec::new();
    loop {
        let coordinate = cursor.timestamp_millis() as f64;
        if coordinate > window.end() {
            break;
        }
        if coordinate >= window.start() {
            if let Some(label) = format_hh_mm(coordinate) {
                ticks.push(Tick { coordinate, label });
            }
        }
        let Some(next) = cursor.checked_add_signed(step) else {
            break;
        };
        cursor = next;
    }
    ticks
}
