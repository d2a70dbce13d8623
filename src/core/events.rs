use serde::{Deserialize, Serialize};

use crate::core::{DayObs, EntityId};
use crate::error::{ChartError, ChartResult};

/// One plotted observation (an exposure, a log entry, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: EntityId,
    pub day_obs: DayObs,
    /// Observation start in TAI milliseconds.
    pub time: f64,
    /// Sequence number within the dayobs, used for sequence-axis tick labels.
    pub seq_num: u32,
}

impl TimelineEvent {
    pub fn new(
        id: impl Into<EntityId>,
        day_obs: DayObs,
        time: f64,
        seq_num: u32,
    ) -> ChartResult<Self> {
        if !time.is_finite() {
            return Err(ChartError::InvalidData(
                "event time must be finite".to_owned(),
            ));
        }
        Ok(Self {
            id: id.into(),
            day_obs,
            time,
            seq_num,
        })
    }
}

/// A real-time interval overlaid on the chart, e.g. moon above the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalMarker {
    pub start: f64,
    pub end: f64,
}

impl IntervalMarker {
    pub fn new(start: f64, end: f64) -> ChartResult<Self> {
        if !start.is_finite() || !end.is_finite() || start > end {
            return Err(ChartError::InvalidData(
                "interval bounds must be finite and ordered".to_owned(),
            ));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn contains(self, instant: f64) -> bool {
        instant >= self.start && instant <= self.end
    }
}
