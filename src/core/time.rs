use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// TAI runs ahead of UTC by this many leap seconds.
pub const TAI_OFFSET_SECONDS: i64 = 37;

const DAY_OBS_FORMAT: &str = "%Y%m%d";
const ALMANAC_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[must_use]
pub fn datetime_to_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64
}

/// Converts a millisecond timestamp, rounded to the nearest millisecond.
#[must_use]
pub fn millis_to_datetime(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis.round() as i64)
}

/// Parses an almanac `yyyy-mm-dd HH:MM:SS` UTC string into TAI milliseconds.
pub fn utc_str_to_tai_millis(input: &str) -> ChartResult<f64> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), ALMANAC_DATETIME_FORMAT)
        .map_err(|e| ChartError::InvalidData(format!("bad utc datetime `{input}`: {e}")))?;
    let tai = Utc.from_utc_datetime(&naive) + Duration::seconds(TAI_OFFSET_SECONDS);
    Ok(datetime_to_millis(tai))
}

/// Formats a timestamp as `HH:MM` without any local timezone shift.
#[must_use]
pub fn format_hh_mm(millis: f64) -> Option<String> {
    millis_to_datetime(millis).map(|dt| dt.format("%H:%M").to_string())
}

/// Observing day, rolling over at local noon. Encoded as `yyyymmdd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DayObs(u32);

impl DayObs {
    pub fn new(value: u32) -> ChartResult<Self> {
        Self::parse(&value.to_string())
    }

    pub fn parse(input: &str) -> ChartResult<Self> {
        let trimmed = input.trim();
        let date = NaiveDate::parse_from_str(trimmed, DAY_OBS_FORMAT)
            .map_err(|e| ChartError::InvalidDayObs(format!("`{input}`: {e}")))?;
        Ok(Self::from_date(date))
    }

    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        let encoded = date
            .format(DAY_OBS_FORMAT)
            .to_string()
            .parse::<u32>()
            .unwrap_or_default();
        Self(encoded)
    }

    /// The dayobs whose noon-to-noon span contains `instant` (TAI millis).
    #[must_use]
    pub fn containing(instant: f64) -> Option<Self> {
        let utc = millis_to_datetime(instant)? - Duration::seconds(TAI_OFFSET_SECONDS);
        let shifted = utc - Duration::hours(12);
        Some(Self::from_date(shifted.date_naive()))
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn date(self) -> NaiveDate {
        let year = (self.0 / 10_000) as i32;
        let month = (self.0 / 100) % 100;
        let day = self.0 % 100;
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.date().succ_opt().map(Self::from_date)
    }

    /// Start of the dayobs (12:00 UTC) on the TAI scale, in millis.
    #[must_use]
    pub fn start_tai_millis(self) -> f64 {
        let noon = self.date().and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
        let tai = Utc.from_utc_datetime(&noon) + Duration::seconds(TAI_OFFSET_SECONDS);
        datetime_to_millis(tai)
    }

    /// End of the dayobs (11:59 UTC the next day) on the TAI scale, in millis.
    #[must_use]
    pub fn end_tai_millis(self) -> f64 {
        self.start_tai_millis() + Duration::hours(23).num_milliseconds() as f64
            + Duration::minutes(59).num_milliseconds() as f64
    }

    /// Local midnight at the observatory: dayobs start + 15 h, on the TAI scale.
    #[must_use]
    pub fn night_midpoint_tai_millis(self) -> f64 {
        self.start_tai_millis() + Duration::hours(15).num_milliseconds() as f64
    }

    /// `yyyy-mm-dd` form used in axis labels.
    #[must_use]
    pub fn display(self) -> String {
        self.date().format("%Y-%m-%d").to_string()
    }

    /// Every dayobs from `start` to `end`, inclusive.
    pub fn range(start: DayObs, end: DayObs) -> ChartResult<Vec<DayObs>> {
        if start > end {
            return Err(ChartError::InvalidDayObs(format!(
                "range start {start} is after end {end}"
            )));
        }
        let mut days = Vec::new();
        let mut cursor = start.date();
        let last = end.date();
        while cursor <= last {
            days.push(Self::from_date(cursor));
            cursor = match cursor.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        Ok(days)
    }

    /// The full TAI window covered by a dayobs range.
    pub fn window(start: DayObs, end: DayObs) -> ChartResult<crate::core::TimeRange> {
        if start > end {
            return Err(ChartError::InvalidDayObs(format!(
                "window start {start} is after end {end}"
            )));
        }
        crate::core::TimeRange::new(start.start_tai_millis(), end.end_tai_millis())
    }
}

impl TryFrom<u32> for DayObs {
    type Error = ChartError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DayObs> for u32 {
    fn from(value: DayObs) -> Self {
        value.0
    }
}

impl FromStr for DayObs {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DayObs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
