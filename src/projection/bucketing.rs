use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{DayObs, TimelineEvent};

/// Events sharing one dayobs. Empty buckets are kept so gaps stay visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    pub day_obs: DayObs,
    pub events: Vec<TimelineEvent>,
}

impl DayBucket {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Empty buckets get a "no data" marker.
    #[must_use]
    pub fn no_data(&self) -> bool {
        self.is_empty()
    }

    #[must_use]
    pub fn first_time(&self) -> Option<f64> {
        self.events.first().map(|event| event.time)
    }

    #[must_use]
    pub fn last_time(&self) -> Option<f64> {
        self.events.last().map(|event| event.time)
    }
}

/// Groups events by dayobs, in the order of `day_keys`.
///
/// Every key yields a bucket even when no event carries it. Events whose
/// dayobs is missing from `day_keys` get trailing buckets in the order they
/// are first seen. Each bucket is stably sorted by time.
#[must_use]
pub fn bucket_events(events: &[TimelineEvent], day_keys: &[DayObs]) -> Vec<DayBucket> {
    let mut groups: IndexMap<DayObs, Vec<TimelineEvent>> = day_keys
        .iter()
        .map(|day_obs| (*day_obs, Vec::new()))
        .collect();

    for event in events {
        groups.entry(event.day_obs).or_default().push(event.clone());
    }

    groups
        .into_iter()
        .map(|(day_obs, mut events)| {
            events.sort_by(|a, b| a.time.total_cmp(&b.time));
            DayBucket { day_obs, events }
        })
        .collect()
}

/// Drops empty buckets at either end; interior empty buckets stay.
#[must_use]
pub fn trim_empty_edges(buckets: &[DayBucket]) -> &[DayBucket] {
    let Some(first) = buckets.iter().position(|bucket| !bucket.is_empty()) else {
        return &[];
    };
    let last = buckets
        .iter()
        .rposition(|bucket| !bucket.is_empty())
        .unwrap_or(first);
    &buckets[first..=last]
}
