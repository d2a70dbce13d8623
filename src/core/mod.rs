pub mod events;
pub mod scale;
pub mod time;
pub mod types;
pub mod windowing;

pub use events::{IntervalMarker, TimelineEvent};
pub use scale::LinearScale;
pub use time::{DayObs, TAI_OFFSET_SECONDS};
pub use types::{EntityId, PlotBounds, Point, PointerModifiers, SurfaceId, TimeRange};
pub use windowing::{clip_intervals_to_window, events_in_time_window};
