//! nightchart: coordinate and selection engine for observing-night charts.
//!
//! Projects timestamped events onto a real-time or compacted sequence x axis,
//! turns drag gestures into time-window zooms, and shares hover state across
//! every mounted chart surface. Drawing is left to the host; this crate owns
//! the arithmetic and the retained overlay/indicator state.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod projection;
pub mod render;
pub mod telemetry;
pub mod zoom;

pub use api::{EngineConfig, ObservingSession};
pub use error::{ChartError, ChartResult};
