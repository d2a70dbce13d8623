//! Host-facing session API.

mod config;
mod json_contract;
mod session;

pub use config::{EngineConfig, ZoomConfig};
pub use json_contract::{ENGINE_CONFIG_JSON_SCHEMA_V1, EngineConfigJsonContractV1};
pub use session::{ObservingSession, SessionCommand};
