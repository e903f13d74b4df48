//! Public engine facade: the orchestrator plus the types hosts configure and
//! drive it with.

mod config;
mod json_contract;
mod orchestrator;
mod orchestrator_accessors;
mod orchestrator_controls;
mod orchestrator_data;
mod orchestrator_lifecycle;
mod toggles;
mod toolbar;

pub use config::ChartEngineConfig;
pub use json_contract::{CROSSHAIR_SNAPSHOT_JSON_SCHEMA_V1, CrosshairSnapshotJsonContractV1};
pub use orchestrator::{ChartOrchestrator, MountPhase};
pub use orchestrator_accessors::SeriesHandles;
pub use toggles::{OverlayKind, ToggleChange, ToggleState};
pub use toolbar::{ToolbarAction, ZOOM_IN_INSET_RATIO, ZOOM_OUT_INSET_RATIO};
