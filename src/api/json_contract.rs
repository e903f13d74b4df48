use serde::{Deserialize, Serialize};

use crate::coordinators::CrosshairSnapshot;
use crate::error::{ChartError, ChartResult};

pub const CROSSHAIR_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Versioned envelope of the crosshair stream. `snapshot` is `null` when idle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosshairSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: Option<CrosshairSnapshot>,
}

impl CrosshairSnapshotJsonContractV1 {
    #[must_use]
    pub fn new(snapshot: Option<CrosshairSnapshot>) -> Self {
        Self {
            schema_version: CROSSHAIR_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot,
        }
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize crosshair contract v1: {e}"))
        })
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let payload: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse crosshair contract payload: {e}"))
        })?;
        if payload.schema_version != CROSSHAIR_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported crosshair snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload)
    }
}

impl CrosshairSnapshot {
    /// Bare snapshot JSON without the version envelope.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize crosshair snapshot: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        CrosshairSnapshotJsonContractV1::new(Some(self.clone())).to_json_pretty()
    }

    /// Accepts a bare snapshot or a v1 envelope carrying one.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<CrosshairSnapshot>(input) {
            return Ok(snapshot);
        }
        CrosshairSnapshotJsonContractV1::from_json_str(input)?
            .snapshot
            .ok_or_else(|| ChartError::InvalidData("crosshair contract carries no snapshot".to_owned()))
    }
}
