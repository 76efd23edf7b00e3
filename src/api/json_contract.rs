//! Versioned JSON form of `EngineSnapshot` for replay and regression tooling.
//!
//! A v1 document is `{ "schema_version": 1, "snapshot": { ... } }`. Readers
//! also accept a bare snapshot object, which is what older replay output
//! contains.

use serde::{Deserialize, Serialize};

use crate::error::{ViewError, ViewResult};

use super::EngineSnapshot;

pub const ENGINE_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: EngineSnapshot,
}

/// Only the version field, so an unknown version is reported as such rather
/// than as a shape mismatch.
#[derive(Deserialize)]
struct SchemaHeader {
    schema_version: Option<u32>,
}

fn contract_error(action: &str, err: &serde_json::Error) -> ViewError {
    ViewError::InvalidData(format!("failed to {action} linked-views snapshot: {err}"))
}

impl EngineSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> ViewResult<String> {
        let payload = EngineSnapshotJsonContractV1 {
            schema_version: ENGINE_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|err| contract_error("serialize", &err))
    }

    /// Accepts either a bare snapshot or a v1 contract document.
    pub fn from_json_compat_str(input: &str) -> ViewResult<Self> {
        let header: SchemaHeader =
            serde_json::from_str(input).map_err(|err| contract_error("parse", &err))?;
        match header.schema_version {
            None => serde_json::from_str(input).map_err(|err| contract_error("parse", &err)),
            Some(ENGINE_SNAPSHOT_JSON_SCHEMA_V1) => {
                serde_json::from_str::<EngineSnapshotJsonContractV1>(input)
                    .map(|payload| payload.snapshot)
                    .map_err(|err| contract_error("parse", &err))
            }
            Some(other) => Err(ViewError::InvalidData(format!(
                "unsupported linked-views snapshot schema version {other}"
            ))),
        }
    }
}
