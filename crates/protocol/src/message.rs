//! Wire message definitions.
//!
//! Both directions are tagged JSON objects: outbound actions carry an
//! `"action"` field, inbound results a `"result"` field. Unrecognized
//! results decode to [`ServerMessage::Unknown`] instead of failing, so the
//! caller can log and drop them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Coord;

/// Client -> server action messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ClientAction {
    /// Begin a new run: seed `layers` lattice layers at `fillPercent` density.
    Start {
        layers: u32,
        #[serde(rename = "fillPercent")]
        fill_percent: f64,
    },
    /// End the current run.
    Stop,
    /// Request the next generation.
    Tick,
}

/// Server -> client result messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum ServerMessage {
    /// The complete liveness map for the lattice as of the latest tick.
    Coordinates { data: CellSnapshot },
    /// Any result value this client does not handle.
    #[serde(other)]
    Unknown,
}

/// One generation's liveness map, keyed by coordinate key string.
///
/// Received verbatim from the server and superseded by the next tick's
/// snapshot. Only entries whose value is exactly the string `"true"` denote
/// a live cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellSnapshot(pub HashMap<String, String>);

impl CellSnapshot {
    /// Parsed coordinates of every live cell in the snapshot.
    ///
    /// A malformed key yields an `Err` for that entry only, so the caller
    /// can skip it without discarding the rest of the snapshot.
    pub fn live_coords(&self) -> impl Iterator<Item = Result<Coord, crate::ProtocolError>> + '_ {
        self.0
            .iter()
            .filter(|(_, marker)| marker.as_str() == "true")
            .map(|(key, _)| key.parse())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for CellSnapshot {
    fn from(entries: [(&str, &str); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}
