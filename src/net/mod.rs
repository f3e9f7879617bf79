//! Load phase: snapshot JSON → Rust types + arena construction.

pub mod graph;
pub mod types;

pub use graph::NetGraph;
pub use types::*;

use crate::error::{DetectorError, Phase};

/// Deserialize a snapshot JSON string into a `NetworkSnapshot`.
pub fn load(json: &str) -> Result<NetworkSnapshot, Vec<DetectorError>> {
    serde_json::from_str::<NetworkSnapshot>(json).map_err(|e| {
        vec![DetectorError::new(
            Phase::Load,
            "P001",
            format!("Failed to parse network snapshot JSON: {}", e),
            None,
        )]
    })
}

/// Load JSON and build the graph in one step.
pub fn load_and_build(json: &str) -> Result<NetGraph, Vec<DetectorError>> {
    let snapshot = load(json)?;
    NetGraph::build(&snapshot)
}
