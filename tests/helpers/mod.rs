use broken_segment_detector::command::PlaybackSummary;
use broken_segment_detector::config::DetectorConfig;
use broken_segment_detector::detect::{self, PassReport};
use broken_segment_detector::diagnostics::MemorySink;
use broken_segment_detector::net::*;

// =============================================================================
// Snapshot builders
// =============================================================================

/// Entity with version 1, the common case in fixtures.
pub fn e(index: u32) -> Entity {
    Entity::new(index, 1)
}

pub fn lighting() -> CompositionFlags {
    CompositionFlags::general(GeneralFlags::LIGHTING)
}

pub struct SnapshotBuilder {
    snapshot: NetworkSnapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        SnapshotBuilder {
            snapshot: NetworkSnapshot::default(),
        }
    }

    /// Prefab with no service requirements.
    pub fn prefab(mut self, id: &str, name: &str) -> Self {
        self.snapshot.prefabs.push(PrefabRecord {
            id: PrefabRef::new(id),
            name: name.into(),
            electricity: None,
            water_pipe: false,
        });
        self
    }

    pub fn electricity_prefab(mut self, id: &str, name: &str, requirement: CompositionFlags) -> Self {
        self.snapshot.prefabs.push(PrefabRecord {
            id: PrefabRef::new(id),
            name: name.into(),
            electricity: Some(requirement),
            water_pipe: false,
        });
        self
    }

    pub fn water_prefab(mut self, id: &str, name: &str) -> Self {
        self.snapshot.prefabs.push(PrefabRecord {
            id: PrefabRef::new(id),
            name: name.into(),
            electricity: None,
            water_pipe: true,
        });
        self
    }

    pub fn node(self, index: u32, prefab: &str, edges: &[u32]) -> Self {
        self.node_with(index, prefab, edges, |_| {})
    }

    pub fn node_with(
        mut self,
        index: u32,
        prefab: &str,
        edges: &[u32],
        customize: impl FnOnce(&mut NodeRecord),
    ) -> Self {
        let mut record = NodeRecord {
            id: e(index),
            prefab: Some(PrefabRef::new(prefab)),
            connected_edges: Some(edges.iter().map(|&i| e(i)).collect()),
            electricity_connected: false,
            water_connected: false,
            marker: false,
            editor_only: false,
            waterway: false,
            local_connect: false,
            owner: None,
            upgrade: None,
        };
        customize(&mut record);
        self.snapshot.nodes.push(record);
        self
    }

    pub fn edge(self, index: u32, start: u32, end: u32, prefab: Option<&str>) -> Self {
        self.edge_with(index, start, end, prefab, |_| {})
    }

    pub fn edge_with(
        mut self,
        index: u32,
        start: u32,
        end: u32,
        prefab: Option<&str>,
        customize: impl FnOnce(&mut EdgeRecord),
    ) -> Self {
        let mut record = EdgeRecord {
            id: e(index),
            start: Some(e(start)),
            end: Some(e(end)),
            prefab: prefab.map(|p| PrefabRef::new(p)),
            upgrade: None,
            water_connected: false,
        };
        customize(&mut record);
        self.snapshot.edges.push(record);
        self
    }

    pub fn snapshot(self) -> NetworkSnapshot {
        self.snapshot
    }

    pub fn build(self) -> NetGraph {
        NetGraph::build(&self.snapshot).expect("Should build graph")
    }
}

// =============================================================================
// Pass runners
// =============================================================================

pub fn run(graph: &mut NetGraph, config: &DetectorConfig) -> (PassReport, PlaybackSummary, MemorySink) {
    let mut sink = MemorySink::new();
    let (report, playback) = detect::run_and_commit(graph, config, &mut sink);
    (report, playback, sink)
}

pub fn run_default(graph: &mut NetGraph) -> (PassReport, PlaybackSummary, MemorySink) {
    run(graph, &DetectorConfig::default())
}

pub fn broken_ids(report: &PassReport) -> Vec<Entity> {
    report.broken.iter().map(|b| b.node).collect()
}
