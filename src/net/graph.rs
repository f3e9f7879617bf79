//! Index-addressed arena holding the loaded network.

use std::collections::{BTreeMap, HashMap};

use super::types::*;
use crate::error::{DetectorError, Phase, StoreError};

/// Already-connected markers written by the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceMarkers {
    pub electricity: bool,
    pub water: bool,
}

impl ServiceMarkers {
    pub fn any(&self) -> bool {
        self.electricity || self.water
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeFlags {
    pub marker: bool,
    pub editor_only: bool,
    pub waterway: bool,
    pub local_connect: bool,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: Entity,
    pub prefab: Option<PrefabRef>,
    pub connected_edges: Option<Vec<Entity>>,
    pub services: ServiceMarkers,
    pub flags: NodeFlags,
    pub owner: Option<Entity>,
    pub upgrade: Option<CompositionFlags>,
}

impl Node {
    /// Incident edges in stored order; empty when the node has no edge buffer.
    pub fn incident_edges(&self) -> &[Entity] {
        self.connected_edges.as_deref().unwrap_or(&[])
    }
}

/// Mark attributes appended to edges by the detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EdgeMarks(u8);

impl EdgeMarks {
    pub const NONE: EdgeMarks = EdgeMarks(0);
    pub const HIGHLIGHTED: EdgeMarks = EdgeMarks(1 << 0);
    pub const BATCHES_UPDATED: EdgeMarks = EdgeMarks(1 << 1);
    pub const DELETED: EdgeMarks = EdgeMarks(1 << 2);

    pub fn contains(self, other: EdgeMarks) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: EdgeMarks) {
        self.0 |= other.0;
    }
}

impl std::ops::BitOr for EdgeMarks {
    type Output = EdgeMarks;

    fn bitor(self, rhs: EdgeMarks) -> EdgeMarks {
        EdgeMarks(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub id: Entity,
    pub start: Option<Entity>,
    pub end: Option<Entity>,
    pub prefab: Option<PrefabRef>,
    pub upgrade: Option<CompositionFlags>,
    pub water_connected: bool,
    pub marks: EdgeMarks,
}

impl Edge {
    pub fn is_missing_endpoint(&self) -> bool {
        self.start.is_none() || self.end.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Prefab {
    pub name: String,
    pub electricity: Option<ConnectionRequirement>,
    pub water_pipe: bool,
}

/// Read-only prefab lookup service.
#[derive(Debug, Clone, Default)]
pub struct PrefabTable {
    prefabs: HashMap<PrefabRef, Prefab>,
}

impl PrefabTable {
    pub fn get(&self, prefab: &PrefabRef) -> Option<&Prefab> {
        self.prefabs.get(prefab)
    }

    /// Display name used for diagnostics only.
    pub fn name(&self, prefab: &PrefabRef) -> Option<&str> {
        self.prefabs.get(prefab).map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Node(Node),
    Edge(Edge),
}

impl Slot {
    fn id(&self) -> Entity {
        match self {
            Slot::Node(n) => n.id,
            Slot::Edge(e) => e.id,
        }
    }
}

/// Nodes and edges share one entity index space, like the host's store.
/// Slots are keyed by index so sparse or very large indices cost nothing.
#[derive(Debug, Clone, Default)]
pub struct NetGraph {
    slots: BTreeMap<u32, Slot>,
    prefabs: PrefabTable,
}

impl NetGraph {
    pub fn build(snapshot: &NetworkSnapshot) -> Result<Self, Vec<DetectorError>> {
        let mut graph = NetGraph::default();
        let mut errors = Vec::new();

        for record in &snapshot.prefabs {
            let prefab = Prefab {
                name: record.name.clone(),
                electricity: record.electricity,
                water_pipe: record.water_pipe,
            };
            if graph.prefabs.prefabs.insert(record.id.clone(), prefab).is_some() {
                errors.push(DetectorError::new(
                    Phase::Load,
                    "P003",
                    format!("Prefab '{}' is declared more than once", record.id),
                    None,
                ));
            }
        }

        for record in &snapshot.nodes {
            let node = Node {
                id: record.id,
                prefab: record.prefab.clone(),
                connected_edges: record.connected_edges.clone(),
                services: ServiceMarkers {
                    electricity: record.electricity_connected,
                    water: record.water_connected,
                },
                flags: NodeFlags {
                    marker: record.marker,
                    editor_only: record.editor_only,
                    waterway: record.waterway,
                    local_connect: record.local_connect,
                },
                owner: record.owner,
                upgrade: record.upgrade,
            };
            if let Err(e) = graph.insert(Slot::Node(node)) {
                errors.push(e);
            }
        }

        for record in &snapshot.edges {
            let edge = Edge {
                id: record.id,
                start: record.start,
                end: record.end,
                prefab: record.prefab.clone(),
                upgrade: record.upgrade,
                water_connected: record.water_connected,
                marks: EdgeMarks::NONE,
            };
            if let Err(e) = graph.insert(Slot::Edge(edge)) {
                errors.push(e);
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(graph)
    }

    fn insert(&mut self, slot: Slot) -> Result<(), DetectorError> {
        let id = slot.id();
        if let Some(existing) = self.slots.get(&id.index) {
            return Err(DetectorError::new(
                Phase::Load,
                "P002",
                format!(
                    "Entity index {} is used by both '{}' and '{}'",
                    id.index,
                    existing.id(),
                    id
                ),
                Some(id),
            ));
        }
        self.slots.insert(id.index, slot);
        Ok(())
    }

    fn slot(&self, entity: Entity) -> Option<&Slot> {
        self.slots
            .get(&entity.index)
            .filter(|slot| slot.id().version == entity.version)
    }

    pub fn prefabs(&self) -> &PrefabTable {
        &self.prefabs
    }

    /// Node lookup; `None` for unknown, stale or non-node entities.
    pub fn node(&self, entity: Entity) -> Option<&Node> {
        match self.slot(entity)? {
            Slot::Node(n) => Some(n),
            Slot::Edge(_) => None,
        }
    }

    /// Edge lookup; `None` for unknown, stale or non-edge entities.
    pub fn edge(&self, entity: Entity) -> Option<&Edge> {
        match self.slot(entity)? {
            Slot::Edge(e) => Some(e),
            Slot::Node(_) => None,
        }
    }

    pub fn edge_mut(&mut self, entity: Entity) -> Result<&mut Edge, StoreError> {
        let slot = self
            .slots
            .get_mut(&entity.index)
            .filter(|slot| slot.id().version == entity.version)
            .ok_or(StoreError::StaleEntity(entity))?;
        match slot {
            Slot::Edge(e) => Ok(e),
            Slot::Node(_) => Err(StoreError::NotAnEdge(entity)),
        }
    }

    /// All nodes in index order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.slots.values().filter_map(|slot| match slot {
            Slot::Node(n) => Some(n),
            _ => None,
        })
    }

    /// All edges in index order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.slots.values().filter_map(|slot| match slot {
            Slot::Edge(e) => Some(e),
            _ => None,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// Edges currently carrying every bit of `marks`.
    pub fn edges_marked(&self, marks: EdgeMarks) -> Vec<Entity> {
        self.edges()
            .filter(|e| e.marks.contains(marks))
            .map(|e| e.id)
            .collect()
    }
}
