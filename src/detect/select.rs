//! Structural pre-filter over the node population.

use crate::config::ClassifierMode;
use crate::error::{DetectorError, Phase};
use crate::net::graph::{NetGraph, Node};
use crate::net::types::Entity;

#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub candidates: Vec<Entity>,
    /// Nodes left out because data they need is missing.
    pub skipped: Vec<DetectorError>,
}

/// Nodes that could plausibly be missing a service connection, in index order.
pub fn select_candidates(graph: &NetGraph, mode: ClassifierMode) -> Selection {
    let mut selection = Selection::default();

    for node in graph.nodes() {
        if is_exempt(node, mode) {
            continue;
        }
        let Some(edges) = &node.connected_edges else {
            selection.skipped.push(DetectorError::new(
                Phase::Select,
                "S001",
                "Node has no connected edge buffer",
                Some(node.id),
            ));
            continue;
        };
        if edges.is_empty() {
            continue;
        }
        if node.prefab.is_none() {
            selection.skipped.push(DetectorError::new(
                Phase::Select,
                "S001",
                "Node has no prefab reference",
                Some(node.id),
            ));
            continue;
        }
        selection.candidates.push(node.id);
    }

    selection
}

fn is_exempt(node: &Node, mode: ClassifierMode) -> bool {
    if node.services.any()
        || node.flags.marker
        || node.flags.editor_only
        || node.flags.waterway
    {
        return true;
    }
    match mode {
        ClassifierMode::Refined => node.owner.is_some() || node.flags.local_connect,
        ClassifierMode::Legacy => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::types::*;

    fn record(index: u32) -> NodeRecord {
        NodeRecord {
            id: Entity::new(index, 1),
            prefab: Some(PrefabRef::new("node")),
            connected_edges: Some(vec![Entity::new(100, 1)]),
            electricity_connected: false,
            water_connected: false,
            marker: false,
            editor_only: false,
            waterway: false,
            local_connect: false,
            owner: None,
            upgrade: None,
        }
    }

    fn select(nodes: Vec<NodeRecord>, mode: ClassifierMode) -> Selection {
        let graph = NetGraph::build(&NetworkSnapshot {
            nodes,
            ..Default::default()
        })
        .unwrap();
        select_candidates(&graph, mode)
    }

    #[test]
    fn connected_markers_exclude_regardless_of_prefab() {
        let mut powered = record(1);
        powered.electricity_connected = true;
        let mut watered = record(2);
        watered.water_connected = true;
        let plain = record(3);

        let selection = select(vec![powered, watered, plain], ClassifierMode::Refined);
        assert_eq!(selection.candidates, vec![Entity::new(3, 1)]);
    }

    #[test]
    fn classification_flags_exclude() {
        let mut marker = record(1);
        marker.marker = true;
        let mut editor = record(2);
        editor.editor_only = true;
        let mut waterway = record(3);
        waterway.waterway = true;

        let selection = select(vec![marker, editor, waterway], ClassifierMode::Refined);
        assert!(selection.candidates.is_empty());
        assert!(selection.skipped.is_empty());
    }

    #[test]
    fn owner_and_local_connect_only_exclude_in_refined_mode() {
        let mut owned = record(1);
        owned.owner = Some(Entity::new(50, 1));
        let mut local = record(2);
        local.local_connect = true;

        let refined = select(vec![owned.clone(), local.clone()], ClassifierMode::Refined);
        assert!(refined.candidates.is_empty());

        let legacy = select(vec![owned, local], ClassifierMode::Legacy);
        assert_eq!(legacy.candidates.len(), 2);
    }

    #[test]
    fn missing_data_is_skipped_with_a_diagnostic() {
        let mut no_buffer = record(1);
        no_buffer.connected_edges = None;
        let mut no_prefab = record(2);
        no_prefab.prefab = None;
        let mut no_edges = record(3);
        no_edges.connected_edges = Some(vec![]);

        let selection = select(vec![no_buffer, no_prefab, no_edges], ClassifierMode::Refined);
        assert!(selection.candidates.is_empty());
        assert_eq!(selection.skipped.len(), 2);
        assert!(selection.skipped.iter().all(|e| e.code == "S001"));
    }

    #[test]
    fn selection_is_repeatable() {
        let nodes = vec![record(4), record(2), record(9)];
        let first = select(nodes.clone(), ClassifierMode::Refined);
        let second = select(nodes, ClassifierMode::Refined);
        assert_eq!(first.candidates, second.candidates);
        assert_eq!(
            first.candidates,
            vec![Entity::new(2, 1), Entity::new(4, 1), Entity::new(9, 1)]
        );
    }
}
