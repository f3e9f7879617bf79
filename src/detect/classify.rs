//! Broken-node classification over the candidate set.

use std::collections::HashSet;

use serde::Serialize;

use super::evaluate::{Subject, unmet_service};
use crate::config::ClassifierMode;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{DetectorError, Phase};
use crate::net::graph::{NetGraph, Node, Prefab};
use crate::net::types::{Entity, PrefabRef, Service};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum BrokenCause {
    /// The node's own prefab requires a service the node lacks.
    OwnPrefab { service: Service },
    /// An incident edge's prefab requires a service the edge lacks.
    #[serde(rename_all = "camelCase")]
    Delegated {
        edge: Entity,
        edge_prefab_name: String,
        service: Service,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokenNode {
    pub node: Entity,
    pub prefab_name: String,
    pub cause: BrokenCause,
}

/// Classify candidates. Each node appears at most once in the result.
pub fn classify(
    graph: &NetGraph,
    candidates: &[Entity],
    mode: ClassifierMode,
    sink: &mut dyn DiagnosticSink,
) -> Vec<BrokenNode> {
    let mut broken = Vec::new();
    let mut seen = HashSet::new();

    for &entity in candidates {
        let Some(node) = graph.node(entity) else {
            sink.emit(Diagnostic::Skipped(DetectorError::new(
                Phase::Classify,
                "C001",
                "Candidate no longer resolves to a node",
                Some(entity),
            )));
            continue;
        };
        let resolved = resolve_prefab(graph, node.prefab.as_ref(), entity, sink);
        let prefab_name = match resolved {
            Some((name, _)) => name.to_string(),
            None => node
                .prefab
                .as_ref()
                .map_or_else(|| "unknown".to_string(), |p| p.to_string()),
        };

        // An unresolvable own prefab counts as met; the edges still decide.
        let own =
            resolved.and_then(|(_, prefab)| unmet_service(prefab, Subject::Node(node), graph));
        if let Some(service) = own {
            sink.emit(Diagnostic::BrokenNode {
                node: entity,
                prefab_name: prefab_name.clone(),
                service,
            });
            if seen.insert(entity) {
                broken.push(BrokenNode {
                    node: entity,
                    prefab_name: prefab_name.clone(),
                    cause: BrokenCause::OwnPrefab { service },
                });
            }
        }

        let delegate = match mode {
            ClassifierMode::Refined => own.is_none() && !node.flags.local_connect,
            ClassifierMode::Legacy => true,
        };
        if !delegate {
            continue;
        }

        if let Some((edge, edge_prefab_name, service)) = first_broken_edge(graph, node, sink) {
            sink.emit(Diagnostic::BrokenEdge {
                node: entity,
                edge,
                edge_prefab_name: edge_prefab_name.clone(),
                service,
            });
            if seen.insert(entity) {
                broken.push(BrokenNode {
                    node: entity,
                    prefab_name,
                    cause: BrokenCause::Delegated {
                        edge,
                        edge_prefab_name,
                        service,
                    },
                });
            }
        }
    }

    broken
}

/// One level of delegation: the first incident edge whose own prefab is unmet.
fn first_broken_edge(
    graph: &NetGraph,
    node: &Node,
    sink: &mut dyn DiagnosticSink,
) -> Option<(Entity, String, Service)> {
    for &edge_id in node.incident_edges() {
        let Some(edge) = graph.edge(edge_id) else {
            sink.emit(Diagnostic::Skipped(DetectorError::new(
                Phase::Classify,
                "C001",
                format!("Connected edge of node {} does not resolve", node.id),
                Some(edge_id),
            )));
            continue;
        };
        let Some((name, prefab)) = resolve_prefab(graph, edge.prefab.as_ref(), edge_id, sink)
        else {
            continue;
        };
        if let Some(service) = unmet_service(prefab, Subject::Edge(edge), graph) {
            return Some((edge_id, name.to_string(), service));
        }
    }
    None
}

fn resolve_prefab<'g>(
    graph: &'g NetGraph,
    prefab: Option<&PrefabRef>,
    owner: Entity,
    sink: &mut dyn DiagnosticSink,
) -> Option<(&'g str, &'g Prefab)> {
    let prefab_ref = prefab?;
    match graph.prefabs().get(prefab_ref) {
        Some(prefab) => Some((prefab.name.as_str(), prefab)),
        None => {
            sink.emit(Diagnostic::Skipped(DetectorError::new(
                Phase::Classify,
                "C001",
                format!("Prefab '{}' does not resolve", prefab_ref),
                Some(owner),
            )));
            None
        }
    }
}
