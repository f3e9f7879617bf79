//! Diagnostic event stream.
//!
//! Components report progress through a [`DiagnosticSink`] handed to them by
//! the caller. [`TracingSink`] forwards to `tracing`; [`MemorySink`] keeps the
//! events for inspection.

use std::fmt;

use crate::error::DetectorError;
use crate::host::{GameMode, Purpose};
use crate::net::types::{Entity, Service};

#[derive(Debug, Clone)]
pub enum Diagnostic {
    PassSkipped { purpose: Purpose, mode: GameMode },
    PassStarted,
    EdgeMissingEndpoint { edge: Entity },
    NoCandidates,
    Candidates { count: usize },
    Skipped(DetectorError),
    BrokenNode {
        node: Entity,
        prefab_name: String,
        service: Service,
    },
    BrokenEdge {
        node: Entity,
        edge: Entity,
        edge_prefab_name: String,
        service: Service,
    },
    NoBrokenNodes,
    Highlighting { broken: usize },
    EdgeHighlighted { edge: Entity },
    CommandRejected(DetectorError),
    PassFinished { broken: usize, marked_edges: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::PassSkipped { purpose, mode } => {
                write!(f, "Skipped: not a game session ({:?} in {:?} mode).", purpose, mode)
            }
            Diagnostic::PassStarted => write!(f, "Starting. . ."),
            Diagnostic::EdgeMissingEndpoint { edge } => {
                write!(f, "Deleted edge with no connected node. Entity {}.", edge)
            }
            Diagnostic::NoCandidates => write!(f, "No potentially broken nodes detected."),
            Diagnostic::Candidates { count } => {
                write!(f, "Evaluating {} potentially broken nodes:", count)
            }
            Diagnostic::Skipped(e) => write!(f, "Skipped {}", e),
            Diagnostic::BrokenNode {
                node,
                prefab_name,
                service,
            } => write!(
                f,
                "Found broken node {}. Broken node is a {} missing {}.",
                node, prefab_name, service
            ),
            Diagnostic::BrokenEdge {
                node,
                edge,
                edge_prefab_name,
                service,
            } => write!(
                f,
                "Found broken node {}. Broken edge {} is a {} missing {}.",
                node, edge, edge_prefab_name, service
            ),
            Diagnostic::NoBrokenNodes => write!(f, "No broken nodes detected."),
            Diagnostic::Highlighting { broken } => write!(
                f,
                "Highlighting connected edges of {} broken nodes:",
                broken
            ),
            Diagnostic::EdgeHighlighted { edge } => write!(f, "Highlighted {}.", edge),
            Diagnostic::CommandRejected(e) => write!(f, "Command rejected {}", e),
            Diagnostic::PassFinished {
                broken,
                marked_edges,
            } => write!(
                f,
                "Finished. {} broken nodes, {} edges marked.",
                broken, marked_edges
            ),
        }
    }
}

/// Observer for detector diagnostics.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::Skipped(e) | Diagnostic::CommandRejected(e) => tracing::warn!(
                target: "broken_segment_detector",
                code = %e.code,
                entity = ?e.entity.map(|entity| entity.to_string()),
                "{}",
                diagnostic
            ),
            Diagnostic::EdgeHighlighted { edge } => tracing::debug!(
                target: "broken_segment_detector",
                edge = %edge,
                "{}",
                diagnostic
            ),
            Diagnostic::BrokenNode { node, .. } | Diagnostic::BrokenEdge { node, .. } => {
                tracing::info!(
                    target: "broken_segment_detector",
                    node = %node,
                    "{}",
                    diagnostic
                )
            }
            _ => tracing::info!(target: "broken_segment_detector", "{}", diagnostic),
        }
    }
}

/// Records every diagnostic in emission order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub events: Vec<Diagnostic>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(|d| d.to_string()).collect()
    }

    pub fn any(&self, predicate: impl Fn(&Diagnostic) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.events.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        sink.emit(Diagnostic::PassStarted);
        sink.emit(Diagnostic::NoCandidates);
        assert_eq!(
            sink.lines(),
            vec!["Starting. . .", "No potentially broken nodes detected."]
        );
    }

    #[test]
    fn broken_node_line_names_prefab() {
        let line = Diagnostic::BrokenNode {
            node: Entity::new(7, 1),
            prefab_name: "Pipe Junction".into(),
            service: Service::WaterPipe,
        }
        .to_string();
        assert!(line.contains("7:1"));
        assert!(line.contains("Pipe Junction"));
        assert!(line.contains("water pipe"));
    }
}
