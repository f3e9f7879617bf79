//! Staging of edge marks into the deferred command buffer.

use super::classify::BrokenNode;
use crate::command::CommandBuffer;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::net::graph::{EdgeMarks, NetGraph};
use crate::net::types::Entity;

/// Stage highlight + batch-update marks on every incident edge of every
/// broken node. Returns the staged edges in staging order.
pub fn stage_highlights(
    graph: &NetGraph,
    broken: &[BrokenNode],
    buffer: &mut CommandBuffer,
    sink: &mut dyn DiagnosticSink,
) -> Vec<Entity> {
    let mut staged = Vec::new();

    for entry in broken {
        let Some(node) = graph.node(entry.node) else {
            continue;
        };
        let Some(edges) = &node.connected_edges else {
            continue;
        };
        for &edge in edges {
            buffer.add_marks(edge, EdgeMarks::HIGHLIGHTED | EdgeMarks::BATCHES_UPDATED);
            sink.emit(Diagnostic::EdgeHighlighted { edge });
            staged.push(edge);
        }
    }

    staged
}

/// Stage deletion of every edge missing its start or end node.
pub fn stage_missing_endpoint_deletions(
    graph: &NetGraph,
    buffer: &mut CommandBuffer,
    sink: &mut dyn DiagnosticSink,
) -> Vec<Entity> {
    let mut staged = Vec::new();

    for edge in graph.edges() {
        if edge.marks.contains(EdgeMarks::DELETED) || !edge.is_missing_endpoint() {
            continue;
        }
        buffer.add_marks(edge.id, EdgeMarks::DELETED);
        sink.emit(Diagnostic::EdgeMissingEndpoint { edge: edge.id });
        staged.push(edge.id);
    }

    staged
}
