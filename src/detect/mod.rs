//! Broken-node detection pass.
//!
//! Select candidates, classify them, then stage edge marks. The graph is only
//! read here; every mutation goes through the command buffer.

pub mod classify;
pub mod commit;
pub mod evaluate;
pub mod select;

use std::collections::BTreeSet;

use serde::Serialize;

pub use classify::{BrokenCause, BrokenNode};

use crate::command::{CommandBuffer, PlaybackSummary};
use crate::config::DetectorConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::net::graph::NetGraph;
use crate::net::types::Entity;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassReport {
    pub candidates: usize,
    pub broken: Vec<BrokenNode>,
    /// Edges staged for highlight, sorted and without repeats.
    pub marked_edges: Vec<Entity>,
    pub deleted_edges: Vec<Entity>,
}

/// Run the scan and stage its results into `buffer`.
pub fn run_pass(
    graph: &NetGraph,
    config: &DetectorConfig,
    buffer: &mut CommandBuffer,
    sink: &mut dyn DiagnosticSink,
) -> PassReport {
    let mut report = PassReport::default();

    if config.delete_edges_missing_endpoint {
        report.deleted_edges = commit::stage_missing_endpoint_deletions(graph, buffer, sink);
    }

    sink.emit(Diagnostic::PassStarted);

    let selection = select::select_candidates(graph, config.classifier);
    for skipped in selection.skipped {
        sink.emit(Diagnostic::Skipped(skipped));
    }
    if selection.candidates.is_empty() {
        sink.emit(Diagnostic::NoCandidates);
        return report;
    }
    report.candidates = selection.candidates.len();
    sink.emit(Diagnostic::Candidates {
        count: report.candidates,
    });

    report.broken = classify::classify(graph, &selection.candidates, config.classifier, sink);

    if report.broken.is_empty() {
        sink.emit(Diagnostic::NoBrokenNodes);
    } else {
        sink.emit(Diagnostic::Highlighting {
            broken: report.broken.len(),
        });
        let staged = commit::stage_highlights(graph, &report.broken, buffer, sink);
        report.marked_edges = staged.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    }

    sink.emit(Diagnostic::PassFinished {
        broken: report.broken.len(),
        marked_edges: report.marked_edges.len(),
    });

    report
}

/// Run the pass and apply the staged commands in one playback.
pub fn run_and_commit(
    graph: &mut NetGraph,
    config: &DetectorConfig,
    sink: &mut dyn DiagnosticSink,
) -> (PassReport, PlaybackSummary) {
    let mut buffer = CommandBuffer::new();
    let report = run_pass(graph, config, &mut buffer, sink);
    let summary = buffer.playback(graph, sink);
    (report, summary)
}
