//! Deferred command buffer.
//!
//! Mutations are recorded while the graph is only borrowed for reading and
//! applied in one playback once the scan is over.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::DetectorError;
use crate::net::graph::{EdgeMarks, NetGraph};
use crate::net::types::Entity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddMarks { edge: Entity, marks: EdgeMarks },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub applied: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    commands: Vec<Command>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_marks(&mut self, edge: Entity, marks: EdgeMarks) {
        self.commands.push(Command::AddMarks { edge, marks });
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Apply every command in recording order. Commands against stale or
    /// non-edge entities are skipped and reported.
    pub fn playback(self, graph: &mut NetGraph, sink: &mut dyn DiagnosticSink) -> PlaybackSummary {
        let mut summary = PlaybackSummary::default();
        for command in self.commands {
            match command {
                Command::AddMarks { edge, marks } => match graph.edge_mut(edge) {
                    Ok(target) => {
                        target.marks.insert(marks);
                        summary.applied += 1;
                    }
                    Err(e) => {
                        sink.emit(Diagnostic::CommandRejected(DetectorError::from(e)));
                        summary.skipped += 1;
                    }
                },
            }
        }
        summary
    }
}
