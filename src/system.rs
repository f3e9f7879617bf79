//! The one-shot broken-node system and its module entry point.

use crate::command::{CommandBuffer, PlaybackSummary};
use crate::config::DetectorConfig;
use crate::detect::{self, PassReport};
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::host::{GameMode, HostSystem, Purpose, UpdatePhase, UpdateSystem, is_game_session};
use crate::net::graph::NetGraph;

/// Runs the detection pass once per loading-complete event. Never enabled for
/// ticks.
pub struct FindBrokenNodesSystem<S: DiagnosticSink = TracingSink> {
    config: DetectorConfig,
    sink: S,
    enabled: bool,
    last_report: Option<PassReport>,
    last_playback: Option<PlaybackSummary>,
}

impl FindBrokenNodesSystem<TracingSink> {
    pub fn new(config: DetectorConfig) -> Self {
        Self::with_sink(config, TracingSink)
    }
}

impl<S: DiagnosticSink> FindBrokenNodesSystem<S> {
    pub fn with_sink(config: DetectorConfig, sink: S) -> Self {
        FindBrokenNodesSystem {
            config,
            sink,
            enabled: true,
            last_report: None,
            last_playback: None,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn last_report(&self) -> Option<&PassReport> {
        self.last_report.as_ref()
    }

    pub fn last_playback(&self) -> Option<PlaybackSummary> {
        self.last_playback
    }
}

impl<S: DiagnosticSink> HostSystem for FindBrokenNodesSystem<S> {
    fn name(&self) -> &'static str {
        "FindBrokenNodesSystem"
    }

    fn on_create(&mut self) {
        tracing::info!(target: "broken_segment_detector", "FindBrokenNodesSystem.on_create");
        self.enabled = false;
    }

    fn on_update(&mut self, _world: &mut NetGraph) {}

    fn on_loading_complete(&mut self, purpose: Purpose, mode: GameMode, world: &mut NetGraph) {
        if self.config.require_game_mode && !is_game_session(purpose, mode) {
            self.sink.emit(Diagnostic::PassSkipped { purpose, mode });
            return;
        }

        // End-of-frame barrier: the buffer is played back once the pass returns.
        let mut buffer = CommandBuffer::new();
        let report = detect::run_pass(world, &self.config, &mut buffer, &mut self.sink);
        let playback = buffer.playback(world, &mut self.sink);

        self.last_report = Some(report);
        self.last_playback = Some(playback);
    }

    fn enabled(&self) -> bool {
        self.enabled
    }
}

/// Module entry point: registers the detector with the host.
#[derive(Debug, Clone, Default)]
pub struct DetectorMod {
    pub config: DetectorConfig,
}

impl DetectorMod {
    pub fn new(config: DetectorConfig) -> Self {
        DetectorMod { config }
    }

    pub fn on_load(&self, updates: &mut UpdateSystem) {
        tracing::info!(target: "broken_segment_detector", "on_load");
        updates.update_at(
            UpdatePhase::GameSimulation,
            Box::new(FindBrokenNodesSystem::new(self.config.clone())),
        );
    }

    pub fn on_dispose(&self) {
        tracing::info!(target: "broken_segment_detector", "on_dispose");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;

    #[test]
    fn starts_disabled_after_create() {
        let mut system = FindBrokenNodesSystem::with_sink(DetectorConfig::default(), MemorySink::new());
        system.on_create();
        assert!(!system.enabled());
    }

    #[test]
    fn editor_load_is_a_no_op() {
        let mut system = FindBrokenNodesSystem::with_sink(DetectorConfig::default(), MemorySink::new());
        system.on_create();
        let mut world = NetGraph::default();

        system.on_loading_complete(Purpose::LoadMap, GameMode::Editor, &mut world);

        assert!(system.last_report().is_none());
        assert!(system.sink().any(|d| matches!(d, Diagnostic::PassSkipped { .. })));
    }

    #[test]
    fn game_mode_gate_can_be_lifted() {
        let config = DetectorConfig {
            require_game_mode: false,
            ..Default::default()
        };
        let mut system = FindBrokenNodesSystem::with_sink(config, MemorySink::new());
        let mut world = NetGraph::default();

        system.on_loading_complete(Purpose::LoadMap, GameMode::Editor, &mut world);

        assert!(system.last_report().is_some());
    }

    #[test]
    fn mod_registers_at_game_simulation() {
        let mut updates = UpdateSystem::new();
        DetectorMod::default().on_load(&mut updates);
        assert_eq!(
            updates.system_names(UpdatePhase::GameSimulation),
            vec!["FindBrokenNodesSystem"]
        );
        let mut world = NetGraph::default();
        assert_eq!(updates.tick(UpdatePhase::GameSimulation, &mut world), 0);
    }
}
