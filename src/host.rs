//! Host scheduler surface the detector plugs into.

use serde::{Deserialize, Serialize};

use crate::net::graph::NetGraph;

/// Why data was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Purpose {
    NewGame,
    LoadGame,
    NewMap,
    LoadMap,
    Cleanup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameMode {
    Game,
    Editor,
    MainMenu,
}

/// A real play session, as opposed to the editor or a menu.
pub fn is_game_session(purpose: Purpose, mode: GameMode) -> bool {
    matches!(purpose, Purpose::NewGame | Purpose::LoadGame) && mode == GameMode::Game
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdatePhase {
    GameSimulation,
    Rendering,
}

/// A system driven by the host's update loop.
pub trait HostSystem {
    fn name(&self) -> &'static str;

    fn on_create(&mut self) {}

    fn on_update(&mut self, world: &mut NetGraph);

    fn on_loading_complete(&mut self, purpose: Purpose, mode: GameMode, world: &mut NetGraph) {
        let _ = (purpose, mode, world);
    }

    /// Whether `on_update` runs on ticks.
    fn enabled(&self) -> bool;
}

struct Registered {
    phase: UpdatePhase,
    system: Box<dyn HostSystem>,
}

/// Registry of systems per update phase.
#[derive(Default)]
pub struct UpdateSystem {
    systems: Vec<Registered>,
}

impl UpdateSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `system` to run at `phase`. The system is created immediately.
    pub fn update_at(&mut self, phase: UpdatePhase, mut system: Box<dyn HostSystem>) {
        system.on_create();
        self.systems.push(Registered { phase, system });
    }

    pub fn system_names(&self, phase: UpdatePhase) -> Vec<&'static str> {
        self.systems
            .iter()
            .filter(|r| r.phase == phase)
            .map(|r| r.system.name())
            .collect()
    }

    /// Run one tick of `phase`; disabled systems are not updated.
    pub fn tick(&mut self, phase: UpdatePhase, world: &mut NetGraph) -> usize {
        let mut ran = 0;
        for registered in self.systems.iter_mut().filter(|r| r.phase == phase) {
            if registered.system.enabled() {
                registered.system.on_update(world);
                ran += 1;
            }
        }
        ran
    }

    /// Deliver the loading-complete event to every system, enabled or not.
    pub fn loading_complete(&mut self, purpose: Purpose, mode: GameMode, world: &mut NetGraph) {
        for registered in &mut self.systems {
            registered.system.on_loading_complete(purpose, mode, world);
        }
    }
}
