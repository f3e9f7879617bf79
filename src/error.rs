//! Unified detector error type used across all phases.

use thiserror::Error;

use crate::net::types::Entity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Load,
    Select,
    Classify,
    Commit,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Load => write!(f, "Load"),
            Phase::Select => write!(f, "Select"),
            Phase::Classify => write!(f, "Classify"),
            Phase::Commit => write!(f, "Commit"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetectorError {
    pub code: String,
    pub phase: Phase,
    pub message: String,
    pub entity: Option<Entity>,
}

impl std::fmt::Display for DetectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.entity {
            Some(entity) => write!(
                f,
                "[{}:{}] {} (entity '{}')",
                self.phase, self.code, self.message, entity
            ),
            None => write!(f, "[{}:{}] {}", self.phase, self.code, self.message),
        }
    }
}

impl std::error::Error for DetectorError {}

impl DetectorError {
    pub fn new(phase: Phase, code: &str, message: impl Into<String>, entity: Option<Entity>) -> Self {
        DetectorError {
            code: code.into(),
            phase,
            message: message.into(),
            entity,
        }
    }
}

impl From<StoreError> for DetectorError {
    fn from(e: StoreError) -> Self {
        let entity = match &e {
            StoreError::StaleEntity(entity) | StoreError::NotAnEdge(entity) => Some(*entity),
        };
        DetectorError::new(Phase::Commit, "M001", e.to_string(), entity)
    }
}

/// Failures raised by the graph store when a write targets a bad entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("entity {0} does not exist or has been replaced")]
    StaleEntity(Entity),
    #[error("entity {0} is not an edge")]
    NotAnEdge(Entity),
}
