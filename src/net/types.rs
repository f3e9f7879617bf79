//! Serde types for a loaded network snapshot.
//!
//! A snapshot is the complete node/edge/prefab state handed over by the host
//! once loading has finished. Entity references use the host's `index:version`
//! notation; a null reference is `null` or an omitted field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// ENTITY IDENTITY
// =============================================================================

/// Stable entity identity. The version is bumped by the host whenever an
/// index is recycled, so a reference with an old version is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Entity {
    pub index: u32,
    pub version: u32,
}

impl Entity {
    pub const fn new(index: u32, version: u32) -> Self {
        Entity { index, version }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.index, self.version)
    }
}

impl FromStr for Entity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, version) = s
            .split_once(':')
            .ok_or_else(|| format!("entity '{}' must be written as index:version", s))?;
        let index = index
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("entity '{}' has an invalid index: {}", s, e))?;
        let version = version
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("entity '{}' has an invalid version: {}", s, e))?;
        Ok(Entity { index, version })
    }
}

impl TryFrom<String> for Entity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Entity> for String {
    fn from(entity: Entity) -> Self {
        entity.to_string()
    }
}

/// Reference from a node or edge to its static prefab definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefabRef(pub String);

impl PrefabRef {
    pub fn new(id: impl Into<String>) -> Self {
        PrefabRef(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrefabRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// COMPOSITION FLAGS
// =============================================================================

/// Segment-wide composition bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneralFlags(pub u32);

impl GeneralFlags {
    pub const NONE: GeneralFlags = GeneralFlags(0);
    pub const NODE: GeneralFlags = GeneralFlags(1 << 0);
    pub const EDGE: GeneralFlags = GeneralFlags(1 << 1);
    pub const INVERT: GeneralFlags = GeneralFlags(1 << 2);
    pub const FLIP: GeneralFlags = GeneralFlags(1 << 3);
    pub const DEAD_END: GeneralFlags = GeneralFlags(1 << 4);
    pub const INTERSECTION: GeneralFlags = GeneralFlags(1 << 5);
    pub const ROUNDABOUT: GeneralFlags = GeneralFlags(1 << 6);
    pub const ELEVATED: GeneralFlags = GeneralFlags(1 << 7);
    pub const TUNNEL: GeneralFlags = GeneralFlags(1 << 8);
    pub const LIGHTING: GeneralFlags = GeneralFlags(1 << 9);
    pub const WIDE_MEDIAN: GeneralFlags = GeneralFlags(1 << 10);
    pub const CROSSWALK: GeneralFlags = GeneralFlags(1 << 11);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: GeneralFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for GeneralFlags {
    type Output = GeneralFlags;

    fn bitor(self, rhs: GeneralFlags) -> GeneralFlags {
        GeneralFlags(self.0 | rhs.0)
    }
}

/// Per-side composition bits (left or right half of a segment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SideFlags(pub u32);

impl SideFlags {
    pub const NONE: SideFlags = SideFlags(0);
    pub const RAISED: SideFlags = SideFlags(1 << 0);
    pub const LOWERED: SideFlags = SideFlags(1 << 1);
    pub const SIDEWALK: SideFlags = SideFlags(1 << 2);
    pub const TREES: SideFlags = SideFlags(1 << 3);
    pub const SOUND_BARRIER: SideFlags = SideFlags(1 << 4);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// General/left/right composition triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CompositionFlags {
    #[serde(default)]
    pub general: GeneralFlags,
    #[serde(default)]
    pub left: SideFlags,
    #[serde(default)]
    pub right: SideFlags,
}

impl CompositionFlags {
    pub fn general(general: GeneralFlags) -> Self {
        CompositionFlags {
            general,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.general.is_empty() && self.left.is_empty() && self.right.is_empty()
    }

    pub fn has_lighting(&self) -> bool {
        self.general.contains(GeneralFlags::LIGHTING)
    }
}

/// The composition a connection point demands before it counts as served.
pub type ConnectionRequirement = CompositionFlags;

/// Services a node can be connected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Service {
    Electricity,
    WaterPipe,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Electricity => write!(f, "electricity"),
            Service::WaterPipe => write!(f, "water pipe"),
        }
    }
}

// =============================================================================
// SNAPSHOT RECORDS
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSnapshot {
    #[serde(default)]
    pub prefabs: Vec<PrefabRecord>,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefabRecord {
    pub id: PrefabRef,
    pub name: String,
    /// Electricity connection requirement, if the prefab defines one.
    #[serde(default)]
    pub electricity: Option<ConnectionRequirement>,
    #[serde(default)]
    pub water_pipe: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: Entity,
    #[serde(default)]
    pub prefab: Option<PrefabRef>,
    /// Ordered incident edges. `None` means the node has no edge buffer at all.
    #[serde(default)]
    pub connected_edges: Option<Vec<Entity>>,
    #[serde(default)]
    pub electricity_connected: bool,
    #[serde(default)]
    pub water_connected: bool,
    #[serde(default)]
    pub marker: bool,
    #[serde(default)]
    pub editor_only: bool,
    #[serde(default)]
    pub waterway: bool,
    #[serde(default)]
    pub local_connect: bool,
    #[serde(default)]
    pub owner: Option<Entity>,
    #[serde(default)]
    pub upgrade: Option<CompositionFlags>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    pub id: Entity,
    #[serde(default)]
    pub start: Option<Entity>,
    #[serde(default)]
    pub end: Option<Entity>,
    #[serde(default)]
    pub prefab: Option<PrefabRef>,
    #[serde(default)]
    pub upgrade: Option<CompositionFlags>,
    #[serde(default)]
    pub water_connected: bool,
}
