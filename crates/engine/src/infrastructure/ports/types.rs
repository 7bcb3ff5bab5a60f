//! Data shapes crossing the asset port.
//!
//! These mirror the declarative area files one-to-one; the world loader turns
//! them into the live room graph.

use std::collections::BTreeMap;

use mudworld_domain::{AreaId, Direction, MobTemplateId};
use serde::{Deserialize, Serialize};

/// Prefix marking a neighbour reference that points into another area.
pub const EXTERNAL_ROOM_PREFIX: &str = "__EXT__";

/// One area file: a named group of rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaFile {
    #[serde(rename = "area_id")]
    pub id: AreaId,
    #[serde(default)]
    pub rooms: Vec<RoomDef>,
}

/// A room as written in an area file. `id` is local to the area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub mobs: Vec<MobTemplateId>,
    #[serde(default)]
    pub neighbours: BTreeMap<Direction, NeighbourDef>,
}

/// A door as written in an area file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighbourDef {
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_invisible: bool,
    #[serde(default)]
    pub is_locked: bool,
    /// Same-area local ID, or `__EXT__<full room id>` for another area.
    #[serde(rename = "id")]
    pub room: String,
    #[serde(default)]
    pub key_id: Option<String>,
}

impl NeighbourDef {
    pub fn to(room: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            ..Self::default()
        }
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    pub fn invisible(mut self) -> Self {
        self.is_invisible = true;
        self
    }

    pub fn locked(mut self, key_id: impl Into<String>) -> Self {
        self.is_locked = true;
        self.key_id = Some(key_id.into());
        self
    }
}
