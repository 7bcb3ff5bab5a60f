//! Test fixtures: recording ports and a small sample world.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::{sample_assets, RecordingNotifier};
//!
//! let notifier = Arc::new(RecordingNotifier::new());
//! let assets = sample_assets();
//! ```

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use mudworld_domain::{
    AreaId, Direction, Item, MobTemplate, MobTemplateId, Stat, Stats, UserId,
};

use crate::infrastructure::ports::{
    AreaFile, AssetError, AssetSource, NeighbourDef, NotifierPort, NotifyError, RoomDef,
};

// =============================================================================
// Recording Notifier
// =============================================================================

/// Notifier that keeps every delivered line, in order.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(UserId, String)>>,
    failing: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose deliveries always fail (nothing is recorded).
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn messages_for(&self, user_id: &UserId) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| to == user_id)
            .map(|(_, message)| message.clone())
            .collect()
    }

    /// Whether any line delivered to `user_id` contains `needle`.
    pub fn received(&self, user_id: &UserId, needle: &str) -> bool {
        self.messages_for(user_id)
            .iter()
            .any(|message| message.contains(needle))
    }

    pub fn clear(&self) {
        self.messages.lock().unwrap().clear();
    }
}

#[async_trait]
impl NotifierPort for RecordingNotifier {
    async fn notify(&self, user_id: &UserId, message: &str) -> Result<(), NotifyError> {
        if self.failing {
            return Err(NotifyError::Unreachable(user_id.to_string()));
        }
        self.messages
            .lock()
            .unwrap()
            .push((user_id.clone(), message.to_string()));
        Ok(())
    }
}

// =============================================================================
// Static Assets
// =============================================================================

/// Asset source serving fixed, in-memory data.
pub struct StaticAssets {
    pub mobs: Vec<MobTemplate>,
    pub areas: Vec<AreaFile>,
}

#[async_trait]
impl AssetSource for StaticAssets {
    async fn load_mob_templates(&self) -> Result<Vec<MobTemplate>, AssetError> {
        Ok(self.mobs.clone())
    }

    async fn load_areas(&self) -> Result<Vec<AreaFile>, AssetError> {
        Ok(self.areas.clone())
    }
}

pub fn rat() -> MobTemplate {
    MobTemplate::new("rat", "rat", 10)
        .with_stats(Stats::new().with(Stat::Strength, 2))
        .with_experience(5)
        .with_drop(Item::new("rat_tail", "rat tail"), 10_000)
}

pub fn wolf() -> MobTemplate {
    MobTemplate::new("wolf", "wolf", 30)
        .with_stats(
            Stats::new()
                .with(Stat::Strength, 6)
                .with(Stat::Constitution, 2),
        )
        .with_experience(20)
}

pub fn room_def(
    id: &str,
    name: &str,
    mobs: &[&str],
    neighbours: Vec<(Direction, NeighbourDef)>,
) -> RoomDef {
    RoomDef {
        id: id.to_string(),
        name: name.to_string(),
        short_description: format!("{name}, briefly."),
        long_description: format!("{name}, at length."),
        mobs: mobs.iter().map(|m| MobTemplateId::new(*m)).collect(),
        neighbours: neighbours.into_iter().collect::<BTreeMap<_, _>>(),
    }
}

/// Two areas:
///
/// ```text
///   midgaard: vault =(locked)= square ---- temple (default)
///                                |   \         |(hidden, up)
///                                |    \      attic
///   forest:                   path     (rat in square, wolf on path)
/// ```
pub fn sample_areas() -> Vec<AreaFile> {
    vec![
        AreaFile {
            id: AreaId::new("midgaard"),
            rooms: vec![
                room_def(
                    "temple",
                    "The Temple",
                    &[],
                    vec![
                        (Direction::North, NeighbourDef::to("square")),
                        (Direction::Up, NeighbourDef::to("attic").hidden()),
                    ],
                ),
                room_def(
                    "square",
                    "Market Square",
                    &["rat"],
                    vec![
                        (Direction::South, NeighbourDef::to("temple")),
                        (Direction::North, NeighbourDef::to("vault").locked("vault_key")),
                        (Direction::East, NeighbourDef::to("__EXT__forest_path")),
                    ],
                ),
                room_def(
                    "vault",
                    "The Vault",
                    &[],
                    vec![(Direction::South, NeighbourDef::to("square"))],
                ),
                room_def(
                    "attic",
                    "Dusty Attic",
                    &[],
                    vec![(Direction::Down, NeighbourDef::to("temple"))],
                ),
            ],
        },
        AreaFile {
            id: AreaId::new("forest"),
            rooms: vec![room_def(
                "path",
                "Forest Path",
                &["wolf"],
                vec![(Direction::West, NeighbourDef::to("__EXT__midgaard_square"))],
            )],
        },
    ]
}

pub fn sample_assets() -> StaticAssets {
    StaticAssets {
        mobs: vec![rat(), wolf()],
        areas: sample_areas(),
    }
}
