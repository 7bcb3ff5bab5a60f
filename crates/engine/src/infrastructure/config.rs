//! World configuration

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use mudworld_domain::RoomId;

/// Tunables for the live world, loaded from environment
#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Directory holding `mobs/*.json` and `areas/*.json`
    pub assets_path: PathBuf,
    /// Directory backing the file key-value store
    pub data_path: PathBuf,
    /// Where new players start and dead players wake up
    pub default_room: RoomId,
    /// Key the player snapshot is stored under
    pub snapshot_key: String,

    /// Interval between battle turns
    pub battle_tick: Duration,
    /// Interval between regeneration pulses (players and mobs)
    pub regen_interval: Duration,
    /// How long a dead mob stays dead
    pub mob_respawn_delay: Duration,
    /// Regeneration multiplier while resting in the default room
    pub safe_room_regen_multiplier: i32,
    /// Pause between two rooms visited by the garbage collector
    pub gc_interval: Duration,
    /// How long a shout ID is remembered by a room
    pub shout_lifespan: Duration,
    /// Interval between two autosaves
    pub autosave_interval: Duration,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            assets_path: PathBuf::from("./assets"),
            data_path: PathBuf::from("./data"),
            default_room: RoomId::new("midgaard_temple"),
            snapshot_key: "players".to_string(),
            battle_tick: Duration::from_secs(5),
            regen_interval: Duration::from_secs(60),
            mob_respawn_delay: Duration::from_secs(5 * 60),
            safe_room_regen_multiplier: 3,
            gc_interval: Duration::from_secs(1),
            shout_lifespan: Duration::from_secs(10),
            autosave_interval: Duration::from_secs(30 * 60),
        }
    }
}

impl WorldConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            assets_path: env::var("MUD_ASSETS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_path),
            data_path: env::var("MUD_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            default_room: env::var("MUD_DEFAULT_ROOM")
                .map(RoomId::new)
                .unwrap_or(defaults.default_room),
            snapshot_key: env::var("MUD_SNAPSHOT_KEY").unwrap_or(defaults.snapshot_key),

            battle_tick: duration_ms("MUD_BATTLE_TICK_MS", defaults.battle_tick)?,
            regen_interval: duration_ms("MUD_REGEN_INTERVAL_MS", defaults.regen_interval)?,
            mob_respawn_delay: duration_ms("MUD_MOB_RESPAWN_DELAY_MS", defaults.mob_respawn_delay)?,
            safe_room_regen_multiplier: parsed(
                "MUD_SAFE_ROOM_REGEN_MULTIPLIER",
                defaults.safe_room_regen_multiplier,
            )?,
            gc_interval: duration_ms("MUD_GC_INTERVAL_MS", defaults.gc_interval)?,
            shout_lifespan: duration_ms("MUD_SHOUT_LIFESPAN_MS", defaults.shout_lifespan)?,
            autosave_interval: duration_ms("MUD_AUTOSAVE_INTERVAL_MS", defaults.autosave_interval)?,
        })
    }
}

fn parsed<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn duration_ms(key: &str, default: Duration) -> Result<Duration> {
    let millis = parsed(key, u64::try_from(default.as_millis()).unwrap_or(u64::MAX))?;
    Ok(Duration::from_millis(millis))
}
