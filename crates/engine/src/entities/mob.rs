//! Live mob instances.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use mudworld_domain::combat::regeneration_amount;
use mudworld_domain::{EffectList, LootDrop, MobInstanceId, MobTemplate, RoomId, StatBlock};
use tokio::sync::Mutex;

use super::visibility::{Perception, Visibility};

/// Outcome of one regeneration pulse on a mob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobPulse {
    /// Alive and healed by this many points.
    Healed(i32),
    /// Alive and already at full health.
    Full,
    /// Dead and still waiting for the respawn delay.
    Dead,
    /// Came back to life at full health.
    Respawned,
}

#[derive(Debug)]
struct MobState {
    hp: i32,
    effects: EffectList,
    dead_at: Option<DateTime<Utc>>,
    is_fighting: bool,
}

/// One spawned copy of a [`MobTemplate`], living in a single room.
#[derive(Debug)]
pub struct Mob {
    id: MobInstanceId,
    template: Arc<MobTemplate>,
    room: RoomId,
    state: Mutex<MobState>,
}

impl Mob {
    /// Copy the template into a new instance at full health with its own effect list.
    pub fn spawn(id: MobInstanceId, template: Arc<MobTemplate>, room: RoomId) -> Self {
        let state = MobState {
            hp: template.max_hp,
            effects: template.effects.clone(),
            dead_at: None,
            is_fighting: false,
        };
        Self {
            id,
            template,
            room,
            state: Mutex::new(state),
        }
    }

    pub fn id(&self) -> MobInstanceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    pub fn max_hp(&self) -> i32 {
        self.template.max_hp
    }

    pub fn experience(&self) -> i64 {
        self.template.experience
    }

    pub fn drops(&self) -> &[LootDrop] {
        &self.template.drops
    }

    pub async fn hp(&self) -> i32 {
        self.state.lock().await.hp
    }

    pub async fn is_alive(&self) -> bool {
        self.state.lock().await.hp > 0
    }

    pub async fn dead_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.dead_at
    }

    pub async fn is_fighting(&self) -> bool {
        self.state.lock().await.is_fighting
    }

    pub async fn set_fighting(&self, fighting: bool) {
        self.state.lock().await.is_fighting = fighting;
    }

    /// Natural attack: current Strength plus effect bonuses.
    pub async fn attack(&self) -> i32 {
        let state = self.state.lock().await;
        StatBlock::unequipped(&self.template.stats, &state.effects).natural_attack()
    }

    pub async fn defense(&self) -> i32 {
        let state = self.state.lock().await;
        StatBlock::unequipped(&self.template.stats, &state.effects).defense()
    }

    pub async fn visibility(&self) -> Visibility {
        let state = self.state.lock().await;
        Visibility::of(&StatBlock::unequipped(&self.template.stats, &state.effects))
    }

    /// Subtract `amount` from current HP and return what is left.
    pub async fn take_damage(&self, amount: i32) -> i32 {
        let mut state = self.state.lock().await;
        state.hp -= amount;
        state.hp
    }

    /// Record the time of death. Keeps the first timestamp if called twice.
    pub async fn die(&self, now: DateTime<Utc>) {
        let mut state = self.state.lock().await;
        state.is_fighting = false;
        if state.dead_at.is_none() {
            state.dead_at = Some(now);
        }
    }

    /// One regeneration step: heal the living, resurrect the long dead.
    pub async fn regenerate(&self, now: DateTime<Utc>, respawn_delay: Duration) -> MobPulse {
        let mut state = self.state.lock().await;
        let max_hp = self.template.max_hp;

        if state.hp <= 0 {
            let Some(dead_at) = state.dead_at else {
                return MobPulse::Dead;
            };
            let waited = now.signed_duration_since(dead_at).to_std().unwrap_or_default();
            if waited < respawn_delay {
                return MobPulse::Dead;
            }
            state.hp = max_hp;
            state.dead_at = None;
            state.effects = self.template.effects.clone();
            return MobPulse::Respawned;
        }

        if state.hp >= max_hp {
            return MobPulse::Full;
        }
        let healed = regeneration_amount(max_hp).min(max_hp - state.hp);
        state.hp += healed;
        MobPulse::Healed(healed)
    }

    /// "A rat is here." if alive and perceivable.
    pub async fn show_to(&self, perception: Perception) -> Option<String> {
        let state = self.state.lock().await;
        if state.hp <= 0 {
            return None;
        }
        let visibility = Visibility::of(&StatBlock::unequipped(&self.template.stats, &state.effects));
        perception
            .perceives(visibility)
            .then(|| format!("A {} is here.", self.template.name))
    }
}
