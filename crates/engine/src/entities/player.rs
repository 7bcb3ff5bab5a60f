//! Live player characters.
//!
//! A `Player` pairs the persistent [`PlayerState`] with the capabilities the
//! world injects at creation or restore time: a notification sink and a way
//! to start fights. Only the state is ever serialized.

use std::sync::Arc;

use async_trait::async_trait;
use mudworld_domain::combat::regeneration_amount;
use mudworld_domain::{
    EffectList, Item, PlayerClass, PlayerEquipment, Race, RoomId, Stat, StatBlock, Stats, UserId,
};
use tokio::sync::RwLock;

use super::mob::Mob;
use super::visibility::{Perception, Visibility};
use crate::infrastructure::ports::NotifierPort;

pub const STARTING_MAX_HP: i32 = 100;
pub const STARTING_STAT: i32 = 10;

/// Starts (or joins) a fight between a player and a mob.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BattleRequester: Send + Sync {
    async fn request_battle(&self, player: Arc<Player>, mob: Arc<Mob>);
}

/// Everything about a player that survives a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub name: String,
    pub stats: Stats,
    pub class: PlayerClass,
    pub race: Race,
    pub level: i32,
    pub experience: i64,
    pub is_sleeping: bool,
    pub is_fighting: bool,
    pub inventory: Vec<Item>,
    pub equipment: PlayerEquipment,
    pub effects: EffectList,
    pub room: RoomId,
    pub hp: i32,
    pub max_hp: i32,
}

impl PlayerState {
    /// A level 1 character standing in `room`.
    pub fn new_character(name: impl Into<String>, room: RoomId) -> Self {
        let stats = Stat::all()
            .into_iter()
            .map(|stat| (stat, STARTING_STAT))
            .collect();
        Self {
            name: name.into(),
            stats,
            class: PlayerClass::default(),
            race: Race::default(),
            level: 1,
            experience: 0,
            is_sleeping: false,
            is_fighting: false,
            inventory: Vec::new(),
            equipment: PlayerEquipment::new(),
            effects: EffectList::new(),
            room,
            hp: STARTING_MAX_HP,
            max_hp: STARTING_MAX_HP,
        }
    }

    pub fn stat_block(&self) -> StatBlock<'_> {
        StatBlock::equipped(&self.stats, &self.equipment, &self.effects)
    }
}

/// Which verb a room uses when relaying speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speech {
    Say,
    Shout,
}

impl Speech {
    fn verb(&self) -> &'static str {
        match self {
            Self::Say => "says",
            Self::Shout => "shouts",
        }
    }
}

pub struct Player {
    user_id: UserId,
    state: RwLock<PlayerState>,
    notifier: Arc<dyn NotifierPort>,
    battles: Arc<dyn BattleRequester>,
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

impl Player {
    pub fn new(
        user_id: UserId,
        state: PlayerState,
        notifier: Arc<dyn NotifierPort>,
        battles: Arc<dyn BattleRequester>,
    ) -> Self {
        Self {
            user_id,
            state: RwLock::new(state),
            notifier,
            battles,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Deliver one line to this player. Failures are logged, never returned.
    pub async fn notify(&self, message: &str) {
        if let Err(e) = self.notifier.notify(&self.user_id, message).await {
            tracing::warn!(user_id = %self.user_id, error = %e, "Failed to notify player");
        }
    }

    pub async fn request_battle(self: &Arc<Self>, mob: Arc<Mob>) {
        self.battles.request_battle(Arc::clone(self), mob).await;
    }

    pub async fn snapshot(&self) -> PlayerState {
        self.state.read().await.clone()
    }

    pub async fn name(&self) -> String {
        self.state.read().await.name.clone()
    }

    pub async fn room(&self) -> RoomId {
        self.state.read().await.room.clone()
    }

    pub async fn set_room(&self, room: RoomId) {
        self.state.write().await.room = room;
    }

    pub async fn hp(&self) -> i32 {
        self.state.read().await.hp
    }

    pub async fn is_alive(&self) -> bool {
        self.state.read().await.hp > 0
    }

    pub async fn is_sleeping(&self) -> bool {
        self.state.read().await.is_sleeping
    }

    /// Returns the previous value.
    pub async fn set_sleeping(&self, sleeping: bool) -> bool {
        std::mem::replace(&mut self.state.write().await.is_sleeping, sleeping)
    }

    pub async fn is_fighting(&self) -> bool {
        self.state.read().await.is_fighting
    }

    pub async fn set_fighting(&self, fighting: bool) {
        self.state.write().await.is_fighting = fighting;
    }

    pub async fn perception(&self) -> Perception {
        Perception::of(&self.state.read().await.stat_block())
    }

    pub async fn visibility(&self) -> Visibility {
        Visibility::of(&self.state.read().await.stat_block())
    }

    /// Both hands combined.
    pub async fn attack(&self) -> i32 {
        self.state.read().await.stat_block().total_attack()
    }

    pub async fn defense(&self) -> i32 {
        self.state.read().await.stat_block().defense()
    }

    /// Subtract `amount` from current HP and return what is left.
    pub async fn take_damage(&self, amount: i32) -> i32 {
        let mut state = self.state.write().await;
        state.hp -= amount;
        state.hp
    }

    /// Bring a fallen player back with `hp` health, capped at max.
    pub async fn revive(&self, hp: i32) {
        let mut state = self.state.write().await;
        state.hp = hp.min(state.max_hp);
        state.is_fighting = false;
    }

    /// Heal by the regeneration amount times `multiplier`. Returns HP gained.
    pub async fn regenerate(&self, multiplier: i32) -> i32 {
        let mut state = self.state.write().await;
        if state.hp <= 0 || state.hp >= state.max_hp {
            return 0;
        }
        let healed = (regeneration_amount(state.max_hp) * multiplier).min(state.max_hp - state.hp);
        state.hp += healed;
        healed
    }

    pub async fn gain_experience(&self, amount: i64) {
        self.state.write().await.experience += amount;
    }

    pub async fn add_item(&self, item: Item) {
        self.state.write().await.inventory.push(item);
    }

    /// "Alice is here." if the observer can notice this player.
    pub async fn show_to(&self, perception: Perception) -> Option<String> {
        let state = self.state.read().await;
        perception
            .perceives(Visibility::of(&state.stat_block()))
            .then(|| format!("{} is here.", state.name))
    }

    /// Relay speech from someone else in range.
    pub async fn hear(&self, speaker: &str, speech: Speech, message: &str, visibility: Visibility) {
        let line = {
            let state = self.state.read().await;
            if state.is_sleeping {
                return;
            }
            let who = if Perception::of(&state.stat_block()).perceives(visibility) {
                speaker
            } else {
                "Someone"
            };
            format!("{who} {}: {message}", speech.verb())
        };
        self.notify(&line).await;
    }

    /// Tell an awake observer about someone coming or going.
    pub async fn witness(&self, line: &str, visibility: Visibility) {
        let noticed = {
            let state = self.state.read().await;
            !state.is_sleeping && Perception::of(&state.stat_block()).perceives(visibility)
        };
        if noticed {
            self.notify(line).await;
        }
    }

    /// Character sheet.
    pub async fn status(&self) -> String {
        let state = self.state.read().await;
        let stats = state.stat_block();
        let attributes = Stat::all()
            .into_iter()
            .map(|stat| format!("{stat} {}", stats.current_stat(stat)))
            .collect::<Vec<_>>()
            .join("  ");
        let equipped = if state.equipment.is_empty() {
            "nothing".to_string()
        } else {
            state
                .equipment
                .iter()
                .map(|(slot, equipment)| format!("{} ({})", equipment.item.name, slot.display_name()))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "{name}, level {level} {race} {class}\n\
             HP {hp}/{max_hp}  Experience {experience}\n\
             {attributes}\n\
             Attack {attack}  Defense {defense}\n\
             Equipped: {equipped}\n\
             Carrying {items} item(s)",
            name = state.name,
            level = state.level,
            race = state.race,
            class = state.class,
            hp = state.hp,
            max_hp = state.max_hp,
            experience = state.experience,
            attack = stats.total_attack(),
            defense = stats.defense(),
            items = state.inventory.len(),
        )
    }
}
