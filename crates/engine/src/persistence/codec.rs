//! Flat, serializable form of a player.
//!
//! The live room is stored by ID and resolved again on restore; the
//! notifier and battle capabilities are never part of the record.

use mudworld_domain::{
    EffectList, Item, PlayerClass, PlayerEquipment, Race, RoomId, Stats, UserId,
};
use serde::{Deserialize, Serialize};

use super::PersistenceError;
use crate::entities::{PlayerState, RoomGraph};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub user_id: UserId,
    pub name: String,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub class: PlayerClass,
    #[serde(default)]
    pub race: Race,
    pub level: i32,
    pub experience: i64,
    #[serde(default)]
    pub is_sleeping: bool,
    #[serde(default)]
    pub inventory: Vec<Item>,
    #[serde(default)]
    pub equipment: PlayerEquipment,
    #[serde(default)]
    pub effects: EffectList,
    pub current_room: RoomId,
    pub max_hp: i32,
    pub current_hp: i32,
}

impl PlayerRecord {
    pub fn capture(user_id: &UserId, state: &PlayerState) -> Self {
        Self {
            user_id: user_id.clone(),
            name: state.name.clone(),
            stats: state.stats.clone(),
            class: state.class,
            race: state.race,
            level: state.level,
            experience: state.experience,
            is_sleeping: state.is_sleeping,
            inventory: state.inventory.clone(),
            equipment: state.equipment.clone(),
            effects: state.effects.clone(),
            current_room: state.room.clone(),
            max_hp: state.max_hp,
            current_hp: state.hp,
        }
    }

    /// Rebuild live state. Unknown rooms resolve to the default room; a
    /// player saved mid-death comes back with 1 HP.
    pub fn restore(self, graph: &RoomGraph) -> (UserId, PlayerState) {
        let room = graph.get_or_default(&self.current_room).id().clone();
        if room != self.current_room {
            tracing::warn!(
                user_id = %self.user_id,
                room_id = %self.current_room,
                "Saved room no longer exists, using default room"
            );
        }
        let state = PlayerState {
            name: self.name,
            stats: self.stats,
            class: self.class,
            race: self.race,
            level: self.level,
            experience: self.experience,
            is_sleeping: self.is_sleeping,
            is_fighting: false,
            inventory: self.inventory,
            equipment: self.equipment,
            effects: self.effects,
            room,
            hp: self.current_hp.max(1),
            max_hp: self.max_hp,
        };
        (self.user_id, state)
    }
}

pub fn encode(records: &[PlayerRecord]) -> Result<Vec<u8>, PersistenceError> {
    serde_json::to_vec(records).map_err(PersistenceError::Encode)
}

pub fn decode(bytes: &[u8]) -> Result<Vec<PlayerRecord>, PersistenceError> {
    serde_json::from_slice(bytes).map_err(PersistenceError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedRandom;
    use crate::test_fixtures::{rat, sample_areas, wolf};
    use crate::world::loader;
    use mudworld_domain::{Effect, Equipment, EquipmentSlot, Stat};

    fn graph() -> RoomGraph {
        loader::load(
            vec![rat(), wolf()],
            sample_areas(),
            &RoomId::new("midgaard_temple"),
            &FixedRandom(1),
        )
        .unwrap()
    }

    fn geared_state(room: &str) -> PlayerState {
        let mut state = PlayerState::new_character("Alice", RoomId::new(room));
        state.stats.set(Stat::Strength, 14);
        state.level = 3;
        state.experience = 250;
        state.is_sleeping = true;
        state.is_fighting = true;
        state.hp = 42;
        state.max_hp = 120;
        state.inventory.push(Item::new("rat_tail", "rat tail"));
        state.equipment.equip(
            Equipment::new(Item::new("sword", "long sword"), EquipmentSlot::RightHand)
                .with_attack(7)
                .with_stat(Stat::Constitution, 1)
                .with_effects(vec![Effect::new().seeing_hidden()].into()),
        );
        state.effects.push(Effect::new().with_attack(2).granting_invisible());
        state
    }

    #[test]
    fn round_trip_reproduces_state_and_room() {
        let graph = graph();
        let user_id = UserId::new("alice");
        let state = geared_state("forest_path");

        let bytes = encode(&[PlayerRecord::capture(&user_id, &state)]).unwrap();
        let mut records = decode(&bytes).unwrap();
        assert_eq!(records.len(), 1);
        let (restored_id, restored) = records.remove(0).restore(&graph);

        assert_eq!(restored_id, user_id);
        assert_eq!(restored.room, RoomId::new("forest_path"));
        assert!(!restored.is_fighting);
        assert_eq!(
            PlayerState {
                is_fighting: true,
                ..restored.clone()
            },
            state
        );
        assert_eq!(restored.stat_block().total_attack(), state.stat_block().total_attack());
    }

    #[test]
    fn unknown_room_falls_back_to_default() {
        let graph = graph();
        let record = PlayerRecord::capture(&UserId::new("bob"), &geared_state("demolished_room"));
        let (_, restored) = record.restore(&graph);
        assert_eq!(restored.room, RoomId::new("midgaard_temple"));
    }

    #[test]
    fn dead_on_save_comes_back_with_one_hp() {
        let graph = graph();
        let mut state = geared_state("midgaard_temple");
        state.hp = -4;
        let (_, restored) = PlayerRecord::capture(&UserId::new("bob"), &state).restore(&graph);
        assert_eq!(restored.hp, 1);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode(b"not json"), Err(PersistenceError::Decode(_))));
    }
}
