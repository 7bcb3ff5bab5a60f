//! Shared setup for battle tests: the sample world plus helpers to place
//! fighters in it.

use std::sync::Arc;
use std::time::Duration;

use mudworld_domain::{
    Equipment, EquipmentSlot, Item, MobInstanceId, RoomId, UserId,
};

use super::session::BattleContext;
use crate::entities::{MockBattleRequester, Mob, Player, PlayerState};
use crate::infrastructure::clock::{FixedRandom, SystemClock};
use crate::test_fixtures::{rat, sample_areas, wolf, RecordingNotifier};
use crate::world::loader;

pub struct Arena {
    pub ctx: Arc<BattleContext>,
    pub notifier: Arc<RecordingNotifier>,
}

pub async fn arena() -> Arena {
    let random = FixedRandom(1);
    let graph = loader::load(
        vec![rat(), wolf()],
        sample_areas(),
        &RoomId::new("midgaard_temple"),
        &random,
    )
    .unwrap();
    Arena {
        ctx: Arc::new(BattleContext {
            graph: Arc::new(graph),
            clock: Arc::new(SystemClock::new()),
            random: Arc::new(random),
            tick: Duration::from_secs(60),
        }),
        notifier: Arc::new(RecordingNotifier::new()),
    }
}

impl Arena {
    async fn place(&self, state: PlayerState, id: &str) -> Arc<Player> {
        let player = Arc::new(Player::new(
            UserId::new(id),
            state,
            self.notifier.clone(),
            Arc::new(MockBattleRequester::new()),
        ));
        self.ctx.graph.default_room().enter(&player, None).await;
        player
    }

    /// Unarmed level 1 character in the default room.
    pub async fn player(&self, id: &str) -> Arc<Player> {
        self.place(PlayerState::new_character(id, RoomId::new("midgaard_temple")), id)
            .await
    }

    /// Character holding a right-hand weapon with `attack`.
    pub async fn armed_player(&self, id: &str, attack: i32) -> Arc<Player> {
        let mut state = PlayerState::new_character(id, RoomId::new("midgaard_temple"));
        state.equipment.equip(
            Equipment::new(Item::new("sword", "sword"), EquipmentSlot::RightHand).with_attack(attack),
        );
        self.place(state, id).await
    }

    /// A fresh mob from one of the sample templates, outside any room list.
    pub fn mob(&self, template: &str) -> Arc<Mob> {
        let template = match template {
            "rat" => rat(),
            _ => wolf(),
        };
        Arc::new(Mob::spawn(
            MobInstanceId::new(),
            Arc::new(template),
            RoomId::new("midgaard_square"),
        ))
    }

    pub async fn move_to(&self, player: &Arc<Player>, room: &str) {
        let room = Arc::clone(self.ctx.graph.get(&RoomId::new(room)).unwrap());
        self.ctx.graph.teleport(player, &room).await;
    }
}
