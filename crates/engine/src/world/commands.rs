//! Player commands. Every outcome, including refusals, reaches the player as
//! a notification; only an unknown or duplicate user is an `Err`.

use std::sync::Arc;

use mudworld_domain::{Direction, ShoutId, UserId};

use super::error::WorldError;
use super::lifecycle::World;
use crate::entities::{Mob, Player, PlayerState, Room};

const WELCOME_BACK: &str = "I missed you! Thanks for coming back.";

impl World {
    fn player(&self, user_id: &UserId) -> Result<Arc<Player>, WorldError> {
        self.players
            .get(user_id)
            .ok_or_else(|| WorldError::PlayerNotFound(user_id.clone()))
    }

    async fn current_room(&self, player: &Player) -> Arc<Room> {
        Arc::clone(self.graph.get_or_default(&player.room().await))
    }

    /// Create a character for `user_id` in the default room.
    pub async fn create_player(&self, user_id: UserId) -> Result<(), WorldError> {
        if self.is_shut_down() {
            return Err(WorldError::AlreadyShutDown);
        }

        let room = Arc::clone(self.graph.default_room());
        let state = PlayerState::new_character(user_id.as_str(), room.id().clone());
        let player = self.new_player(user_id.clone(), state);
        if let Err(existing) = self.players.insert(Arc::clone(&player)) {
            existing.notify(WELCOME_BACK).await;
            return Err(WorldError::PlayerExists(user_id));
        }

        room.enter(&player, None).await;
        self.start_player_regeneration(Arc::clone(&player));
        tracing::info!(user_id = %user_id, room_id = %room.id(), "Player created");

        let view = room.show(&user_id, player.perception().await, true).await;
        player.notify(&format!("Welcome to the world!\n\n{view}")).await;
        Ok(())
    }

    pub async fn move_player(&self, user_id: &UserId, direction: Direction) -> Result<(), WorldError> {
        let player = self.player(user_id)?;
        if player.is_sleeping().await {
            player.notify("You cannot move while sleeping.").await;
            return Ok(());
        }
        if player.is_fighting().await {
            player.notify("You cannot move while fighting.").await;
            return Ok(());
        }

        let room = self.current_room(&player).await;
        let perception = player.perception().await;
        let next = room
            .can_move(direction, perception)
            .then(|| self.graph.neighbour(&room, direction))
            .flatten()
            .cloned();
        let Some(next) = next else {
            let reply = if room.can_see_door(direction, perception) {
                "The door is locked."
            } else {
                "You cannot go in that direction."
            };
            player.notify(reply).await;
            return Ok(());
        };

        room.exit(&player, Some(direction)).await;
        player.set_room(next.id().clone()).await;
        next.enter(&player, Some(direction)).await;
        tracing::debug!(
            user_id = %user_id,
            from = %room.id(),
            to = %next.id(),
            direction = %direction,
            "Player moved"
        );

        let view = next.show(user_id, perception, false).await;
        player.notify(&view).await;
        Ok(())
    }

    pub async fn look(&self, user_id: &UserId) -> Result<(), WorldError> {
        let player = self.player(user_id)?;
        let room = self.current_room(&player).await;
        let view = room.show(user_id, player.perception().await, true).await;
        player.notify(&view).await;
        Ok(())
    }

    pub async fn sleep(&self, user_id: &UserId) -> Result<(), WorldError> {
        let player = self.player(user_id)?;
        if player.is_fighting().await {
            player.notify("You cannot sleep while fighting.").await;
            return Ok(());
        }
        let reply = if player.set_sleeping(true).await {
            "You are already sleeping."
        } else {
            "You fall asleep."
        };
        player.notify(reply).await;
        Ok(())
    }

    pub async fn wake(&self, user_id: &UserId) -> Result<(), WorldError> {
        let player = self.player(user_id)?;
        let reply = if player.set_sleeping(false).await {
            "You wake up."
        } else {
            "You are already awake."
        };
        player.notify(reply).await;
        Ok(())
    }

    pub async fn say(&self, user_id: &UserId, message: &str) -> Result<(), WorldError> {
        let player = self.player(user_id)?;
        let room = self.current_room(&player).await;
        room.say(
            user_id,
            &player.name().await,
            message,
            player.visibility().await,
        )
        .await;
        player.notify(&format!("You say: {message}")).await;
        Ok(())
    }

    /// Echo `message` through every room of the speaker's area.
    pub async fn shout(&self, user_id: &UserId, message: &str) -> Result<(), WorldError> {
        let player = self.player(user_id)?;
        if player.is_sleeping().await {
            player.notify("You cannot shout while sleeping.").await;
            return Ok(());
        }

        let room = self.current_room(&player).await;
        let shout_id = ShoutId::from_uuid(self.ports.random.gen_uuid());
        self.graph
            .shout(
                &room,
                shout_id,
                self.ports.clock.now(),
                user_id,
                &player.name().await,
                message,
                player.visibility().await,
            )
            .await;
        player.notify(&format!("You shout: {message}")).await;
        Ok(())
    }

    /// Attack the first living mob in the room whose name matches `target`.
    pub async fn kill(&self, user_id: &UserId, target: &str) -> Result<(), WorldError> {
        let player = self.player(user_id)?;
        if player.is_sleeping().await {
            player.notify("You cannot fight while sleeping.").await;
            return Ok(());
        }
        let target = target.trim();
        if target.is_empty() {
            player.notify("Kill what?").await;
            return Ok(());
        }

        let room = self.current_room(&player).await;
        let Some(mob) = self.find_target(&player, &room, target).await else {
            player.notify(&format!("There is no {target} here.")).await;
            return Ok(());
        };

        tracing::info!(user_id = %user_id, mob_id = %mob.id(), room_id = %room.id(), "Player attacks");
        player.notify(&format!("You attack the {}!", mob.name())).await;
        player.request_battle(mob).await;
        Ok(())
    }

    async fn find_target(&self, player: &Player, room: &Room, target: &str) -> Option<Arc<Mob>> {
        let perception = player.perception().await;
        for mob in room.mobs() {
            if !mob.name().eq_ignore_ascii_case(target) || !mob.is_alive().await {
                continue;
            }
            if perception.perceives(mob.visibility().await) {
                return Some(Arc::clone(mob));
            }
        }
        None
    }

    pub async fn status(&self, user_id: &UserId) -> Result<(), WorldError> {
        let player = self.player(user_id)?;
        player.notify(&player.status().await).await;
        Ok(())
    }
}
