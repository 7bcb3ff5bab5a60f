//! Rooms, doors and the room graph.
//!
//! Topology (rooms, doors, mobs) is fixed once the loader builds the graph.
//! Occupants and shout records change all the time and live in concurrent
//! maps, so readers never hold a shard guard across an `.await`.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use mudworld_domain::{AreaId, Direction, RoomId, ShoutId, UserId};

use super::mob::Mob;
use super::player::{Player, Speech};
use super::visibility::{Perception, Visibility};

/// A directed exit from one room to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Door {
    target: RoomId,
    hidden: bool,
    invisible: bool,
    locked: bool,
    key: Option<String>,
}

impl Door {
    pub fn to(target: RoomId) -> Self {
        Self {
            target,
            hidden: false,
            invisible: false,
            locked: false,
            key: None,
        }
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn invisible(mut self, invisible: bool) -> Self {
        self.invisible = invisible;
        self
    }

    pub fn locked(mut self, locked: bool, key: Option<String>) -> Self {
        self.locked = locked;
        self.key = key;
        self
    }

    pub fn target(&self) -> &RoomId {
        &self.target
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Key that would open this door. Nothing consumes it yet.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn is_noticed_by(&self, perception: Perception) -> bool {
        perception.perceives(Visibility {
            hidden: self.hidden,
            invisible: self.invisible,
        })
    }
}

pub struct Room {
    id: RoomId,
    area_id: AreaId,
    name: String,
    short_description: String,
    long_description: String,
    doors: BTreeMap<Direction, Door>,
    mobs: Vec<Arc<Mob>>,
    players: DashMap<UserId, Arc<Player>>,
    shouts: DashMap<ShoutId, DateTime<Utc>>,
}

impl std::fmt::Debug for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.id)
            .field("area_id", &self.area_id)
            .field("doors", &self.doors)
            .finish_non_exhaustive()
    }
}

impl Room {
    pub fn new(
        id: RoomId,
        area_id: AreaId,
        name: impl Into<String>,
        short_description: impl Into<String>,
        long_description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            area_id,
            name: name.into(),
            short_description: short_description.into(),
            long_description: long_description.into(),
            doors: BTreeMap::new(),
            mobs: Vec::new(),
            players: DashMap::new(),
            shouts: DashMap::new(),
        }
    }

    pub fn with_door(mut self, direction: Direction, door: Door) -> Self {
        self.doors.insert(direction, door);
        self
    }

    pub fn with_mob(mut self, mob: Arc<Mob>) -> Self {
        self.mobs.push(mob);
        self
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn area_id(&self) -> &AreaId {
        &self.area_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn long_description(&self) -> &str {
        &self.long_description
    }

    pub fn door(&self, direction: Direction) -> Option<&Door> {
        self.doors.get(&direction)
    }

    pub fn doors(&self) -> impl Iterator<Item = (&Direction, &Door)> {
        self.doors.iter()
    }

    pub fn mobs(&self) -> &[Arc<Mob>] {
        &self.mobs
    }

    /// Whether an unlocked door the mover can notice leads that way.
    pub fn can_move(&self, direction: Direction, perception: Perception) -> bool {
        self.doors
            .get(&direction)
            .is_some_and(|door| !door.locked && door.is_noticed_by(perception))
    }

    /// Whether the observer can see a locked door that way.
    pub fn can_see_door(&self, direction: Direction, perception: Perception) -> bool {
        self.doors
            .get(&direction)
            .is_some_and(|door| door.locked && door.is_noticed_by(perception))
    }

    pub fn has_player(&self, user_id: &UserId) -> bool {
        self.players.contains_key(user_id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Add `player` without telling anyone. Used when restoring a snapshot.
    pub fn place(&self, player: &Arc<Player>) {
        self.players
            .insert(player.user_id().clone(), Arc::clone(player));
    }

    /// Snapshot of the occupants, excluding `except`.
    fn occupants_except(&self, except: &UserId) -> Vec<Arc<Player>> {
        self.players
            .iter()
            .filter(|entry| entry.key() != except)
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Add `player` and tell everyone already here. `from` is the direction the
    /// player travelled, `None` when they were moved without walking.
    pub async fn enter(&self, player: &Arc<Player>, from: Option<Direction>) {
        let name = player.name().await;
        let visibility = player.visibility().await;
        let line = match from {
            Some(direction) => format!("{name} arrives {}.", direction.opposite().arrival_phrase()),
            None => format!("{name} appears."),
        };
        for occupant in self.occupants_except(player.user_id()) {
            occupant.witness(&line, visibility).await;
        }
        self.players
            .insert(player.user_id().clone(), Arc::clone(player));
    }

    /// Remove `player` and tell everyone left behind.
    pub async fn exit(&self, player: &Arc<Player>, towards: Option<Direction>) {
        self.players.remove(player.user_id());
        let name = player.name().await;
        let visibility = player.visibility().await;
        let line = match towards {
            Some(direction) => format!("{name} leaves {direction}."),
            None => format!("{name} disappears."),
        };
        for occupant in self.occupants_except(player.user_id()) {
            occupant.witness(&line, visibility).await;
        }
    }

    /// Describe the room to `viewer`. `looking` adds the long description.
    pub async fn show(&self, viewer: &UserId, perception: Perception, looking: bool) -> String {
        let mut message = format!("{}\n\n{}", self.name, self.short_description);
        if looking {
            message.push_str("\n\n");
            message.push_str(&self.long_description);
        }

        let exits: Vec<&str> = self
            .doors
            .iter()
            .filter(|(_, door)| door.is_noticed_by(perception))
            .map(|(direction, _)| direction.as_str())
            .collect();
        if !exits.is_empty() {
            message.push_str(&format!("\n\nExits: {}", exits.join(", ")));
        }

        let mut players = Vec::new();
        for occupant in self.occupants_except(viewer) {
            if let Some(line) = occupant.show_to(perception).await {
                players.push(line);
            }
        }
        players.sort();
        if !players.is_empty() {
            message.push_str("\n\n");
            message.push_str(&players.join("\n"));
        }

        let mut mobs = Vec::new();
        for mob in &self.mobs {
            if let Some(line) = mob.show_to(perception).await {
                mobs.push(line);
            }
        }
        if !mobs.is_empty() {
            message.push_str("\n\n");
            message.push_str(&mobs.join("\n"));
        }

        message
    }

    /// Relay what `speaker` says to everyone else in the room.
    pub async fn say(&self, speaker: &UserId, name: &str, message: &str, visibility: Visibility) {
        for occupant in self.occupants_except(speaker) {
            occupant.hear(name, Speech::Say, message, visibility).await;
        }
    }

    /// Remember a shout. Returns `false` if this room already heard it.
    pub fn record_shout(&self, shout_id: ShoutId, at: DateTime<Utc>) -> bool {
        match self.shouts.entry(shout_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(at);
                true
            }
        }
    }

    pub fn shout_count(&self) -> usize {
        self.shouts.len()
    }

    /// Forget shouts recorded more than `lifespan` before `now`. Returns how many.
    pub fn purge_shouts(&self, now: DateTime<Utc>, lifespan: Duration) -> usize {
        let before = self.shouts.len();
        self.shouts.retain(|_, heard_at| {
            now.signed_duration_since(*heard_at)
                .to_std()
                .map_or(true, |age| age < lifespan)
        });
        before.saturating_sub(self.shouts.len())
    }
}

/// Every room of the world, keyed by ID.
#[derive(Debug)]
pub struct RoomGraph {
    rooms: HashMap<RoomId, Arc<Room>>,
    default_room: Arc<Room>,
}

impl RoomGraph {
    /// `default_room` must be one of `rooms`; the loader guarantees it.
    pub fn new(rooms: HashMap<RoomId, Arc<Room>>, default_room: Arc<Room>) -> Self {
        Self {
            rooms,
            default_room,
        }
    }

    pub fn get(&self, id: &RoomId) -> Option<&Arc<Room>> {
        self.rooms.get(id)
    }

    /// The room with `id`, or the default room if it no longer exists.
    pub fn get_or_default(&self, id: &RoomId) -> &Arc<Room> {
        self.rooms.get(id).unwrap_or(&self.default_room)
    }

    pub fn default_room(&self) -> &Arc<Room> {
        &self.default_room
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Arc<Room>> {
        self.rooms.values()
    }

    /// Room IDs in a stable order.
    pub fn room_ids(&self) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self.rooms.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Where the door out of `from` towards `direction` leads.
    pub fn neighbour(&self, from: &Room, direction: Direction) -> Option<&Arc<Room>> {
        from.door(direction).and_then(|door| self.rooms.get(door.target()))
    }

    /// Move `player` out of their current room into `to` without a direction.
    pub async fn teleport(&self, player: &Arc<Player>, to: &Arc<Room>) {
        let current = player.room().await;
        if let Some(room) = self.rooms.get(&current) {
            room.exit(player, None).await;
        }
        player.set_room(to.id().clone()).await;
        to.enter(player, None).await;
    }

    /// Echo a shout from `origin` across its area. Each room relays a given
    /// shout once, so cycles in the door graph terminate.
    pub async fn shout(
        &self,
        origin: &Arc<Room>,
        shout_id: ShoutId,
        at: DateTime<Utc>,
        speaker: &UserId,
        name: &str,
        message: &str,
        visibility: Visibility,
    ) -> usize {
        let mut reached = 0;
        let mut queue = VecDeque::from([Arc::clone(origin)]);

        while let Some(room) = queue.pop_front() {
            if !room.record_shout(shout_id, at) {
                continue;
            }
            reached += 1;

            for occupant in room.occupants_except(speaker) {
                occupant.hear(name, Speech::Shout, message, visibility).await;
            }

            for (_, door) in room.doors() {
                if let Some(next) = self.rooms.get(door.target()) {
                    if next.area_id() == origin.area_id() {
                        queue.push_back(Arc::clone(next));
                    }
                }
            }
        }

        tracing::debug!(
            room_id = %origin.id(),
            shout_id = %shout_id,
            rooms = reached,
            "Shout echoed"
        );
        reached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::player::{MockBattleRequester, PlayerState};
    use crate::test_fixtures::RecordingNotifier;
    use mudworld_domain::Effect;

    fn room(id: &str, area: &str) -> Room {
        Room::new(RoomId::new(id), AreaId::new(area), id, "short", "long")
    }

    fn player(id: &str, room_id: &str, notifier: &Arc<RecordingNotifier>) -> Arc<Player> {
        Arc::new(Player::new(
            UserId::new(id),
            PlayerState::new_character(id, RoomId::new(room_id)),
            notifier.clone(),
            Arc::new(MockBattleRequester::new()),
        ))
    }

    fn graph(rooms: Vec<Room>, default_room: &str) -> RoomGraph {
        let rooms: HashMap<RoomId, Arc<Room>> = rooms
            .into_iter()
            .map(|room| (room.id().clone(), Arc::new(room)))
            .collect();
        let default_room = Arc::clone(&rooms[&RoomId::new(default_room)]);
        RoomGraph::new(rooms, default_room)
    }

    const PLAIN: Perception = Perception {
        sees_hidden: false,
        sees_invisible: false,
    };
    const SEES_HIDDEN: Perception = Perception {
        sees_hidden: true,
        sees_invisible: false,
    };
    const SEES_ALL: Perception = Perception {
        sees_hidden: true,
        sees_invisible: true,
    };

    #[test]
    fn locked_doors_never_allow_movement() {
        let room = room("a", "x")
            .with_door(Direction::North, Door::to(RoomId::new("b")).locked(true, Some("k".into())))
            .with_door(Direction::South, Door::to(RoomId::new("c")).hidden(true))
            .with_door(Direction::East, Door::to(RoomId::new("d")).invisible(true))
            .with_door(Direction::West, Door::to(RoomId::new("e")));

        for perception in [PLAIN, SEES_HIDDEN, SEES_ALL] {
            assert!(!room.can_move(Direction::North, perception));
            assert!(room.can_move(Direction::West, perception));
        }
        assert!(!room.can_move(Direction::South, PLAIN));
        assert!(room.can_move(Direction::South, SEES_HIDDEN));
        assert!(!room.can_move(Direction::East, SEES_HIDDEN));
        assert!(room.can_move(Direction::East, SEES_ALL));
        assert!(!room.can_move(Direction::Up, SEES_ALL));
        assert_eq!(room.door(Direction::North).and_then(Door::key), Some("k"));
    }

    #[test]
    fn only_noticed_locked_doors_are_seen() {
        let room = room("a", "x")
            .with_door(Direction::North, Door::to(RoomId::new("b")).locked(true, None))
            .with_door(
                Direction::South,
                Door::to(RoomId::new("c")).hidden(true).locked(true, None),
            )
            .with_door(Direction::West, Door::to(RoomId::new("e")));

        assert!(room.can_see_door(Direction::North, PLAIN));
        assert!(!room.can_see_door(Direction::South, PLAIN));
        assert!(room.can_see_door(Direction::South, SEES_HIDDEN));
        assert!(!room.can_see_door(Direction::West, SEES_ALL));
        assert!(!room.can_see_door(Direction::Down, SEES_ALL));
    }

    #[tokio::test]
    async fn enter_and_exit_notify_awake_observers() {
        let notifier = Arc::new(RecordingNotifier::new());
        let room = room("a", "x");
        let bob = player("bob", "a", &notifier);
        let carol = player("carol", "a", &notifier);
        let alice = player("alice", "a", &notifier);
        room.enter(&bob, None).await;
        room.enter(&carol, None).await;
        carol.set_sleeping(true).await;
        notifier.clear();

        room.enter(&alice, Some(Direction::North)).await;
        room.exit(&alice, Some(Direction::East)).await;

        assert_eq!(
            notifier.messages_for(&UserId::new("bob")),
            vec!["alice arrives from the south.", "alice leaves east."]
        );
        assert!(notifier.messages_for(&UserId::new("carol")).is_empty());
        assert!(!room.has_player(&UserId::new("alice")));
        assert_eq!(room.player_count(), 2);
    }

    #[tokio::test]
    async fn show_filters_what_the_viewer_cannot_notice() {
        let notifier = Arc::new(RecordingNotifier::new());
        let room = room("a", "x")
            .with_door(Direction::North, Door::to(RoomId::new("b")))
            .with_door(Direction::Up, Door::to(RoomId::new("c")).hidden(true));
        let alice = player("alice", "a", &notifier);
        let mut sneaky = PlayerState::new_character("sneaky", RoomId::new("a"));
        sneaky.effects.push(Effect::new().granting_hidden());
        let sneaky = Arc::new(Player::new(
            UserId::new("sneaky"),
            sneaky,
            notifier.clone(),
            Arc::new(MockBattleRequester::new()),
        ));
        room.enter(&alice, None).await;
        room.enter(&sneaky, None).await;

        let plain = room.show(&UserId::new("alice"), PLAIN, false).await;
        assert_eq!(plain, "a\n\nshort\n\nExits: north");

        let looking = room.show(&UserId::new("alice"), SEES_HIDDEN, true).await;
        assert_eq!(looking, "a\n\nshort\n\nlong\n\nExits: north, up\n\nsneaky is here.");
    }

    #[tokio::test]
    async fn say_reaches_everyone_but_the_speaker() {
        let notifier = Arc::new(RecordingNotifier::new());
        let room = room("a", "x");
        let alice = player("alice", "a", &notifier);
        let bob = player("bob", "a", &notifier);
        room.enter(&alice, None).await;
        room.enter(&bob, None).await;
        notifier.clear();

        room.say(alice.user_id(), "alice", "hello", Visibility::default()).await;

        assert!(notifier.messages_for(&UserId::new("alice")).is_empty());
        assert_eq!(notifier.messages_for(&UserId::new("bob")), vec!["alice says: hello"]);
    }

    #[tokio::test]
    async fn shout_visits_each_room_once_and_stays_in_area() {
        let notifier = Arc::new(RecordingNotifier::new());
        // a <-> b <-> c <-> a forms a cycle; d is in another area.
        let graph = graph(
            vec![
                room("a", "x")
                    .with_door(Direction::North, Door::to(RoomId::new("b")))
                    .with_door(Direction::East, Door::to(RoomId::new("d"))),
                room("b", "x")
                    .with_door(Direction::South, Door::to(RoomId::new("a")))
                    .with_door(Direction::North, Door::to(RoomId::new("c"))),
                room("c", "x").with_door(Direction::Down, Door::to(RoomId::new("a"))),
                room("d", "y").with_door(Direction::West, Door::to(RoomId::new("a"))),
            ],
            "a",
        );
        let listeners = ["a", "b", "c", "d"].map(|id| {
            let listener = player(&format!("in_{id}"), id, &notifier);
            (id, listener)
        });
        for (id, listener) in &listeners {
            graph.get(&RoomId::new(*id)).unwrap().enter(listener, None).await;
        }
        notifier.clear();

        let origin = Arc::clone(graph.get(&RoomId::new("a")).unwrap());
        let reached = graph
            .shout(
                &origin,
                ShoutId::new(),
                Utc::now(),
                &UserId::new("in_a"),
                "in_a",
                "help",
                Visibility::default(),
            )
            .await;

        assert_eq!(reached, 3);
        assert!(notifier.messages_for(&UserId::new("in_a")).is_empty());
        assert_eq!(notifier.messages_for(&UserId::new("in_b")), vec!["in_a shouts: help"]);
        assert_eq!(notifier.messages_for(&UserId::new("in_c")), vec!["in_a shouts: help"]);
        assert!(notifier.messages_for(&UserId::new("in_d")).is_empty());
        assert_eq!(graph.get(&RoomId::new("d")).unwrap().shout_count(), 0);
    }

    #[test]
    fn purge_keeps_fresh_shouts() {
        let room = room("a", "x");
        let now = Utc::now();
        assert!(room.record_shout(ShoutId::new(), now - chrono::Duration::seconds(11)));
        let fresh = ShoutId::new();
        assert!(room.record_shout(fresh, now - chrono::Duration::seconds(3)));
        assert!(!room.record_shout(fresh, now));

        assert_eq!(room.purge_shouts(now, Duration::from_secs(10)), 1);
        assert_eq!(room.shout_count(), 1);
    }

    #[tokio::test]
    async fn teleport_moves_between_rooms_without_direction() {
        let notifier = Arc::new(RecordingNotifier::new());
        let graph = graph(vec![room("a", "x"), room("b", "x")], "b");
        let alice = player("alice", "a", &notifier);
        let bob = player("bob", "b", &notifier);
        let a = Arc::clone(graph.get(&RoomId::new("a")).unwrap());
        let b = Arc::clone(graph.default_room());
        a.enter(&alice, None).await;
        b.enter(&bob, None).await;
        notifier.clear();

        graph.teleport(&alice, &b).await;

        assert_eq!(alice.room().await, RoomId::new("b"));
        assert!(!a.has_player(alice.user_id()));
        assert!(b.has_player(alice.user_id()));
        assert_eq!(notifier.messages_for(&UserId::new("bob")), vec!["alice appears."]);
    }

    #[test]
    fn unknown_room_falls_back_to_default() {
        let graph = graph(vec![room("a", "x"), room("b", "x")], "b");
        assert_eq!(graph.get_or_default(&RoomId::new("gone")).id(), &RoomId::new("b"));
        assert_eq!(graph.get_or_default(&RoomId::new("a")).id(), &RoomId::new("a"));
        assert_eq!(graph.room_ids(), vec![RoomId::new("a"), RoomId::new("b")]);
    }
}
