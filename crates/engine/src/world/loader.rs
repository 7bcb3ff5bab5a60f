//! Turns declarative world data into the live room graph.
//!
//! Room IDs are namespaced as `<area>_<room>`. A neighbour reference is a
//! bare room ID within the same area, or `__EXT__<full room id>` for a room
//! in another area. Any inconsistency aborts the load.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use mudworld_domain::{
    AreaId, Direction, DomainError, MobInstanceId, MobTemplate, MobTemplateId, RoomId,
};
use thiserror::Error;

use crate::entities::{Door, Mob, Room, RoomGraph};
use crate::infrastructure::ports::{AreaFile, NeighbourDef, RandomPort, RoomDef, EXTERNAL_ROOM_PREFIX};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Duplicate room ID: {0}")]
    DuplicateRoom(RoomId),

    #[error("Duplicate mob template ID: {0}")]
    DuplicateMobTemplate(MobTemplateId),

    #[error("Invalid mob template: {0}")]
    InvalidMobTemplate(#[from] DomainError),

    #[error("Room {room} has a door {direction} to unknown room {target}")]
    DanglingNeighbour {
        room: RoomId,
        direction: Direction,
        target: RoomId,
    },

    #[error("Room {room} spawns unknown mob template {template}")]
    UnknownMobTemplate {
        room: RoomId,
        template: MobTemplateId,
    },

    #[error("Default room {0} does not exist")]
    MissingDefaultRoom(RoomId),
}

pub type MobTemplates = HashMap<MobTemplateId, Arc<MobTemplate>>;

/// Validate and index mob templates by ID.
pub fn index_templates(templates: Vec<MobTemplate>) -> Result<MobTemplates, LoadError> {
    let mut index = HashMap::with_capacity(templates.len());
    for template in templates {
        template.validate()?;
        if index.contains_key(&template.id) {
            return Err(LoadError::DuplicateMobTemplate(template.id));
        }
        index.insert(template.id.clone(), Arc::new(template));
    }
    Ok(index)
}

fn resolve_neighbour(area: &AreaId, neighbour: &NeighbourDef) -> RoomId {
    match neighbour.room.strip_prefix(EXTERNAL_ROOM_PREFIX) {
        Some(full_id) => RoomId::new(full_id),
        None => RoomId::in_area(area, &neighbour.room),
    }
}

/// Build the room graph from area files, spawning one mob per template
/// reference.
pub fn build_graph(
    templates: &MobTemplates,
    areas: Vec<AreaFile>,
    default_room: &RoomId,
    random: &dyn RandomPort,
) -> Result<RoomGraph, LoadError> {
    let mut defs: Vec<(RoomId, AreaId, RoomDef)> = Vec::new();
    let mut known: HashSet<RoomId> = HashSet::new();
    for area in areas {
        for def in area.rooms {
            let id = RoomId::in_area(&area.id, &def.id);
            if !known.insert(id.clone()) {
                return Err(LoadError::DuplicateRoom(id));
            }
            defs.push((id, area.id.clone(), def));
        }
    }

    let mut rooms = HashMap::with_capacity(defs.len());
    for (id, area_id, def) in defs {
        let mut room = Room::new(
            id.clone(),
            area_id.clone(),
            def.name,
            def.short_description,
            def.long_description,
        );

        for (direction, neighbour) in &def.neighbours {
            let target = resolve_neighbour(&area_id, neighbour);
            if !known.contains(&target) {
                return Err(LoadError::DanglingNeighbour {
                    room: id,
                    direction: *direction,
                    target,
                });
            }
            let door = Door::to(target)
                .hidden(neighbour.is_hidden)
                .invisible(neighbour.is_invisible)
                .locked(neighbour.is_locked, neighbour.key_id.clone());
            room = room.with_door(*direction, door);
        }

        for template_id in &def.mobs {
            let Some(template) = templates.get(template_id) else {
                return Err(LoadError::UnknownMobTemplate {
                    room: id,
                    template: template_id.clone(),
                });
            };
            let mob_id = MobInstanceId::from_uuid(random.gen_uuid());
            room = room.with_mob(Arc::new(Mob::spawn(mob_id, Arc::clone(template), id.clone())));
        }

        rooms.insert(id, Arc::new(room));
    }

    let Some(default) = rooms.get(default_room).cloned() else {
        return Err(LoadError::MissingDefaultRoom(default_room.clone()));
    };

    tracing::info!(
        rooms = rooms.len(),
        default_room = %default_room,
        "Room graph built"
    );
    Ok(RoomGraph::new(rooms, default))
}

/// Index templates, then build the graph.
pub fn load(
    templates: Vec<MobTemplate>,
    areas: Vec<AreaFile>,
    default_room: &RoomId,
    random: &dyn RandomPort,
) -> Result<RoomGraph, LoadError> {
    let templates = index_templates(templates)?;
    build_graph(&templates, areas, default_room, random)
}
