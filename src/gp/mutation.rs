//! Mutation: grow a room list, route it, rasterize it.
//!
//! Mutation is also how every individual comes to exist. The initial
//! population is built by mutating empty room lists, and every child is the
//! mutation of a crossover result.

use crate::config::{FitnessWeights, LevelConfig};
use crate::error::RasterError;
use crate::gp::individual::Individual;
use crate::level::{Corridor, Rect, Room, Router, overlaps_any, rasterize};
use rand::Rng;

/// Build an individual from a parent room list.
///
/// The parent list is copied, grown by up to `max_new_rooms` rooms, routed
/// and rasterized. The parent itself is never modified.
///
/// # Errors
///
/// Returns an error if a room or corridor falls outside the level.
pub fn mutate<R: Rng + ?Sized>(
    parent_rooms: &[Room],
    level: &LevelConfig,
    weights: &FitnessWeights,
    rng: &mut R,
) -> Result<Individual, RasterError> {
    let mut rooms = parent_rooms.to_vec();
    grow_rooms(&mut rooms, level, rng);
    let corridors = route(&rooms, level, rng);
    let grid = rasterize(level, &rooms, &corridors, rng)?;
    Ok(Individual::new(rooms, corridors, grid, level, weights))
}

/// Try to add between 0 and `max_new_rooms` rooms.
///
/// The first room of an empty layout is always accepted. After that, a
/// sample that overlaps an existing room is redrawn once, and the attempt is
/// dropped if the second sample overlaps too.
pub fn grow_rooms<R: Rng + ?Sized>(rooms: &mut Vec<Room>, level: &LevelConfig, rng: &mut R) {
    let attempts = rng.gen_range(0..=level.max_new_rooms);
    for _ in 0..attempts {
        if rooms.len() >= level.max_rooms {
            break;
        }
        if rooms.is_empty() {
            rooms.push(Room::random(level, rng));
            continue;
        }
        for _ in 0..2 {
            let candidate = Room::random(level, rng);
            if !overlaps_any(&candidate.rect, rooms) {
                rooms.push(candidate);
                break;
            }
        }
    }
}

/// Connect a room list.
///
/// Consecutive rooms are joined in list order, then `random_connections`
/// random pairs are joined, then `random_spurs` corridors run from a random
/// interior point to a random room. Layouts with a single room get no
/// corridors.
pub fn route<R: Rng + ?Sized>(rooms: &[Room], level: &LevelConfig, rng: &mut R) -> Vec<Corridor> {
    let mut router = Router::new(level);
    if rooms.len() < 2 {
        return router.into_corridors();
    }

    for pair in rooms.windows(2) {
        router.join_rooms(&pair[0].rect, &pair[1].rect, None, rng);
    }

    for _ in 0..level.random_connections {
        let a = rooms[rng.gen_range(0..rooms.len())].rect;
        let b = rooms[rng.gen_range(0..rooms.len())].rect;
        router.join_rooms(&a, &b, None, rng);
    }

    for _ in 0..level.random_spurs {
        let spur = Rect::new(
            rng.gen_range(2..=level.width - 2),
            rng.gen_range(2..=level.height - 2),
            1,
            1,
        );
        let target = rooms[rng.gen_range(0..rooms.len())].rect;
        router.join_rooms(&spur, &target, None, rng);
    }

    router.into_corridors()
}
