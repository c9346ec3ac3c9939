//! Crossover: combine two parents' room lists.
//!
//! Rooms holding the player, boss or key are never pruned and never handed
//! from one parent to the other; they only travel with the list they are in.

use crate::level::{Room, overlaps_any};
use rand::Rng;

/// Combine two room lists into the starting list of a child.
///
/// When both parents have more than one room, a split index is drawn from the
/// first parent's list. Each copy is pruned by `len - split` attempts, where
/// an attempt removes a random room unless it is special. A coin flip then
/// picks which pruned list receives the other's rooms. Otherwise the second
/// parent's rooms are merged into a copy of the first.
///
/// Merging skips special rooms and rooms overlapping the receiving list.
pub fn crossover<R: Rng + ?Sized>(first: &[Room], second: &[Room], rng: &mut R) -> Vec<Room> {
    let mut child = first.to_vec();

    if first.len() > 1 && second.len() > 1 {
        let split = rng.gen_range(1..first.len());
        let mut other = second.to_vec();
        prune(&mut child, first.len() - split, rng);
        prune(&mut other, second.len().saturating_sub(split), rng);

        if rng.gen_bool(0.5) {
            merge_into(&mut child, &other);
        } else {
            merge_into(&mut other, &child);
            child = other;
        }
    } else {
        merge_into(&mut child, second);
    }

    child
}

/// Make `attempts` random deletion attempts, skipping special rooms.
fn prune<R: Rng + ?Sized>(rooms: &mut Vec<Room>, attempts: usize, rng: &mut R) {
    for _ in 0..attempts {
        if rooms.is_empty() {
            break;
        }
        let idx = rng.gen_range(0..rooms.len());
        if !rooms[idx].is_special() {
            rooms.remove(idx);
        }
    }
}

/// Append every non-special donor room that fits without overlap.
fn merge_into(target: &mut Vec<Room>, donor: &[Room]) {
    for room in donor {
        if !room.is_special() && !overlaps_any(&room.rect, target) {
            target.push(*room);
        }
    }
}
