//! Fitness evaluation for candidate levels.
//!
//! A level is reduced to a handful of descriptive metrics, which are then
//! combined by a fixed weighted sum. Scoring is a pure function of the grid
//! and the room list that produced it.

// Tile counts are far below f64's exact integer range
#![allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]

use crate::config::{FitnessWeights, LevelConfig};
use crate::level::{Grid, Point, Room, Tile};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Descriptive statistics of one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelMetrics {
    /// Tiles in the level.
    pub total: usize,
    /// Floor-class tiles: floor plus every marker except player and weapon.
    pub floor: usize,
    /// Floor-class tiles reachable from the player.
    pub reachable: usize,
    /// Melee and ranged enemies.
    pub enemies: usize,
    /// Item pickups.
    pub items: usize,
    /// Traps.
    pub traps: usize,
    /// Player markers.
    pub players: usize,
    /// Boss markers.
    pub bosses: usize,
    /// Key markers.
    pub keys: usize,
    /// Doors.
    pub doors: usize,
    /// Rooms in the layout.
    pub rooms: usize,
    /// `reachable / floor`.
    pub free_space: f64,
    /// `floor / total`.
    pub free_percentage: f64,
    /// `(items + traps + enemies) / total`.
    pub decoration_percentage: f64,
    /// `enemies + traps / 2 - items / 2`.
    pub leniency: f64,
    /// Score for having exactly one player, boss and key.
    pub legal_pieces: f64,
    /// Room-count bonus, zero for five rooms or fewer.
    pub room_count: f64,
}

impl LevelMetrics {
    /// Measure a level.
    #[must_use]
    pub fn measure(grid: &Grid, rooms: &[Room], config: &LevelConfig) -> Self {
        let mut counts = [0usize; Tile::ALL.len()];
        let mut floor = 0;
        for &tile in grid.tiles() {
            counts[tile as usize] += 1;
            if tile.counts_as_floor() {
                floor += 1;
            }
        }
        let count = |tile: Tile| counts[tile as usize];

        let total = grid.tiles().len();
        let enemies = count(Tile::Enemy) + count(Tile::Ranged);
        let (items, traps) = (count(Tile::Item), count(Tile::Trap));
        let reachable = reachable_floor(grid);

        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };

        // Normalised by the room cap, which is 15 under the default tuning.
        let room_count = if rooms.len() > 5 {
            rooms.len() as f64 / config.max_rooms.max(1) as f64
        } else {
            0.0
        };

        Self {
            total,
            floor,
            reachable,
            enemies,
            items,
            traps,
            players: count(Tile::Player),
            bosses: count(Tile::Boss),
            keys: count(Tile::Key),
            doors: count(Tile::Door),
            rooms: rooms.len(),
            free_space: ratio(reachable, floor),
            free_percentage: ratio(floor, total),
            decoration_percentage: ratio(items + traps + enemies, total),
            leniency: enemies as f64 + traps as f64 * 0.5 - items as f64 * 0.5,
            legal_pieces: piece_score(count(Tile::Player), count(Tile::Boss), count(Tile::Key)),
            room_count,
        }
    }

    /// Weighted sum of the metrics.
    #[must_use]
    pub fn score(&self, weights: &FitnessWeights) -> f64 {
        weights.free_space * self.free_space
            + weights.leniency * self.leniency
            + weights.free_percentage * self.free_percentage
            + weights.decoration_percentage * self.decoration_percentage
            + weights.room_count * self.room_count
            + weights.legal_pieces * self.legal_pieces
    }
}

/// Fitness of a layout. A layout without rooms scores exactly zero.
#[must_use]
pub fn evaluate(grid: &Grid, rooms: &[Room], config: &LevelConfig, weights: &FitnessWeights) -> f64 {
    if rooms.is_empty() {
        return 0.0;
    }
    LevelMetrics::measure(grid, rooms, config).score(weights)
}

/// Unique-piece score of a grid.
///
/// -5 if there is more than one player, boss or key; 10 for exactly one of
/// each; 5 if at least one of them appears exactly once; 0 otherwise.
#[must_use]
pub fn legal_pieces(grid: &Grid) -> f64 {
    piece_score(grid.count(Tile::Player), grid.count(Tile::Boss), grid.count(Tile::Key))
}

fn piece_score(players: usize, bosses: usize, keys: usize) -> f64 {
    if players > 1 || bosses > 1 || keys > 1 {
        -5.0
    } else if players == 1 && bosses == 1 && keys == 1 {
        10.0
    } else if players == 1 || bosses == 1 || keys == 1 {
        5.0
    } else {
        0.0
    }
}

/// Floor-class tiles reachable from the first player marker, moving in four
/// directions over anything that is not wall or stone.
#[must_use]
pub fn reachable_floor(grid: &Grid) -> usize {
    let Some(start) = grid.find(Tile::Player) else {
        return 0;
    };

    let mut visited = vec![false; grid.tiles().len()];
    // Only called on in-bounds points.
    let index = |p: Point| p.y as usize * grid.width() + p.x as usize;

    let mut queue = VecDeque::from([start]);
    visited[index(start)] = true;
    let mut reached = 0;

    while let Some(p) = queue.pop_front() {
        if grid.get(p).is_some_and(Tile::counts_as_floor) {
            reached += 1;
        }
        for n in p.neighbors4() {
            if grid.get(n).is_some_and(Tile::is_passable) && !visited[index(n)] {
                visited[index(n)] = true;
                queue.push_back(n);
            }
        }
    }

    reached
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Feature, FeatureKind, Rect};

    fn grid(text: &str) -> Grid {
        text.parse().unwrap()
    }

    fn some_room() -> Room {
        Room::new(
            Rect::new(1, 1, 1, 1),
            Feature {
                at: Point::new(1, 1),
                kind: FeatureKind::Player,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_legal_pieces_exactly_one_each() {
        assert!((legal_pieces(&grid("PBK.\n")) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_legal_pieces_duplicate_boss() {
        assert!((legal_pieces(&grid("PBBK\n")) + 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_legal_pieces_none() {
        assert!(legal_pieces(&grid("....\n")).abs() < f64::EPSILON);
    }

    #[test]
    fn test_legal_pieces_partial() {
        assert!((legal_pieces(&grid("P...\n")) - 5.0).abs() < f64::EPSILON);
        assert!((legal_pieces(&grid("PB..\n")) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_counts() {
        let g = grid("#####\n#PER#\n#MT/#\n#####\n");
        let m = LevelMetrics::measure(&g, &[], &LevelConfig::default());
        assert_eq!(m.total, 20);
        // E, R, M, T, / count as floor; P does not.
        assert_eq!(m.floor, 5);
        assert_eq!(m.enemies, 2);
        assert_eq!(m.items, 1);
        assert_eq!(m.traps, 1);
        assert_eq!(m.doors, 1);
        assert!((m.leniency - 2.0).abs() < 1e-12);
        assert!((m.decoration_percentage - 4.0 / 20.0).abs() < 1e-12);
        assert!(m.room_count.abs() < f64::EPSILON);
    }

    #[test]
    fn test_reachability_stops_at_walls() {
        let g = grid("#######\n#P..#.#\n#.E.#K#\n#######\n");
        // Left pocket: four floor tiles and the enemy; the key pocket is sealed.
        assert_eq!(reachable_floor(&g), 5);
        let m = LevelMetrics::measure(&g, &[], &LevelConfig::default());
        assert_eq!(m.floor, 7);
        assert!((m.free_space - 5.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_reachability_without_player() {
        assert_eq!(reachable_floor(&grid("#...#\n")), 0);
    }

    #[test]
    fn test_room_count_bonus() {
        let g = grid("....\n");
        let config = LevelConfig::default();
        let five = vec![some_room(); 5];
        let six = vec![some_room(); 6];
        assert!(LevelMetrics::measure(&g, &five, &config).room_count.abs() < f64::EPSILON);
        assert!((LevelMetrics::measure(&g, &six, &config).room_count - 6.0 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_room_count_follows_room_cap() {
        let g = grid("....\n");
        let rooms = vec![some_room(); 6];
        let config = LevelConfig {
            max_rooms: 30,
            ..LevelConfig::default()
        };
        assert!((LevelMetrics::measure(&g, &rooms, &config).room_count - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_empty_room_list_scores_zero() {
        let g = grid("PBK.\n");
        let fitness = evaluate(&g, &[], &LevelConfig::default(), &FitnessWeights::default());
        assert!(fitness.abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_is_weighted_sum() {
        let g = grid("#####\n#PBK#\n#E.M#\n#####\n");
        let rooms = [some_room()];
        let config = LevelConfig::default();
        let weights = FitnessWeights::default();
        let m = LevelMetrics::measure(&g, &rooms, &config);
        let expected = 0.6 * m.free_space
            + 0.5 * m.leniency
            + 0.6 * m.free_percentage
            + 0.5 * m.decoration_percentage
            + m.room_count
            + 5.0 * m.legal_pieces;
        let fitness = evaluate(&g, &rooms, &config, &weights);
        assert!((fitness - expected).abs() < 1e-12);
        assert_eq!(fitness.to_bits(), evaluate(&g, &rooms, &config, &weights).to_bits());
    }
}
