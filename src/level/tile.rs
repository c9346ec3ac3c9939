//! The tile alphabet shared with the game.

use serde::{Deserialize, Serialize};

/// One cell of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tile {
    /// Solid rock outside the dungeon.
    Stone,
    /// Walkable floor.
    Floor,
    /// Wall bordering floor.
    Wall,
    /// Boss spawn.
    Boss,
    /// Item pickup.
    Item,
    /// Melee enemy spawn.
    Enemy,
    /// Ranged enemy spawn.
    Ranged,
    /// Trap.
    Trap,
    /// Door into the boss room.
    Door,
    /// Key that opens the boss room.
    Key,
    /// Player start.
    Player,
    /// Weapon pickup.
    Weapon,
}

impl Tile {
    /// Every tile, in alphabet order.
    pub const ALL: [Tile; 12] = [
        Tile::Stone,
        Tile::Floor,
        Tile::Wall,
        Tile::Boss,
        Tile::Item,
        Tile::Enemy,
        Tile::Ranged,
        Tile::Trap,
        Tile::Door,
        Tile::Key,
        Tile::Player,
        Tile::Weapon,
    ];

    /// Character used for this tile in level files.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Tile::Stone => '*',
            Tile::Floor => '.',
            Tile::Wall => '#',
            Tile::Boss => 'B',
            Tile::Item => 'M',
            Tile::Enemy => 'E',
            Tile::Ranged => 'R',
            Tile::Trap => 'T',
            Tile::Door => '/',
            Tile::Key => 'K',
            Tile::Player => 'P',
            Tile::Weapon => 'W',
        }
    }

    /// Parse a level-file character.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Tile> {
        Some(match symbol {
            '*' => Tile::Stone,
            '.' => Tile::Floor,
            '#' => Tile::Wall,
            'B' => Tile::Boss,
            'M' => Tile::Item,
            'E' => Tile::Enemy,
            'R' => Tile::Ranged,
            'T' => Tile::Trap,
            '/' => Tile::Door,
            'K' => Tile::Key,
            'P' => Tile::Player,
            'W' => Tile::Weapon,
            _ => return None,
        })
    }

    /// Anything a character can stand on.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Tile::Stone | Tile::Wall)
    }

    /// Tiles counted as floor by the fitness metrics.
    ///
    /// Player and weapon markers are not counted.
    #[must_use]
    pub const fn counts_as_floor(self) -> bool {
        matches!(
            self,
            Tile::Floor
                | Tile::Enemy
                | Tile::Item
                | Tile::Ranged
                | Tile::Trap
                | Tile::Boss
                | Tile::Door
                | Tile::Key
        )
    }
}

/// The special tile a room carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Player start.
    Player,
    /// Boss spawn; the room gets enforced walls and doors.
    Boss,
    /// Item pickup.
    Item,
    /// Melee enemy; the room may get a weapon.
    Enemy,
    /// Ranged enemy; the room may get a weapon.
    Ranged,
    /// Boss key.
    Key,
    /// Trap.
    Trap,
}

impl FeatureKind {
    /// Every feature kind, sampled uniformly when rooms are generated.
    pub const ALL: [FeatureKind; 7] = [
        FeatureKind::Player,
        FeatureKind::Boss,
        FeatureKind::Item,
        FeatureKind::Enemy,
        FeatureKind::Ranged,
        FeatureKind::Key,
        FeatureKind::Trap,
    ];

    /// Player, boss and key rooms are never removed or donated by crossover.
    #[must_use]
    pub const fn is_special(self) -> bool {
        matches!(self, FeatureKind::Player | FeatureKind::Boss | FeatureKind::Key)
    }

    /// Enemy rooms are where weapons get placed.
    #[must_use]
    pub const fn is_hostile(self) -> bool {
        matches!(self, FeatureKind::Enemy | FeatureKind::Ranged)
    }
}

impl From<FeatureKind> for Tile {
    fn from(kind: FeatureKind) -> Self {
        match kind {
            FeatureKind::Player => Tile::Player,
            FeatureKind::Boss => Tile::Boss,
            FeatureKind::Item => Tile::Item,
            FeatureKind::Enemy => Tile::Enemy,
            FeatureKind::Ranged => Tile::Ranged,
            FeatureKind::Key => Tile::Key,
            FeatureKind::Trap => Tile::Trap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_are_unique_and_parse_back() {
        let mut seen = std::collections::HashSet::new();
        for tile in Tile::ALL {
            assert!(seen.insert(tile.symbol()));
            assert_eq!(Tile::from_symbol(tile.symbol()), Some(tile));
        }
        assert_eq!(Tile::from_symbol('x'), None);
    }

    #[test]
    fn test_floor_class_excludes_player_and_weapon() {
        assert!(Tile::Door.counts_as_floor());
        assert!(Tile::Boss.counts_as_floor());
        assert!(!Tile::Player.counts_as_floor());
        assert!(!Tile::Weapon.counts_as_floor());
        assert!(!Tile::Wall.counts_as_floor());
        assert!(Tile::Player.is_passable());
        assert!(!Tile::Stone.is_passable());
    }

    #[test]
    fn test_special_features() {
        assert!(FeatureKind::Key.is_special());
        assert!(!FeatureKind::Trap.is_special());
        assert!(FeatureKind::Ranged.is_hostile());
        assert_eq!(Tile::from(FeatureKind::Boss), Tile::Boss);
    }
}
