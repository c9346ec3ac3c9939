//! Rooms, rectangles and the overlap test every placement goes through.

use crate::config::LevelConfig;
use crate::level::tile::FeatureKind;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A grid coordinate. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The eight surrounding cells, clockwise from the top-left.
    #[must_use]
    pub const fn neighbors8(self) -> [Point; 8] {
        let Point { x, y } = self;
        [
            Point::new(x - 1, y - 1),
            Point::new(x, y - 1),
            Point::new(x + 1, y - 1),
            Point::new(x + 1, y),
            Point::new(x + 1, y + 1),
            Point::new(x, y + 1),
            Point::new(x - 1, y + 1),
            Point::new(x - 1, y),
        ]
    }

    /// Up, down, left, right.
    #[must_use]
    pub const fn neighbors4(self) -> [Point; 4] {
        let Point { x, y } = self;
        [
            Point::new(x, y - 1),
            Point::new(x, y + 1),
            Point::new(x - 1, y),
            Point::new(x + 1, y),
        ]
    }
}

/// Axis-aligned rectangle: top-left corner plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left column.
    pub x: i32,
    /// Top row.
    pub y: i32,
    /// Width in cells (at least 1).
    pub w: i32,
    /// Height in cells (at least 1).
    pub h: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rightmost column inside the rectangle.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.w - 1
    }

    /// Bottom row inside the rectangle.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.h - 1
    }

    /// Whether `p` lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// The four corner cells inside the rectangle.
    #[must_use]
    pub const fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.x, self.bottom()),
            Point::new(self.right(), self.bottom()),
        ]
    }

    /// Whether the rectangle keeps a 1-cell margin inside a level.
    #[must_use]
    pub const fn fits_with_margin(&self, width: i32, height: i32) -> bool {
        self.w >= 1 && self.h >= 1 && self.x >= 1 && self.y >= 1
            && self.x + self.w < width
            && self.y + self.h < height
    }
}

/// Whether two rectangles overlap or touch.
///
/// Each rectangle is grown by one cell on its far (right and bottom) side
/// before the intersection test, so accepted rectangles always keep at least
/// one cell between them for walls. The test is symmetric.
#[must_use]
pub const fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w + 1 && b.x < a.x + a.w + 1 && a.y < b.y + b.h + 1 && b.y < a.y + a.h + 1
}

/// Whether `rect` overlaps any room in `rooms`.
#[must_use]
pub fn overlaps_any(rect: &Rect, rooms: &[Room]) -> bool {
    rooms.iter().any(|room| overlaps(rect, &room.rect))
}

/// The single special tile a room carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Feature {
    /// Where the tile is stamped; always inside the room.
    pub at: Point,
    /// Which tile.
    pub kind: FeatureKind,
}

/// A room of a candidate dungeon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// Floor rectangle.
    pub rect: Rect,
    /// Special tile.
    pub feature: Feature,
}

impl Room {
    /// Create a room. Returns `None` if the feature lies outside the rectangle.
    #[must_use]
    pub const fn new(rect: Rect, feature: Feature) -> Option<Self> {
        if rect.contains(feature.at) {
            Some(Self { rect, feature })
        } else {
            None
        }
    }

    /// Sample a room that fits the level with a 1-cell margin.
    ///
    /// Assumes `config` has been validated.
    pub fn random<R: Rng + ?Sized>(config: &LevelConfig, rng: &mut R) -> Self {
        let w = rng.gen_range(config.min_room_extent..=config.max_room_extent);
        let h = rng.gen_range(config.min_room_extent..=config.max_room_extent);
        let x = rng.gen_range(1..=config.width - w - 1);
        let y = rng.gen_range(1..=config.height - h - 1);
        let at = Point::new(rng.gen_range(x..=x + w - 1), rng.gen_range(y..=y + h - 1));
        let kind = *FeatureKind::ALL.choose(rng).unwrap_or(&FeatureKind::Item);

        Self {
            rect: Rect::new(x, y, w, h),
            feature: Feature { at, kind },
        }
    }

    /// Whether crossover must keep this room.
    #[must_use]
    pub const fn is_special(&self) -> bool {
        self.feature.kind.is_special()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_overlap_detects_intersection() {
        let a = Rect::new(2, 2, 4, 4);
        let b = Rect::new(4, 4, 4, 4);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn test_overlap_rejects_touching_rooms() {
        // b starts in the column right after a ends: no room for a wall.
        let a = Rect::new(2, 2, 3, 3);
        let b = Rect::new(5, 2, 3, 3);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn test_overlap_accepts_one_cell_gap() {
        let a = Rect::new(2, 2, 3, 3);
        let b = Rect::new(6, 2, 3, 3);
        assert!(!overlaps(&a, &b));
        assert!(!overlaps(&b, &a));

        let below = Rect::new(2, 6, 3, 3);
        assert!(!overlaps(&a, &below));
    }

    #[test]
    fn test_overlaps_any_short_circuits() {
        let feature = Feature {
            at: Point::new(1, 1),
            kind: FeatureKind::Item,
        };
        let rooms = vec![
            Room::new(Rect::new(1, 1, 2, 2), feature).unwrap(),
            Room::new(Rect::new(20, 20, 2, 2), Feature { at: Point::new(20, 20), ..feature }).unwrap(),
        ];
        assert!(overlaps_any(&Rect::new(19, 19, 2, 2), &rooms));
        assert!(!overlaps_any(&Rect::new(10, 10, 2, 2), &rooms));
        assert!(!overlaps_any(&Rect::new(10, 10, 2, 2), &[]));
    }

    #[test]
    fn test_room_new_requires_feature_inside() {
        let rect = Rect::new(3, 3, 2, 2);
        let inside = Feature {
            at: Point::new(4, 4),
            kind: FeatureKind::Trap,
        };
        let outside = Feature {
            at: Point::new(5, 4),
            kind: FeatureKind::Trap,
        };
        assert!(Room::new(rect, inside).is_some());
        assert!(Room::new(rect, outside).is_none());
    }

    #[test]
    fn test_random_rooms_fit_level() {
        let config = LevelConfig::default();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..500 {
            let room = Room::random(&config, &mut rng);
            assert!(room.rect.fits_with_margin(config.width, config.height));
            assert!(room.rect.contains(room.feature.at));
            assert!(room.rect.w >= config.min_room_extent);
            assert!(room.rect.h <= config.max_room_extent);
        }
    }

    #[test]
    fn test_rect_helpers() {
        let r = Rect::new(1, 1, 3, 3);
        assert_eq!(r.right(), 3);
        assert_eq!(r.bottom(), 3);
        assert!(r.corners().iter().all(|&c| r.contains(c)));
        assert_eq!(Point::new(5, 5).neighbors8().len(), 8);
    }
}
