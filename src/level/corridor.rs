//! Corridor routing between rooms.
//!
//! A corridor is two or three waypoints: a straight segment, or two
//! axis-aligned segments sharing a bend.

use crate::config::LevelConfig;
use crate::level::geometry::{Point, Rect};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which way an L-shaped corridor bends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bend {
    /// Vertical first: `(x1,y1) → (x1,y2) → (x2,y2)`.
    Top,
    /// Horizontal first: `(x1,y1) → (x2,y1) → (x2,y2)`.
    Bottom,
}

impl Bend {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) { Bend::Top } else { Bend::Bottom }
    }
}

/// An ordered run of 2 or 3 waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Corridor {
    points: [Point; 3],
    len: u8,
}

impl Corridor {
    /// A single straight segment.
    #[must_use]
    pub const fn straight(from: Point, to: Point) -> Self {
        Self {
            points: [from, to, to],
            len: 2,
        }
    }

    /// Two segments sharing `bend`.
    #[must_use]
    pub const fn bent(from: Point, bend: Point, to: Point) -> Self {
        Self {
            points: [from, bend, to],
            len: 3,
        }
    }

    /// The waypoints, in order.
    #[must_use]
    pub fn waypoints(&self) -> &[Point] {
        &self.points[..usize::from(self.len)]
    }

    /// Consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.waypoints().windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Every cell the corridor covers, segment by segment (bends repeat).
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.segments().flat_map(|(a, b)| {
            let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
            let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
            (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| Point::new(x, y)))
        })
    }

    /// Whether every segment moves along a single axis.
    #[must_use]
    pub fn is_axis_aligned(&self) -> bool {
        self.segments().all(|(a, b)| a.x == b.x || a.y == b.y)
    }
}

/// Builds corridors for one layout. Every join is appended, never replaced.
#[derive(Debug)]
pub struct Router<'a> {
    config: &'a LevelConfig,
    corridors: Vec<Corridor>,
}

impl<'a> Router<'a> {
    /// Create an empty router for a level.
    #[must_use]
    pub const fn new(config: &'a LevelConfig) -> Self {
        Self {
            config,
            corridors: Vec::new(),
        }
    }

    /// Corridors built so far.
    #[must_use]
    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    /// Finish routing.
    #[must_use]
    pub fn into_corridors(self) -> Vec<Corridor> {
        self.corridors
    }

    /// Corridor between two points.
    ///
    /// Points sharing a row or column get a straight corridor. Otherwise the
    /// bend side is forced to [`Bend::Bottom`] when a point touches row/column
    /// 0 or 1, to [`Bend::Top`] when a point touches the last two rows or
    /// columns, and falls back to `hint` or a coin flip.
    pub fn corridor_between_points<R: Rng + ?Sized>(
        &self,
        from: Point,
        to: Point,
        hint: Option<Bend>,
        rng: &mut R,
    ) -> Corridor {
        if from.x == to.x || from.y == to.y {
            return Corridor::straight(from, to);
        }

        let near = |v: i32| v == 0 || v == 1;
        let far_x = |v: i32| v == self.config.width - 1 || v == self.config.width - 2;
        let far_y = |v: i32| v == self.config.height - 1 || v == self.config.height - 2;

        let bend = if near(from.x) || near(to.x) || near(from.y) || near(to.y) {
            Bend::Bottom
        } else if far_x(from.x) || far_x(to.x) || far_y(from.y) || far_y(to.y) {
            Bend::Top
        } else {
            hint.unwrap_or_else(|| Bend::random(rng))
        };

        match bend {
            Bend::Top => Corridor::bent(from, Point::new(from.x, to.y), to),
            Bend::Bottom => Corridor::bent(from, Point::new(to.x, from.y), to),
        }
    }

    /// Join two rectangles and append the corridor.
    ///
    /// Rectangles are ordered left to right first. Rooms sharing columns get
    /// a vertical corridor, rooms sharing rows a horizontal one, and anything
    /// else an L-bend leaving from one room's side.
    pub fn join_rooms<R: Rng + ?Sized>(
        &mut self,
        a: &Rect,
        b: &Rect,
        hint: Option<Bend>,
        rng: &mut R,
    ) -> Corridor {
        let (left, right) = if (a.x, a.y, a.w, a.h) <= (b.x, b.y, b.w, b.h) {
            (a, b)
        } else {
            (b, a)
        };

        let corridor = if left.x <= right.right() && right.x <= left.right() {
            let x = rng.gen_range(right.x..=left.right().min(right.right()));
            let (y1, y2) = inner_span(left.y, left.bottom(), right.y, right.bottom());
            self.corridor_between_points(Point::new(x, y1), Point::new(x, y2), None, rng)
        } else if left.y <= right.bottom() && right.y <= left.bottom() {
            let y = rng.gen_range(left.y.max(right.y)..=left.bottom().min(right.bottom()));
            let (x1, x2) = inner_span(left.x, left.right(), right.x, right.right());
            self.corridor_between_points(Point::new(x1, y), Point::new(x2, y), None, rng)
        } else {
            self.join_diagonal(left, right, hint, rng)
        };

        self.corridors.push(corridor);
        corridor
    }

    /// L-bend between rooms that share neither rows nor columns.
    fn join_diagonal<R: Rng + ?Sized>(
        &self,
        left: &Rect,
        right: &Rect,
        hint: Option<Bend>,
        rng: &mut R,
    ) -> Corridor {
        let side = hint.unwrap_or_else(|| Bend::random(rng));
        let right_is_lower = right.y > left.y;

        let (from, to, bend) = match (side, right_is_lower) {
            (Bend::Top, true) => (
                Point::new(left.right() + 1, rng.gen_range(left.y..=left.bottom())),
                Point::new(rng.gen_range(right.x..=right.right()), right.y - 1),
                Bend::Bottom,
            ),
            (Bend::Top, false) => (
                Point::new(rng.gen_range(left.x..=left.right()), left.y - 1),
                Point::new(right.x - 1, rng.gen_range(right.y..=right.bottom())),
                Bend::Top,
            ),
            (Bend::Bottom, true) => (
                Point::new(rng.gen_range(left.x..=left.right()), left.bottom() + 1),
                Point::new(right.x - 1, rng.gen_range(right.y..=right.bottom())),
                Bend::Top,
            ),
            (Bend::Bottom, false) => (
                Point::new(left.right() + 1, rng.gen_range(left.y..=left.bottom())),
                Point::new(rng.gen_range(right.x..=right.right()), right.bottom() + 1),
                Bend::Bottom,
            ),
        };

        self.corridor_between_points(from, to, Some(bend), rng)
    }
}

/// Second-smallest and second-largest of two closed ranges, each pulled one
/// cell inward.
fn inner_span(a0: i32, a1: i32, b0: i32, b1: i32) -> (i32, i32) {
    let mut bounds = [a0, a1, b0, b1];
    bounds.sort_unstable();
    (bounds[1] + 1, bounds[2] - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn in_level(p: Point, config: &LevelConfig) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < config.width && p.y < config.height
    }

    #[test]
    fn test_straight_when_aligned() {
        let config = LevelConfig::default();
        let router = Router::new(&config);
        let mut rng = SmallRng::seed_from_u64(1);

        let c = router.corridor_between_points(Point::new(5, 5), Point::new(5, 20), None, &mut rng);
        assert_eq!(c.waypoints(), &[Point::new(5, 5), Point::new(5, 20)]);

        let same = router.corridor_between_points(Point::new(7, 7), Point::new(7, 7), None, &mut rng);
        assert_eq!(same.waypoints().len(), 2);
    }

    #[test]
    fn test_bend_shapes() {
        let config = LevelConfig::default();
        let router = Router::new(&config);
        let mut rng = SmallRng::seed_from_u64(1);
        let (a, b) = (Point::new(10, 10), Point::new(20, 30));

        let top = router.corridor_between_points(a, b, Some(Bend::Top), &mut rng);
        assert_eq!(top.waypoints(), &[a, Point::new(10, 30), b]);

        let bottom = router.corridor_between_points(a, b, Some(Bend::Bottom), &mut rng);
        assert_eq!(bottom.waypoints(), &[a, Point::new(20, 10), b]);
    }

    #[test]
    fn test_boundary_forces_bend() {
        let config = LevelConfig::default();
        let router = Router::new(&config);
        let mut rng = SmallRng::seed_from_u64(1);

        let near = router.corridor_between_points(Point::new(1, 10), Point::new(20, 30), Some(Bend::Top), &mut rng);
        assert_eq!(near.waypoints()[1], Point::new(20, 10));

        let far = router.corridor_between_points(Point::new(10, 10), Point::new(62, 30), Some(Bend::Bottom), &mut rng);
        assert_eq!(far.waypoints()[1], Point::new(10, 30));
    }

    #[test]
    fn test_join_x_overlap_is_vertical() {
        let config = LevelConfig::default();
        let mut router = Router::new(&config);
        let mut rng = SmallRng::seed_from_u64(3);
        let a = Rect::new(10, 5, 6, 4);
        let b = Rect::new(12, 20, 6, 4);

        let c = router.join_rooms(&a, &b, None, &mut rng);
        let pts = c.waypoints();
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0].x, pts[1].x);
        assert!((12..=15).contains(&pts[0].x));
        assert_eq!(pts[0].y, 9);
        assert_eq!(pts[1].y, 19);
    }

    #[test]
    fn test_join_y_overlap_is_horizontal() {
        let config = LevelConfig::default();
        let mut router = Router::new(&config);
        let mut rng = SmallRng::seed_from_u64(4);
        let a = Rect::new(30, 10, 5, 8);
        let b = Rect::new(5, 12, 5, 3);

        let c = router.join_rooms(&a, &b, None, &mut rng);
        let pts = c.waypoints();
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0].y, pts[1].y);
        assert!((12..=14).contains(&pts[0].y));
        assert_eq!(pts[0].x, 10);
        assert_eq!(pts[1].x, 29);
    }

    #[test]
    fn test_joins_append() {
        let config = LevelConfig::default();
        let mut router = Router::new(&config);
        let mut rng = SmallRng::seed_from_u64(5);
        let a = Rect::new(2, 2, 5, 5);
        let b = Rect::new(40, 40, 5, 5);
        let c = Rect::new(20, 2, 5, 5);

        router.join_rooms(&a, &b, None, &mut rng);
        router.join_rooms(&b, &c, None, &mut rng);
        router.join_rooms(&a, &a, None, &mut rng);
        assert_eq!(router.corridors().len(), 3);
        assert_eq!(router.into_corridors().len(), 3);
    }

    #[test]
    fn test_diagonal_joins_stay_in_bounds() {
        let config = LevelConfig::default();
        let mut rng = SmallRng::seed_from_u64(9);
        let a = Rect::new(1, 1, 5, 5);
        let b = Rect::new(50, 50, 13, 13);
        let c = Rect::new(1, 58, 5, 5);

        for hint in [None, Some(Bend::Top), Some(Bend::Bottom)] {
            for _ in 0..50 {
                let mut router = Router::new(&config);
                for (p, q) in [(&a, &b), (&b, &c), (&c, &a), (&a, &c)] {
                    let corridor = router.join_rooms(p, q, hint, &mut rng);
                    assert!(corridor.is_axis_aligned());
                    assert!(corridor.waypoints().iter().all(|&w| in_level(w, &config)));
                }
            }
        }
    }

    #[test]
    fn test_cells_cover_both_segments() {
        let c = Corridor::bent(Point::new(1, 1), Point::new(1, 3), Point::new(4, 3));
        let cells: Vec<Point> = c.cells().collect();
        assert!(cells.contains(&Point::new(1, 2)));
        assert!(cells.contains(&Point::new(3, 3)));
        assert_eq!(cells.len(), 3 + 4);
    }
}
