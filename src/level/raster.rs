//! Converts a room list and its corridors into a tile grid.
//!
//! Painting order matters: floors, corridors, derived walls, boss-room
//! walls and doors, weapons, and finally each room's feature tile, which
//! overwrites whatever ended up under it.

// Level dimensions are validated positive before rasterizing
#![allow(clippy::cast_sign_loss)]

use crate::config::LevelConfig;
use crate::error::RasterError;
use crate::level::corridor::Corridor;
use crate::level::geometry::{Point, Rect, Room};
use crate::level::grid::Grid;
use crate::level::tile::{FeatureKind, Tile};
use rand::Rng;
use rand::seq::SliceRandom;

/// Rasterize a layout.
///
/// # Errors
///
/// Returns an error if a room, corridor or feature lies outside the level.
pub fn rasterize<R: Rng + ?Sized>(
    config: &LevelConfig,
    rooms: &[Room],
    corridors: &[Corridor],
    rng: &mut R,
) -> Result<Grid, RasterError> {
    let mut canvas = Canvas::new(config)?;

    for room in rooms {
        canvas.fill_rect(&room.rect, Tile::Floor)?;
    }
    for corridor in corridors {
        for cell in corridor.cells() {
            canvas.paint(cell, Tile::Floor)?;
        }
    }

    derive_walls(&mut canvas.grid);

    let boss_rooms = rooms.iter().filter(|r| r.feature.kind == FeatureKind::Boss);
    for room in boss_rooms.clone() {
        enforce_boss_walls(&mut canvas.grid, &room.rect);
    }
    for room in boss_rooms {
        place_doors(&mut canvas.grid, &room.rect);
    }

    place_weapons(&mut canvas.grid, rooms, config.max_weapons, rng);

    for room in rooms {
        canvas.paint(room.feature.at, room.feature.kind.into())?;
    }

    Ok(canvas.grid)
}

/// Grid plus bounds-checked painting.
struct Canvas {
    grid: Grid,
}

impl Canvas {
    fn new(config: &LevelConfig) -> Result<Self, RasterError> {
        let (width, height) = (config.width.max(0) as usize, config.height.max(0) as usize);
        let grid = Grid::new(width, height).ok_or(RasterError {
            x: 0,
            y: 0,
            width,
            height,
        })?;
        Ok(Self { grid })
    }

    fn paint(&mut self, p: Point, tile: Tile) -> Result<(), RasterError> {
        if self.grid.set(p, tile) {
            Ok(())
        } else {
            Err(RasterError {
                x: p.x,
                y: p.y,
                width: self.grid.width(),
                height: self.grid.height(),
            })
        }
    }

    fn fill_rect(&mut self, rect: &Rect, tile: Tile) -> Result<(), RasterError> {
        for y in rect.y..=rect.bottom() {
            for x in rect.x..=rect.right() {
                self.paint(Point::new(x, y), tile)?;
            }
        }
        Ok(())
    }
}

/// Stamp walls on every stone cell touching interior floor (8-connected).
///
/// Single row-major pass; the outermost ring of the grid is never scanned.
fn derive_walls(grid: &mut Grid) {
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    let (width, height) = (grid.width() as i32, grid.height() as i32);
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let p = Point::new(x, y);
            if !grid.is(p, Tile::Floor) {
                continue;
            }
            for n in p.neighbors8() {
                if grid.is(n, Tile::Stone) {
                    grid.set(n, Tile::Wall);
                }
            }
        }
    }
}

/// Close the ring around a boss room so only doors can open it.
///
/// Corners become walls. Every floor cell on an edge of the ring ends up
/// with at least one wall beside it along that edge: if the cell before it
/// is a wall the cell after it is walled, otherwise the cell before it is.
fn enforce_boss_walls(grid: &mut Grid, rect: &Rect) {
    let (top, bottom) = (rect.y - 1, rect.bottom() + 1);
    let (left, right) = (rect.x - 1, rect.right() + 1);

    for corner in [
        Point::new(left, top),
        Point::new(right, top),
        Point::new(left, bottom),
        Point::new(right, bottom),
    ] {
        grid.set(corner, Tile::Wall);
    }

    for row in [top, bottom] {
        for x in rect.x..=rect.right() {
            close_gap(grid, Point::new(x, row), Point::new(x - 1, row), Point::new(x + 1, row));
        }
    }
    for col in [left, right] {
        for y in rect.y..=rect.bottom() {
            close_gap(grid, Point::new(col, y), Point::new(col, y - 1), Point::new(col, y + 1));
        }
    }
}

fn close_gap(grid: &mut Grid, cell: Point, before: Point, after: Point) {
    if !grid.is(cell, Tile::Floor) {
        return;
    }
    match (grid.is(before, Tile::Wall), grid.is(after, Tile::Wall)) {
        (true, true) => {}
        (true, false) => {
            grid.set(after, Tile::Wall);
        }
        _ => {
            grid.set(before, Tile::Wall);
        }
    }
}

/// Turn every floor cell left on a boss room's ring into a door.
fn place_doors(grid: &mut Grid, rect: &Rect) {
    for p in ring(rect) {
        if grid.is(p, Tile::Floor) {
            grid.set(p, Tile::Door);
        }
    }
}

/// Cells one step outside `rect`, corners included.
pub fn ring(rect: &Rect) -> impl Iterator<Item = Point> {
    let (top, bottom) = (rect.y - 1, rect.bottom() + 1);
    let (left, right) = (rect.x - 1, rect.right() + 1);
    let rows = (left..=right).flat_map(move |x| [Point::new(x, top), Point::new(x, bottom)]);
    let cols = (rect.y..=rect.bottom()).flat_map(move |y| [Point::new(left, y), Point::new(right, y)]);
    rows.chain(cols)
}

/// Drop up to `max_weapons` weapons, one per enemy room, on a random
/// corner of the room if that corner is still plain floor.
fn place_weapons<R: Rng + ?Sized>(grid: &mut Grid, rooms: &[Room], max_weapons: usize, rng: &mut R) {
    let mut placed = 0;
    for room in rooms.iter().filter(|r| r.feature.kind.is_hostile()) {
        if placed >= max_weapons {
            break;
        }
        let corners = room.rect.corners();
        if let Some(&spot) = corners.choose(rng)
            && grid.is(spot, Tile::Floor)
        {
            grid.set(spot, Tile::Weapon);
            placed += 1;
        }
    }
}
