//! Fixed-size tile grid and its text format.

// Grid dimensions always fit in i32 coordinates
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]

use crate::error::GridError;
use crate::level::geometry::Point;
use crate::level::tile::Tile;
use std::fmt;
use std::str::FromStr;

/// A rasterized level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Width in tiles.
    width: usize,
    /// Height in tiles.
    height: usize,
    /// Tiles stored in row-major order.
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create a grid filled with stone.
    ///
    /// Returns `None` if width or height is zero.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Option<Self> {
        Self::filled(width, height, Tile::Stone)
    }

    /// Create a grid filled with `tile`.
    ///
    /// Returns `None` if width or height is zero.
    #[must_use]
    pub fn filled(width: usize, height: usize, tile: Tile) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            width,
            height,
            tiles: vec![tile; width * height],
        })
    }

    /// Width in tiles.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Raw tiles in row-major order.
    #[must_use]
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Whether a coordinate is inside the grid.
    #[must_use]
    pub const fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    fn index(&self, p: Point) -> Option<usize> {
        if self.in_bounds(p) {
            Some(p.y as usize * self.width + p.x as usize)
        } else {
            None
        }
    }

    /// Tile at `p`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, p: Point) -> Option<Tile> {
        self.index(p).map(|idx| self.tiles[idx])
    }

    /// Whether the tile at `p` is `tile`. Always false outside the grid.
    #[must_use]
    pub fn is(&self, p: Point, tile: Tile) -> bool {
        self.get(p) == Some(tile)
    }

    /// Set the tile at `p`.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, p: Point, tile: Tile) -> bool {
        if let Some(idx) = self.index(p) {
            self.tiles[idx] = tile;
            true
        } else {
            false
        }
    }

    /// Iterate over all coordinates and tiles.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Tile)> + '_ {
        self.tiles.iter().enumerate().map(|(idx, &tile)| {
            let x = (idx % self.width) as i32;
            let y = (idx / self.width) as i32;
            (Point::new(x, y), tile)
        })
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width)
    }

    /// Count tiles of one kind.
    #[must_use]
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Position of the first `tile` in row-major order.
    #[must_use]
    pub fn find(&self, tile: Tile) -> Option<Point> {
        self.iter().find(|&(_, t)| t == tile).map(|(p, _)| p)
    }

    /// Render as level text: one line per row, each ending in `\n`.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.rows() {
            out.extend(row.iter().map(|t| t.symbol()));
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut width = 0;
        let mut height = 0;
        let mut tiles = Vec::new();

        for (row, line) in s.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let before = tiles.len();
            for (col, symbol) in line.chars().enumerate() {
                let tile = Tile::from_symbol(symbol).ok_or(GridError::UnknownSymbol { symbol, row, col })?;
                tiles.push(tile);
            }
            let found = tiles.len() - before;
            if height == 0 {
                width = found;
            } else if found != width {
                return Err(GridError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            height += 1;
        }

        if height == 0 {
            return Err(GridError::Empty);
        }
        Ok(Self { width, height, tiles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(8, 5).unwrap();
        assert_eq!(grid.width(), 8);
        assert_eq!(grid.height(), 5);
        assert_eq!(grid.count(Tile::Stone), 40);
    }

    #[test]
    fn test_grid_zero_size() {
        assert!(Grid::new(0, 10).is_none());
        assert!(Grid::new(10, 0).is_none());
    }

    #[test]
    fn test_grid_get_set_bounds() {
        let mut grid = Grid::new(4, 4).unwrap();
        assert!(grid.set(Point::new(3, 3), Tile::Floor));
        assert_eq!(grid.get(Point::new(3, 3)), Some(Tile::Floor));
        assert!(!grid.set(Point::new(4, 0), Tile::Floor));
        assert!(!grid.set(Point::new(0, -1), Tile::Floor));
        assert_eq!(grid.get(Point::new(-1, 0)), None);
        assert!(!grid.is(Point::new(9, 9), Tile::Stone));
    }

    #[test]
    fn test_text_format() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set(Point::new(1, 0), Tile::Player);
        grid.set(Point::new(2, 1), Tile::Door);
        assert_eq!(grid.to_text(), "*P*\n**/\n");
        assert_eq!(grid.to_string(), grid.to_text());
    }

    #[test]
    fn test_parse_text() {
        let grid: Grid = "#..#\n#PK#\n".parse().unwrap();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.find(Tile::Key), Some(Point::new(2, 1)));
        assert_eq!(grid.to_text(), "#..#\n#PK#\n");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Grid>(), Err(GridError::Empty));
        assert_eq!(
            "##\n###\n".parse::<Grid>(),
            Err(GridError::RaggedRow {
                row: 1,
                expected: 2,
                found: 3
            })
        );
        assert_eq!(
            "#?\n".parse::<Grid>(),
            Err(GridError::UnknownSymbol {
                symbol: '?',
                row: 0,
                col: 1
            })
        );
    }
}
