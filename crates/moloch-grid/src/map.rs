//! Grid map: the read-only collision oracle consumed by the rules engine.
//!
//! A [`GridMap`] stores one tile ID per cell in row-major order together with
//! the [`CollisionSet`] that decides which IDs block. The engine only ever asks
//! one question of it, through the [`CollisionOracle`] trait:
//! "does this tile collide?". Out-of-bounds tiles always collide.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::{CollisionSet, TileProperties};
use crate::TileCoord;

/// Tile ID that [`GridMap::from_ascii`] assigns to `#` cells.
pub const ASCII_WALL_TILE: u32 = 1;

/// Errors raised while building a grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Tile buffer length disagrees with the declared dimensions
    #[error("grid is {width}x{height} but {actual} tiles were supplied")]
    DimensionMismatch {
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
        /// Number of tiles supplied
        actual: usize,
    },
    /// Grid has zero width or height
    #[error("grid must have at least one tile")]
    Empty,
    /// Rows of different lengths
    #[error("row {row} has {actual} tiles, expected {expected}")]
    RaggedRow {
        /// Offending row index
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        actual: usize,
    },
    /// Colliding range with `start > end`
    #[error("collision range {start}..={end} is inverted")]
    InvertedRange {
        /// Range start
        start: u32,
        /// Range end
        end: u32,
    },
    /// Unrecognised character in an ASCII map
    #[error("unknown map glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph {
        /// The character
        glyph: char,
        /// Row index
        row: usize,
        /// Column index
        column: usize,
    },
}

/// Read-only collision query.
///
/// This is the whole contract between the rules engine and the tile map.
/// Implementations must be pure: the same tile always gives the same answer
/// for the lifetime of a match.
pub trait CollisionOracle {
    /// Returns true if `tile` is out of bounds or blocks movement.
    fn collides(&self, tile: TileCoord) -> bool;
}

/// A rectangular field of tile IDs with a collision set.
///
/// # Example
///
/// ```
/// use moloch_grid::{CollisionOracle, CollisionSet, GridMap, TileCoord};
///
/// let collision = CollisionSet::from_ranges(&[(54, 83)]).unwrap();
/// let grid = GridMap::new(3, 1, vec![1, 60, 1], collision).unwrap();
///
/// assert!(!grid.collides(TileCoord::new(0, 0)));
/// assert!(grid.collides(TileCoord::new(1, 0)));
/// assert!(grid.collides(TileCoord::new(3, 0))); // out of bounds
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMap {
    width: u32,
    height: u32,
    tiles: Vec<u32>,
    collision: CollisionSet,
}

impl GridMap {
    /// Creates a grid from a row-major tile buffer.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Empty`] for a zero dimension and
    /// [`GridError::DimensionMismatch`] if `tiles.len() != width * height`.
    pub fn new(
        width: u32,
        height: u32,
        tiles: Vec<u32>,
        collision: CollisionSet,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        let expected = u64::from(width) * u64::from(height);
        if tiles.len() as u64 != expected {
            return Err(GridError::DimensionMismatch {
                width,
                height,
                actual: tiles.len(),
            });
        }
        Ok(Self {
            width,
            height,
            tiles,
            collision,
        })
    }

    /// Creates a grid from rows of tile IDs (`rows[y][x]`).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::RaggedRow`] when rows differ in length, plus the
    /// errors of [`GridMap::new`].
    pub fn from_rows(rows: &[Vec<u32>], collision: CollisionSet) -> Result<Self, GridError> {
        let expected = rows.first().map_or(0, Vec::len);
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(GridError::RaggedRow {
                row,
                expected,
                actual: r.len(),
            });
        }
        let width = u32::try_from(expected).map_err(|_| GridError::Empty)?;
        let height = u32::try_from(rows.len()).map_err(|_| GridError::Empty)?;
        Self::new(width, height, rows.concat(), collision)
    }

    /// Parses a small ASCII map: `#` is a wall, `.` is floor.
    ///
    /// Lines are trimmed; blank lines are skipped. Walls get tile ID
    /// [`ASCII_WALL_TILE`] and floor gets `0`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownGlyph`] for any other character, plus the
    /// errors of [`GridMap::from_rows`].
    pub fn from_ascii(map: &str) -> Result<Self, GridError> {
        let rows = map
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(row, line)| {
                line.chars()
                    .enumerate()
                    .map(|(column, glyph)| match glyph {
                        '#' => Ok(ASCII_WALL_TILE),
                        '.' => Ok(0),
                        _ => Err(GridError::UnknownGlyph { glyph, row, column }),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut collision = CollisionSet::new();
        collision.insert(ASCII_WALL_TILE);
        Self::from_rows(&rows, collision)
    }

    /// Creates a grid of walkable floor with no collision set.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Empty`] for a zero dimension.
    pub fn open(width: u32, height: u32) -> Result<Self, GridError> {
        let len = usize::try_from(u64::from(width) * u64::from(height)).map_err(|_| GridError::Empty)?;
        Self::new(width, height, vec![0; len], CollisionSet::new())
    }

    /// Width in tiles.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in tiles.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major tile buffer.
    #[must_use]
    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    /// The collision set this map was built with.
    #[must_use]
    pub fn collision_set(&self) -> &CollisionSet {
        &self.collision
    }

    /// Returns true if `tile` lies inside the map.
    #[must_use]
    pub fn in_bounds(&self, tile: TileCoord) -> bool {
        self.index_of(tile).is_some()
    }

    /// Returns the tile ID at `tile`, or `None` when out of bounds.
    #[must_use]
    pub fn tile_id(&self, tile: TileCoord) -> Option<u32> {
        self.index_of(tile).map(|i| self.tiles[i])
    }

    fn index_of(&self, tile: TileCoord) -> Option<usize> {
        let x = u32::try_from(tile.x).ok()?;
        let y = u32::try_from(tile.y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        usize::try_from(u64::from(y) * u64::from(self.width) + u64::from(x)).ok()
    }
}

impl CollisionOracle for GridMap {
    fn collides(&self, tile: TileCoord) -> bool {
        self.tile_id(tile)
            .map_or(true, |id| self.collision.contains(id))
    }
}

/// Serializable description of a grid, as found in scenario files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridConfig {
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    /// Row-major tile IDs
    pub tiles: Vec<u32>,
    /// Inclusive colliding tile-ID ranges
    #[serde(default)]
    pub colliding_ranges: Vec<(u32, u32)>,
    /// Tileset properties keyed by tile ID
    #[serde(default)]
    pub tile_properties: BTreeMap<u32, TileProperties>,
}

impl GridConfig {
    /// Builds the grid described by this config.
    ///
    /// # Errors
    ///
    /// Propagates range and dimension errors.
    pub fn build(&self) -> Result<GridMap, GridError> {
        let collision = CollisionSet::from_ranges(&self.colliding_ranges)?
            .with_tile_properties(self.tile_properties.iter().map(|(id, p)| (*id, *p)));
        GridMap::new(self.width, self.height, self.tiles.clone(), collision)
    }
}
