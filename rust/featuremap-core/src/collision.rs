use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MapError, Result};
use crate::grid::WalkabilityGrid;
use crate::json_io;
use crate::navigation::Direction;

/// One tile of a per-tile collision map.
///
/// Polarity follows the file format, not the run-length codec: `c: false`
/// marks a walkable tile and a missing `c` means blocked. Directional flags
/// set to `false` block movement across that edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionTile {
    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    pub collision: Option<bool>,
    #[serde(rename = "f", default, skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<i64>,
    #[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
    pub north: Option<bool>,
    #[serde(rename = "s", default, skip_serializing_if = "Option::is_none")]
    pub south: Option<bool>,
    #[serde(rename = "e", default, skip_serializing_if = "Option::is_none")]
    pub east: Option<bool>,
    #[serde(rename = "w", default, skip_serializing_if = "Option::is_none")]
    pub west: Option<bool>,
}

impl CollisionTile {
    pub fn is_walkable(&self) -> bool {
        self.collision == Some(false)
    }

    pub fn is_blocked(&self) -> bool {
        !self.is_walkable()
    }

    pub fn is_blocked_toward(&self, dir: Direction) -> bool {
        let flag = match dir {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
        };
        flag == Some(false)
    }

    pub fn blocked_directions(&self) -> Vec<Direction> {
        Direction::ALL.into_iter().filter(|&d| self.is_blocked_toward(d)).collect()
    }
}

/// How the outer/inner arrays of a collision file map onto the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indexing {
    /// `[x][y]`, y growing north.
    #[default]
    ColumnMajor,
    /// `[row][col]`, first row is the north edge.
    RowMajor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionGrid {
    width: usize,
    height: usize,
    /// Column-major, bottom-to-top, same as [`WalkabilityGrid`].
    tiles: Vec<CollisionTile>,
}

impl CollisionGrid {
    pub fn from_nested(nested: Vec<Vec<CollisionTile>>, indexing: Indexing) -> Result<Self> {
        let outer = nested.len();
        let inner = nested.first().map(|v| v.len()).unwrap_or(0);
        for (i, v) in nested.iter().enumerate() {
            if v.len() != inner {
                return Err(MapError::IrregularLayout { line: i + 1, length: v.len(), expected: inner });
            }
        }
        let (width, height) = match indexing {
            Indexing::ColumnMajor => (outer, inner),
            Indexing::RowMajor => (inner, outer),
        };
        let mut tiles = vec![CollisionTile::default(); width * height];
        for (i, v) in nested.into_iter().enumerate() {
            for (j, tile) in v.into_iter().enumerate() {
                let (x, y) = match indexing {
                    Indexing::ColumnMajor => (i, j),
                    Indexing::RowMajor => (j, height - 1 - i),
                };
                tiles[x * height + y] = tile;
            }
        }
        Ok(Self { width, height, tiles })
    }

    pub fn load(path: impl AsRef<Path>, indexing: Indexing) -> Result<Self> {
        let path = path.as_ref();
        let nested: Vec<Vec<CollisionTile>> = json_io::load_json(path)?;
        let grid = Self::from_nested(nested, indexing)?;
        debug!(path = %path.display(), width = grid.width, height = grid.height, "loaded collision map");
        Ok(grid)
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    pub fn tile(&self, x: usize, y: usize) -> Option<&CollisionTile> {
        if x < self.width && y < self.height {
            self.tiles.get(x * self.height + y)
        } else {
            None
        }
    }

    /// Distinct feature ids present, ascending.
    pub fn feature_ids(&self) -> Vec<i64> {
        self.tiles.iter().filter_map(|t| t.feature_id).collect::<BTreeSet<_>>().into_iter().collect()
    }

    pub fn to_walkability(&self) -> WalkabilityGrid {
        let mut grid = WalkabilityGrid::filled(self.width, self.height, false);
        for x in 0..self.width {
            for y in 0..self.height {
                grid.set(x, y, self.tiles[x * self.height + y].is_walkable());
            }
        }
        grid
    }

    /// Rows from the north edge down.
    pub fn rows_north_first(&self) -> impl Iterator<Item = Vec<&CollisionTile>> + '_ {
        (0..self.height).rev().map(move |y| (0..self.width).map(|x| &self.tiles[x * self.height + y]).collect())
    }
}
