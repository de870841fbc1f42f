//! Run-length walkability codec.
//!
//! Feature data stores walkability at sub-tile resolution (4x4 cells per
//! game tile) as `[width_tiles, height_tiles, run_0, run_1, ...]`. Runs
//! alternate starting from walkable: even-indexed runs are walkable,
//! odd-indexed runs are blocked. A blocked south-west corner is written as a
//! leading zero-length walkable run.
//!
//! The per-tile collision format uses the opposite polarity: `c: false`
//! there means walkable.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{MapError, Result};
use crate::grid::WalkabilityGrid;

/// Sub-tiles per game tile along each axis.
pub const SUB_TILES_PER_TILE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLengthSequence {
    pub width_tiles: u32,
    pub height_tiles: u32,
    pub runs: Vec<u32>,
}

impl RunLengthSequence {
    /// Split a raw `d` array into its size header and runs.
    pub fn from_values(values: &[u32]) -> Result<Self> {
        match values {
            [w, h, runs @ ..] => Ok(Self { width_tiles: *w, height_tiles: *h, runs: runs.to_vec() }),
            _ => Err(MapError::MissingHeader(values.len())),
        }
    }

    pub fn to_values(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.runs.len() + 2);
        out.push(self.width_tiles);
        out.push(self.height_tiles);
        out.extend_from_slice(&self.runs);
        out
    }

    pub fn sub_tile_width(&self) -> usize { (self.width_tiles as usize).saturating_mul(SUB_TILES_PER_TILE) }
    pub fn sub_tile_height(&self) -> usize { (self.height_tiles as usize).saturating_mul(SUB_TILES_PER_TILE) }

    /// Number of sub-tiles the runs are expected to cover.
    pub fn sub_tile_area(&self) -> Result<usize> {
        self.sub_tile_width()
            .checked_mul(self.sub_tile_height())
            .ok_or(MapError::SizeOverflow { width: self.width_tiles as u64, height: self.height_tiles as u64 })
    }

    pub fn run_total(&self) -> u64 {
        self.runs.iter().map(|&r| r as u64).sum()
    }
}

impl Serialize for RunLengthSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_values().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RunLengthSequence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let values = Vec::<u32>::deserialize(deserializer)?;
        RunLengthSequence::from_values(&values).map_err(D::Error::custom)
    }
}

/// Expand alternating runs into a flat walkability list of exactly `expected` cells.
/// The run total is checked before allocating.
pub fn decode_with_area(runs: &[u32], expected: usize) -> Result<Vec<bool>> {
    let total: u64 = runs.iter().map(|&r| r as u64).sum();
    if total != expected as u64 {
        return Err(MapError::LengthMismatch { expected, actual: total as usize });
    }
    let mut out = Vec::with_capacity(expected);
    let mut walkable = true;
    for &run in runs {
        out.extend(std::iter::repeat(walkable).take(run as usize));
        walkable = !walkable;
    }
    Ok(out)
}

/// Decode a sequence into a sub-tile resolution grid.
pub fn decode(sequence: &RunLengthSequence) -> Result<WalkabilityGrid> {
    let cells = decode_with_area(&sequence.runs, sequence.sub_tile_area()?)?;
    WalkabilityGrid::from_column_major(sequence.sub_tile_width(), sequence.sub_tile_height(), cells)
}

/// Run-length encode a flat list, starting with a walkable run.
pub fn encode_cells(cells: &[bool]) -> Vec<u32> {
    let mut runs = Vec::new();
    let Some(&first) = cells.first() else { return runs };
    if !first {
        runs.push(0);
    }
    let mut current = first;
    let mut count = 0u32;
    for &cell in cells {
        if cell == current {
            count += 1;
        } else {
            runs.push(count);
            current = cell;
            count = 1;
        }
    }
    runs.push(count);
    runs
}

/// Encode a sub-tile resolution grid. Both dimensions must be whole game tiles.
pub fn encode(grid: &WalkabilityGrid) -> Result<RunLengthSequence> {
    check_divisible(grid, SUB_TILES_PER_TILE)?;
    Ok(RunLengthSequence {
        width_tiles: (grid.width() / SUB_TILES_PER_TILE) as u32,
        height_tiles: (grid.height() / SUB_TILES_PER_TILE) as u32,
        runs: encode_cells(grid.as_column_major()),
    })
}

/// Blow each cell up into a uniform `factor x factor` block.
pub fn expand(tiles: &WalkabilityGrid, factor: usize) -> WalkabilityGrid {
    let mut out = WalkabilityGrid::filled(tiles.width() * factor, tiles.height() * factor, false);
    for x in 0..out.width() {
        for y in 0..out.height() {
            out.set(x, y, tiles.is_walkable(x / factor, y / factor));
        }
    }
    out
}

/// Collapse `factor x factor` blocks into single cells.
///
/// A block is walkable only if every cell in it is walkable.
pub fn aggregate(sub_tiles: &WalkabilityGrid, factor: usize) -> Result<WalkabilityGrid> {
    check_divisible(sub_tiles, factor)?;
    let width = sub_tiles.width() / factor;
    let height = sub_tiles.height() / factor;
    let mut out = WalkabilityGrid::filled(width, height, false);
    for x in 0..width {
        for y in 0..height {
            let all_walkable = (0..factor)
                .all(|dx| (0..factor).all(|dy| sub_tiles.is_walkable(x * factor + dx, y * factor + dy)));
            out.set(x, y, all_walkable);
        }
    }
    Ok(out)
}

fn check_divisible(grid: &WalkabilityGrid, factor: usize) -> Result<()> {
    if factor == 0 || grid.width() % factor != 0 || grid.height() % factor != 0 {
        return Err(MapError::DimensionMismatch { width: grid.width(), height: grid.height(), factor });
    }
    Ok(())
}
