//! Placement of feature grids on a shared canvas.
//!
//! Source coordinates grow northward; canvas rows grow southward. Every
//! placement goes through [`Bounds::canvas_row`] so the flip is applied
//! exactly once.

use crate::error::{MapError, Result};
use crate::feature::FeatureRecord;
use crate::grid::WalkabilityGrid;

/// Global tile bounds; `max_*` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    pub fn width(&self) -> usize { (self.max_x as i64 - self.min_x as i64).max(0) as usize }
    pub fn height(&self) -> usize { (self.max_y as i64 - self.min_y as i64).max(0) as usize }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.min_x..self.max_x).contains(&x) && (self.min_y..self.max_y).contains(&y)
    }

    pub fn canvas_col(&self, source_x: i32) -> usize {
        (source_x as i64 - self.min_x as i64) as usize
    }

    /// `max_y - source_y - 1`
    pub fn canvas_row(&self, source_y: i32) -> usize {
        (self.max_y as i64 - source_y as i64 - 1) as usize
    }
}

/// Smallest bounds covering every feature.
pub fn compute_bounds<'a>(features: impl IntoIterator<Item = &'a FeatureRecord>) -> Result<Bounds> {
    let mut iter = features.into_iter();
    let first = iter.next().ok_or(MapError::EmptyInput("no features to bound"))?;
    let init = Bounds { min_x: first.origin.x, min_y: first.origin.y, max_x: first.end_x(), max_y: first.end_y() };
    Ok(iter.fold(init, |b, f| Bounds {
        min_x: b.min_x.min(f.origin.x),
        min_y: b.min_y.min(f.origin.y),
        max_x: b.max_x.max(f.end_x()),
        max_y: b.max_y.max(f.end_y()),
    }))
}

/// A feature's rectangle in canvas cells; `row` is its northern edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub col: usize,
    pub row: usize,
    pub width: usize,
    pub height: usize,
}

pub fn place_feature(feature: &FeatureRecord, bounds: &Bounds) -> CellRect {
    CellRect {
        col: bounds.canvas_col(feature.origin.x),
        row: bounds.canvas_row(feature.end_y().saturating_sub(1)),
        width: feature.size.x as usize,
        height: feature.size.y as usize,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Walkable,
    Blocked,
}

/// Row-major cell buffer, north row first.
#[derive(Debug, Clone)]
pub struct Canvas {
    bounds: Bounds,
    cells: Vec<Cell>,
    labels: Vec<(i64, CellRect)>,
}

impl Canvas {
    pub fn new(bounds: Bounds) -> Result<Self> {
        let len = bounds.width().checked_mul(bounds.height()).ok_or(MapError::SizeOverflow {
            width: bounds.width() as u64,
            height: bounds.height() as u64,
        })?;
        Ok(Self { bounds, cells: vec![Cell::Empty; len], labels: Vec::new() })
    }

    /// Bound the features and paint all of them.
    pub fn for_features(features: &[FeatureRecord]) -> Result<Self> {
        let mut canvas = Self::new(compute_bounds(features)?)?;
        for f in features {
            canvas.paint_feature(f)?;
        }
        Ok(canvas)
    }

    pub fn bounds(&self) -> Bounds { self.bounds }
    pub fn width(&self) -> usize { self.bounds.width() }
    pub fn height(&self) -> usize { self.bounds.height() }
    pub fn labels(&self) -> &[(i64, CellRect)] { &self.labels }

    pub fn cell(&self, col: usize, row: usize) -> Cell {
        self.cells[row * self.width() + col]
    }

    /// Stamp a feature's game-tile walkability at its global position.
    pub fn paint_feature(&mut self, feature: &FeatureRecord) -> Result<CellRect> {
        let tiles = feature.tile_walkability()?;
        self.paint_grid(feature.origin.x, feature.origin.y, &tiles);
        let rect = place_feature(feature, &self.bounds);
        self.labels.push((feature.id, rect));
        Ok(rect)
    }

    /// Stamp a game-tile grid whose south-west corner sits at `(origin_x, origin_y)`.
    /// Cells outside the canvas are dropped.
    pub fn paint_grid(&mut self, origin_x: i32, origin_y: i32, tiles: &WalkabilityGrid) {
        let width = self.width();
        for x in 0..tiles.width() {
            for y in 0..tiles.height() {
                let (Some(gx), Some(gy)) = (offset(origin_x, x), offset(origin_y, y)) else { continue };
                if !self.bounds.contains(gx, gy) {
                    continue;
                }
                let col = self.bounds.canvas_col(gx);
                let row = self.bounds.canvas_row(gy);
                self.cells[row * width + col] = if tiles.is_walkable(x, y) { Cell::Walkable } else { Cell::Blocked };
            }
        }
    }

    /// Rows north to south.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width().max(1))
    }
}

fn offset(origin: i32, delta: usize) -> Option<i32> {
    i32::try_from(delta).ok().and_then(|d| origin.checked_add(d))
}
