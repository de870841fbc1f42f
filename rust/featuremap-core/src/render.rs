//! Text renderings. Every tile is printed twice so the map keeps a roughly
//! square aspect in a terminal.

use crate::collision::{CollisionGrid, CollisionTile};
use crate::grid::WalkabilityGrid;
use crate::layout::{Canvas, Cell};

pub const BLOCKED_GLYPH: char = '█';
pub const WALKABLE_GLYPH: char = ' ';
pub const FEATURE_GLYPH: char = 'F';
pub const EMPTY_GLYPH: char = '·';

pub const COLLISION_LEGEND: &str = "Legend: ' ' = Walkable, '█' = Blocked, 'F' = Feature";
pub const WALKABILITY_LEGEND: &str = "Legend: ' ' = Walkable, '█' = Blocked";
pub const CANVAS_LEGEND: &str = "Legend: ' ' = Walkable, '█' = Blocked, '·' = No feature";

fn push_doubled(out: &mut String, c: char) {
    out.push(c);
    out.push(c);
}

fn collision_glyph(tile: &CollisionTile) -> char {
    if tile.feature_id.is_some() {
        FEATURE_GLYPH
    } else if tile.is_walkable() {
        WALKABLE_GLYPH
    } else {
        BLOCKED_GLYPH
    }
}

/// North row first; feature tiles take precedence over walkability.
pub fn collision_ascii(grid: &CollisionGrid) -> String {
    let mut out = String::new();
    for row in grid.rows_north_first() {
        for tile in row {
            push_doubled(&mut out, collision_glyph(tile));
        }
        out.push('\n');
    }
    out
}

pub fn walkability_ascii(grid: &WalkabilityGrid) -> String {
    let mut out = String::with_capacity((grid.width() * 2 + 1) * grid.height());
    for row in grid.rows_north_first() {
        for walkable in row {
            push_doubled(&mut out, if walkable { WALKABLE_GLYPH } else { BLOCKED_GLYPH });
        }
        out.push('\n');
    }
    out
}

/// One `(x, y): NESW` line per tile that blocks movement across an edge,
/// north row first.
pub fn edge_blocks(grid: &CollisionGrid) -> String {
    let mut out = String::new();
    for y in (0..grid.height()).rev() {
        for x in 0..grid.width() {
            let Some(tile) = grid.tile(x, y) else { continue };
            let blocked: String = tile.blocked_directions().into_iter().map(|d| d.as_char()).collect();
            if !blocked.is_empty() {
                out.push_str(&format!("({x}, {y}): {blocked}\n"));
            }
        }
    }
    out
}

/// Canvas cells plus one label line per feature giving its id and top-left cell.
pub fn canvas_ascii(canvas: &Canvas) -> String {
    let mut out = String::new();
    for row in canvas.rows() {
        for cell in row {
            let glyph = match cell {
                Cell::Empty => EMPTY_GLYPH,
                Cell::Walkable => WALKABLE_GLYPH,
                Cell::Blocked => BLOCKED_GLYPH,
            };
            push_doubled(&mut out, glyph);
        }
        out.push('\n');
    }
    for (id, rect) in canvas.labels() {
        out.push_str(&format!("feature {id}: col {}, row {}, {}x{}\n", rect.col, rect.row, rect.width, rect.height));
    }
    out
}
