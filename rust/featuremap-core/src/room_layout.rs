use tracing::debug;

use crate::codec::{self, SUB_TILES_PER_TILE};
use crate::error::{MapError, Result};
use crate::feature::{FeatureRecord, TilePoint, TileSize};
use crate::grid::WalkabilityGrid;

/// Walkable glyph; every other character is a wall.
pub const WALKABLE_CHAR: char = ' ';

/// A 9x7 room with a pillar in the middle.
pub const EXAMPLE_LAYOUT: &str = "
XXXXXXXXX
X       X
X       X
X   X   X
X       X
X       X
XXXXXXXXX
";

/// Parse a text room layout into game-tile walkability.
///
/// The first line is the north edge. Empty lines before and after the
/// layout are ignored; lines made of spaces are real walkable rows.
pub fn parse_room_layout(text: &str) -> Result<WalkabilityGrid> {
    let lines: Vec<&str> = text.lines().map(|l| l.strip_suffix('\r').unwrap_or(l)).collect();
    let start = lines.iter().position(|l| !l.is_empty()).ok_or(MapError::EmptyInput("room layout has no lines"))?;
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
    let lines = &lines[start..end];

    let expected = lines[0].chars().count();
    let mut rows = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let length = line.chars().count();
        if length != expected {
            return Err(MapError::IrregularLayout { line: i + 1, length, expected });
        }
        rows.push(line.chars().map(|c| c == WALKABLE_CHAR).collect::<Vec<bool>>());
    }
    WalkabilityGrid::from_rows_north_first(&rows)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRequest {
    pub id: i64,
    pub plane: i32,
    /// South-west corner in global tiles.
    pub origin: TilePoint,
    pub layout: String,
}

/// Build a feature from a text layout. Runs are always emitted at sub-tile resolution.
pub fn generate_feature(request: &FeatureRequest) -> Result<FeatureRecord> {
    let tiles = parse_room_layout(&request.layout)?;
    let sub_tiles = codec::expand(&tiles, SUB_TILES_PER_TILE);
    let data = codec::encode(&sub_tiles)?;
    debug!(id = request.id, width = tiles.width(), height = tiles.height(), runs = data.runs.len(), "encoded layout");
    Ok(FeatureRecord {
        id: request.id,
        size: TileSize { x: tiles.width() as u32, y: tiles.height() as u32 },
        origin: request.origin,
        data,
        plane: Some(request.plane),
    })
}
