use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::codec::{self, RunLengthSequence, SUB_TILES_PER_TILE};
use crate::error::{MapError, Result};
use crate::grid::WalkabilityGrid;
use crate::json_io;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePoint {
    pub x: i32,
    pub y: i32,
}

/// Width and height in game tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSize {
    pub x: u32,
    pub y: u32,
}

/// One feature file: `{ "f": id, "s": {x, y}, "o": {x, y}, "d": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(rename = "f")]
    pub id: i64,
    #[serde(rename = "s")]
    pub size: TileSize,
    #[serde(rename = "o")]
    pub origin: TilePoint,
    #[serde(rename = "d")]
    pub data: RunLengthSequence,
    /// Floor the feature was loaded from; not part of the file body.
    #[serde(skip)]
    pub plane: Option<i32>,
}

impl FeatureRecord {
    /// The `d` header must agree with `s`, and the feature must fit on the
    /// global tile plane.
    pub fn validate(&self) -> Result<()> {
        if self.data.width_tiles != self.size.x || self.data.height_tiles != self.size.y {
            return Err(MapError::HeaderMismatch {
                header: [self.data.width_tiles as i64, self.data.height_tiles as i64],
                size: [self.size.x as i64, self.size.y as i64],
            });
        }
        let out_of_range = || MapError::SizeOverflow { width: self.size.x as u64, height: self.size.y as u64 };
        let w = i32::try_from(self.size.x).map_err(|_| out_of_range())?;
        let h = i32::try_from(self.size.y).map_err(|_| out_of_range())?;
        if self.origin.x.checked_add(w).is_none() || self.origin.y.checked_add(h).is_none() {
            return Err(out_of_range());
        }
        self.data.sub_tile_area()?;
        Ok(())
    }

    /// Sub-tile resolution walkability.
    pub fn walkability(&self) -> Result<WalkabilityGrid> {
        codec::decode(&self.data)
    }

    /// Game-tile walkability; a tile is walkable only if all 16 sub-tiles are.
    pub fn tile_walkability(&self) -> Result<WalkabilityGrid> {
        codec::aggregate(&self.walkability()?, SUB_TILES_PER_TILE)
    }

    /// Exclusive east edge in global tiles, saturating at `i32::MAX`.
    pub fn end_x(&self) -> i32 { saturating_end(self.origin.x, self.size.x) }
    /// Exclusive north edge in global tiles, saturating at `i32::MAX`.
    pub fn end_y(&self) -> i32 { saturating_end(self.origin.y, self.size.y) }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut record: FeatureRecord = json_io::load_json(path)?;
        record.validate()?;
        record.plane = path.file_name().and_then(|n| plane_from_file_name(&n.to_string_lossy()));
        debug!(path = %path.display(), id = record.id, plane = ?record.plane, "loaded feature");
        Ok(record)
    }
}

fn saturating_end(origin: i32, size: u32) -> i32 {
    origin.saturating_add(i32::try_from(size).unwrap_or(i32::MAX))
}

/// `feature_<plane>_<id>.json`
pub fn feature_file_name(plane: i32, id: i64) -> String {
    format!("feature_{plane}_{id}.json")
}

/// Plane number from a `feature_<plane>_<id>.json` file name.
pub fn plane_from_file_name(name: &str) -> Option<i32> {
    let stem = name.strip_prefix("feature_")?.strip_suffix(".json")?;
    let (plane, id) = stem.split_once('_')?;
    id.parse::<i64>().ok()?;
    plane.parse().ok()
}

/// Load every `feature_*.json` in `dir`, grouped by plane.
///
/// Files that cannot be read, parsed or validated are logged and skipped;
/// only an unreadable directory is an error.
pub fn load_features_by_floor(dir: impl AsRef<Path>) -> Result<BTreeMap<i32, Vec<FeatureRecord>>> {
    let dir = dir.as_ref();
    info!(dir = %dir.display(), "loading features");
    let io_err = |source| MapError::Io { path: dir.to_path_buf(), source };
    let mut names: Vec<String> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with("feature_") && name.ends_with(".json") {
            names.push(name);
        }
    }
    names.sort();

    let mut by_floor: BTreeMap<i32, Vec<FeatureRecord>> = BTreeMap::new();
    for name in names {
        let Some(plane) = plane_from_file_name(&name) else {
            warn!(file = %name, "could not get floor from file name");
            continue;
        };
        match FeatureRecord::load(dir.join(&name)) {
            Ok(record) => by_floor.entry(plane).or_default().push(record),
            Err(e) => warn!(file = %name, error = %e, "skipping feature"),
        }
    }
    for (plane, features) in &by_floor {
        info!(plane, count = features.len(), "found features");
    }
    Ok(by_floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_feature_json() {
        let v = json!({"f": 7, "s": {"x": 1, "y": 1}, "o": {"x": 10, "y": 20}, "d": [1, 1, 16]});
        let f: FeatureRecord = serde_json::from_value(v).unwrap();
        assert_eq!(f.id, 7);
        assert_eq!(f.origin, TilePoint { x: 10, y: 20 });
        assert_eq!((f.end_x(), f.end_y()), (11, 21));
        f.validate().unwrap();
        assert!(f.tile_walkability().unwrap().is_walkable(0, 0));
    }

    #[test]
    fn header_must_match_size() {
        let v = json!({"f": 1, "s": {"x": 2, "y": 1}, "o": {"x": 0, "y": 0}, "d": [1, 2, 32]});
        let f: FeatureRecord = serde_json::from_value(v).unwrap();
        assert!(matches!(f.validate(), Err(MapError::HeaderMismatch { header: [1, 2], size: [2, 1] })));
    }

    #[test]
    fn sizes_off_the_tile_plane_are_rejected() {
        let huge = json!({"f": 1, "s": {"x": 4294967295u32, "y": 4294967295u32}, "o": {"x": 0, "y": 0}, "d": [4294967295u32, 4294967295u32, 16]});
        let f: FeatureRecord = serde_json::from_value(huge).unwrap();
        assert!(matches!(f.validate(), Err(MapError::SizeOverflow { .. })));
        assert_eq!(f.end_x(), i32::MAX);
        assert!(matches!(f.walkability(), Err(MapError::SizeOverflow { .. })));

        let edge = json!({"f": 2, "s": {"x": 2, "y": 1}, "o": {"x": i32::MAX - 1, "y": 0}, "d": [2, 1, 32]});
        let f: FeatureRecord = serde_json::from_value(edge).unwrap();
        assert!(matches!(f.validate(), Err(MapError::SizeOverflow { .. })));
    }

    #[test]
    fn serializes_in_file_key_order() {
        let f = FeatureRecord {
            id: 3,
            size: TileSize { x: 1, y: 1 },
            origin: TilePoint { x: 5, y: 6 },
            data: RunLengthSequence { width_tiles: 1, height_tiles: 1, runs: vec![16] },
            plane: Some(2),
        };
        let s = serde_json::to_string(&f).unwrap();
        assert_eq!(s, r#"{"f":3,"s":{"x":1,"y":1},"o":{"x":5,"y":6},"d":[1,1,16]}"#);
    }

    #[test]
    fn plane_from_names() {
        assert_eq!(plane_from_file_name("feature_0_14545.json"), Some(0));
        assert_eq!(plane_from_file_name("feature_12_5.json"), Some(12));
        assert_eq!(plane_from_file_name("feature_x_5.json"), None);
        assert_eq!(plane_from_file_name("feature_1.json"), None);
        assert_eq!(plane_from_file_name("other_1_2.json"), None);
        assert_eq!(feature_file_name(1, 50001), "feature_1_50001.json");
    }
}
