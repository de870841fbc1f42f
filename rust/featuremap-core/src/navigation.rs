//! Feature navigation and feature table files.
//!
//! Both are JSON objects keyed by `"<plane>_<featureId>"`. The navigation
//! file maps a key to the links leaving that feature; the feature table maps
//! a key to the keys of adjacent features.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{MapError, Result};
use crate::feature::TilePoint;

pub type NavigationFile = IndexMap<String, Vec<NavigationLink>>;
pub type FeatureTable = IndexMap<String, Vec<String>>;

pub const DOOR_GROUP_NAME: &str = r#"Door (actions = ["Open"])"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::North, Direction::East, Direction::South, Direction::West];

    /// The neighbouring tile in this direction.
    pub fn step(self, x: i32, y: i32) -> (i32, i32) {
        match self {
            Direction::North => (x, y + 1),
            Direction::South => (x, y - 1),
            Direction::East => (x + 1, y),
            Direction::West => (x - 1, y),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" | "NORTH" => Ok(Direction::North),
            "E" | "EAST" => Ok(Direction::East),
            "S" | "SOUTH" => Ok(Direction::South),
            "W" | "WEST" => Ok(Direction::West),
            other => Err(format!("unknown direction {other:?}, expected N/E/S/W")),
        }
    }
}

/// `<plane>_<featureId>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureKey {
    pub plane: i32,
    pub feature_id: i64,
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.plane, self.feature_id)
    }
}

impl FromStr for FeatureKey {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || MapError::InvalidFeatureKey(s.to_string());
        let (plane, id) = s.split_once('_').ok_or_else(bad)?;
        Ok(FeatureKey { plane: plane.parse().map_err(|_| bad())?, feature_id: id.parse().map_err(|_| bad())? })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEndpoint {
    pub plane: i32,
    pub x: i32,
    pub y: i32,
    /// Feature key of the room this tile belongs to.
    pub f: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationLink {
    #[serde(rename = "rowNumber", default, skip_serializing_if = "Option::is_none")]
    pub row_number: Option<i64>,
    #[serde(rename = "groupName", default)]
    pub group_name: String,
    #[serde(rename = "no-repeat-key", default)]
    pub no_repeat_key: String,
    pub destination: LinkEndpoint,
    pub origin: LinkEndpoint,
    /// Fields this tool does not interpret; written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NavigationLink {
    fn door(row: i64, origin: LinkEndpoint, destination: LinkEndpoint) -> Self {
        Self {
            row_number: Some(row),
            group_name: DOOR_GROUP_NAME.to_string(),
            no_repeat_key: row.to_string(),
            destination,
            origin,
            extra: Map::new(),
        }
    }
}

/// A door between two features, entered from a tile inside the origin feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorRequest {
    pub plane: i32,
    pub origin_feature: i64,
    /// Tile inside the origin feature, next to the door.
    pub origin: TilePoint,
    pub destination_feature: i64,
    /// From the origin tile towards the destination feature.
    pub direction: Direction,
}

/// The two directed links a door produces.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorLinks {
    pub origin_key: FeatureKey,
    pub destination_key: FeatureKey,
    pub forward: NavigationLink,
    pub backward: NavigationLink,
}

/// Highest `rowNumber` in the file plus one.
pub fn next_row_number(nav: &NavigationFile) -> i64 {
    nav.values().flatten().filter_map(|l| l.row_number).fold(0, i64::max) + 1
}

/// Build the forward and backward links for a door without touching any file.
pub fn plan_door(nav: &NavigationFile, request: &DoorRequest) -> DoorLinks {
    let origin_key = FeatureKey { plane: request.plane, feature_id: request.origin_feature };
    let destination_key = FeatureKey { plane: request.plane, feature_id: request.destination_feature };
    let (dest_x, dest_y) = request.direction.step(request.origin.x, request.origin.y);

    let inside = LinkEndpoint { plane: request.plane, x: request.origin.x, y: request.origin.y, f: origin_key.to_string() };
    let outside = LinkEndpoint { plane: request.plane, x: dest_x, y: dest_y, f: destination_key.to_string() };

    let row = next_row_number(nav);
    DoorLinks {
        origin_key,
        destination_key,
        forward: NavigationLink::door(row, inside.clone(), outside.clone()),
        backward: NavigationLink::door(row + 1, outside, inside),
    }
}

/// Append a planned door to both files.
pub fn apply_door(nav: &mut NavigationFile, table: &mut FeatureTable, links: &DoorLinks) {
    let origin = links.origin_key.to_string();
    let destination = links.destination_key.to_string();

    nav.entry(origin.clone()).or_default().push(links.forward.clone());
    nav.entry(destination.clone()).or_default().push(links.backward.clone());

    link_table(table, &origin, &destination);
    link_table(table, &destination, &origin);
    debug!(%origin, %destination, "applied door");
}

fn link_table(table: &mut FeatureTable, from: &str, to: &str) {
    let adjacent = table.entry(from.to_string()).or_default();
    if !adjacent.iter().any(|k| k == to) {
        adjacent.push(to.to_string());
    }
}

/// Order keys by `(plane, featureId)`.
/// Keys that do not parse as a [`FeatureKey`] sort after the rest, by text.
pub fn compare_feature_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<FeatureKey>(), b.parse::<FeatureKey>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

pub fn sort_navigation(nav: &mut NavigationFile) {
    nav.sort_by(|a, _, b, _| compare_feature_keys(a, b));
}

/// Sort keys and each adjacency list.
pub fn sort_table(table: &mut FeatureTable) {
    table.sort_by(|a, _, b, _| compare_feature_keys(a, b));
    for adjacent in table.values_mut() {
        adjacent.sort_by(|a, b| compare_feature_keys(a, b));
    }
}

/// Open rectangle; a point on the edge is outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub west: i32,
    pub east: i32,
    pub south: i32,
    pub north: i32,
}

impl Region {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.west < x && x < self.east && self.south < y && y < self.north
    }
}

impl Default for Region {
    /// The area these tools were first written for.
    fn default() -> Self {
        Self { west: 2688, east: 2751, south: 5248, north: 5375 }
    }
}

/// Keep only features with at least one link starting inside `region`.
pub fn filter_by_region(nav: &NavigationFile, region: &Region) -> NavigationFile {
    nav.iter()
        .filter(|(_, links)| links.iter().any(|l| region.contains(l.origin.x, l.origin.y)))
        .map(|(k, links)| (k.clone(), links.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> DoorRequest {
        DoorRequest {
            plane: 1,
            origin_feature: 10,
            origin: TilePoint { x: 2700, y: 5350 },
            destination_feature: 11,
            direction: Direction::North,
        }
    }

    #[test]
    fn direction_steps_one_tile() {
        assert_eq!(Direction::North.step(5, 5), (5, 6));
        assert_eq!(Direction::South.step(5, 5), (5, 4));
        assert_eq!(Direction::East.step(5, 5), (6, 5));
        assert_eq!(Direction::West.step(5, 5), (4, 5));
        assert_eq!("e".parse::<Direction>().unwrap(), Direction::East);
        assert!("up".parse::<Direction>().is_err());
    }

    #[test]
    fn feature_key_parses_and_prints() {
        let k: FeatureKey = "1_50001".parse().unwrap();
        assert_eq!(k, FeatureKey { plane: 1, feature_id: 50001 });
        assert_eq!(k.to_string(), "1_50001");
        assert!("1-2".parse::<FeatureKey>().is_err());
        assert!("a_2".parse::<FeatureKey>().is_err());
    }

    #[test]
    fn row_numbers_start_at_one_and_pair_up() {
        let nav = NavigationFile::new();
        assert_eq!(next_row_number(&nav), 1);
        let links = plan_door(&nav, &request());
        assert_eq!(links.forward.row_number, Some(1));
        assert_eq!(links.backward.row_number, Some(2));
        assert_eq!(links.forward.no_repeat_key, "1");
        assert_eq!(links.backward.no_repeat_key, "2");
    }

    #[test]
    fn backward_link_swaps_endpoints() {
        let links = plan_door(&NavigationFile::new(), &request());
        assert_eq!(links.forward.origin, LinkEndpoint { plane: 1, x: 2700, y: 5350, f: "1_10".into() });
        assert_eq!(links.forward.destination, LinkEndpoint { plane: 1, x: 2700, y: 5351, f: "1_11".into() });
        assert_eq!(links.backward.origin, links.forward.destination);
        assert_eq!(links.backward.destination, links.forward.origin);
        assert_eq!(links.forward.group_name, DOOR_GROUP_NAME);
    }

    #[test]
    fn apply_door_updates_both_files_without_duplicate_neighbours() {
        let mut nav = NavigationFile::new();
        let mut table = FeatureTable::new();
        let first = plan_door(&nav, &request());
        apply_door(&mut nav, &mut table, &first);
        let second = plan_door(&nav, &DoorRequest { origin: TilePoint { x: 2701, y: 5350 }, ..request() });
        assert_eq!(second.forward.row_number, Some(3));
        apply_door(&mut nav, &mut table, &second);

        assert_eq!(nav["1_10"].len(), 2);
        assert_eq!(nav["1_11"].len(), 2);
        assert_eq!(table["1_10"], vec!["1_11".to_string()]);
        assert_eq!(table["1_11"], vec!["1_10".to_string()]);
    }

    #[test]
    fn keys_sort_numerically() {
        let mut table = FeatureTable::new();
        table.insert("1_9".into(), vec!["1_10".into(), "0_200".into(), "1_9".into()]);
        table.insert("foo".into(), vec![]);
        table.insert("1_2_3".into(), vec![]);
        table.insert("1_10".into(), vec![]);
        table.insert("0_200".into(), vec![]);
        sort_table(&mut table);
        let keys: Vec<&str> = table.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["0_200", "1_9", "1_10", "1_2_3", "foo"]);
        assert_eq!(table["1_9"], vec!["0_200", "1_9", "1_10"]);
    }

    #[test]
    fn link_round_trips_unknown_fields() {
        let v = json!({
            "rowNumber": 4,
            "groupName": "Stairs",
            "no-repeat-key": "4",
            "destination": {"plane": 1, "x": 1, "y": 2, "f": "1_3"},
            "origin": {"plane": 0, "x": 1, "y": 2, "f": "0_3"},
            "cost": 5
        });
        let link: NavigationLink = serde_json::from_value(v.clone()).unwrap();
        assert_eq!(link.extra["cost"], json!(5));
        assert_eq!(serde_json::to_value(&link).unwrap(), v);
    }

    #[test]
    fn region_filter_is_exclusive() {
        let region = Region::default();
        assert!(region.contains(2700, 5300));
        assert!(!region.contains(2688, 5300));

        let mut nav = NavigationFile::new();
        let inside = plan_door(&nav, &request());
        apply_door(&mut nav, &mut FeatureTable::new(), &inside);
        let far = DoorRequest { origin_feature: 20, destination_feature: 21, origin: TilePoint { x: 3200, y: 3200 }, ..request() };
        let far = plan_door(&nav, &far);
        apply_door(&mut nav, &mut FeatureTable::new(), &far);

        let kept = filter_by_region(&nav, &region);
        let keys: Vec<&str> = kept.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["1_10", "1_11"]);
    }
}
