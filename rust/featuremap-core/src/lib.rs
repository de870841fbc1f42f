pub mod codec;
pub mod collision;
pub mod error;
pub mod feature;
pub mod grid;
pub mod json_io;
pub mod layout;
pub mod navigation;
pub mod render;
pub mod room_layout;

pub use codec::{aggregate, decode, encode, expand, RunLengthSequence, SUB_TILES_PER_TILE};
pub use error::{MapError, Result};
pub use feature::{FeatureRecord, TilePoint, TileSize};
pub use grid::WalkabilityGrid;
pub use layout::{compute_bounds, place_feature, Bounds, Canvas, CellRect};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
