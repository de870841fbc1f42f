use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("could not decode JSON from {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decompressed data size mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("line {line} has length {length}, expected {expected}; all lines must have the same length")]
    IrregularLayout { line: usize, length: usize, expected: usize },
    #[error("grid {width}x{height} is not divisible by factor {factor}")]
    DimensionMismatch { width: usize, height: usize, factor: usize },
    #[error("empty input: {0}")]
    EmptyInput(&'static str),
    #[error("run-length data is missing its size header (got {0} elements)")]
    MissingHeader(usize),
    #[error("size header {header:?} does not match feature size {size:?}")]
    HeaderMismatch { header: [i64; 2], size: [i64; 2] },
    #[error("feature size {width}x{height} is out of range")]
    SizeOverflow { width: u64, height: u64 },
    #[error("invalid feature key {0:?}")]
    InvalidFeatureKey(String),
}

pub type Result<T> = std::result::Result<T, MapError>;
