use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use featuremap_core::collision::{CollisionGrid, Indexing};
use featuremap_core::render::{collision_ascii, edge_blocks, COLLISION_LEGEND};

use super::display_name;

#[derive(Args, Debug)]
pub struct CollisionArgs {
    /// Collision map JSON file
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// File is indexed [row][col] (north row first) instead of [x][y]
    #[arg(long = "row-major")]
    pub row_major: bool,

    /// Also list tiles that block movement across an edge
    #[arg(long)]
    pub edges: bool,
}

pub fn run(args: &CollisionArgs, out: &mut dyn Write) -> Result<()> {
    let indexing = if args.row_major { Indexing::RowMajor } else { Indexing::ColumnMajor };
    let grid = CollisionGrid::load(&args.path, indexing)
        .with_context(|| format!("loading collision map {:?}", args.path))?;
    info!(width = grid.width(), height = grid.height(), features = grid.feature_ids().len(), "collision map");

    writeln!(out, "--- ASCII Map for {} ---", display_name(&args.path))?;
    write!(out, "{}", collision_ascii(&grid))?;
    writeln!(out)?;
    writeln!(out, "{COLLISION_LEGEND}")?;
    if args.edges {
        writeln!(out)?;
        writeln!(out, "--- Blocked edges ---")?;
        write!(out, "{}", edge_blocks(&grid))?;
    }
    Ok(())
}
