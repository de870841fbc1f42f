use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use featuremap_core::render::{walkability_ascii, WALKABILITY_LEGEND};
use featuremap_core::FeatureRecord;

use super::display_name;

#[derive(Args, Debug)]
pub struct FeatureArgs {
    /// Feature JSON file
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Show game tiles (all 16 sub-tiles walkable) instead of sub-tiles
    #[arg(long)]
    pub tiles: bool,
}

pub fn run(args: &FeatureArgs, out: &mut dyn Write) -> Result<()> {
    let name = display_name(&args.path);
    let feature = FeatureRecord::load(&args.path).with_context(|| format!("loading feature {name}"))?;
    let data = &feature.data;

    writeln!(out, "--- ASCII Map for {name} ---")?;
    writeln!(out, "feature: {}", feature.id)?;
    writeln!(out, "origin: ({}, {})", feature.origin.x, feature.origin.y)?;
    writeln!(out, "width: {}", data.sub_tile_width())?;
    writeln!(out, "height: {}", data.sub_tile_height())?;
    writeln!(out, "area: {}", data.sub_tile_area()?)?;
    writeln!(out, "run total: {}", data.run_total())?;

    let decoded = if args.tiles { feature.tile_walkability() } else { feature.walkability() };
    let grid = decoded.with_context(|| format!("decoding {name}"))?;
    write!(out, "{}", walkability_ascii(&grid))?;
    writeln!(out)?;
    writeln!(out, "{WALKABILITY_LEGEND}")?;
    Ok(())
}
