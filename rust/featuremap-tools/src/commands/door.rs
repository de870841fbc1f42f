use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::info;

use featuremap_core::json_io::{load_json_or_default, to_pretty_string, write_with_backup};
use featuremap_core::navigation::{
    apply_door, plan_door, sort_navigation, sort_table, Direction, DoorLinks, DoorRequest, FeatureTable, NavigationFile,
};
use featuremap_core::TilePoint;

#[derive(Args, Debug)]
pub struct DoorArgs {
    /// Feature navigation file (e.g. dk_feature_navigation.json)
    #[arg(value_name = "NAV")]
    pub nav_path: PathBuf,

    /// Feature table file (e.g. dk_features_table.json)
    #[arg(value_name = "TABLE")]
    pub table_path: PathBuf,

    /// Plane/floor of both features
    #[arg(long)]
    pub plane: i32,

    /// Feature the door is entered from
    #[arg(long = "origin-feature")]
    pub origin_feature: i64,

    /// X of the tile inside the origin feature
    #[arg(short = 'x', long = "x", allow_negative_numbers = true)]
    pub x: i32,

    /// Y of the tile inside the origin feature
    #[arg(short = 'y', long = "y", allow_negative_numbers = true)]
    pub y: i32,

    /// Feature the door leads to
    #[arg(long = "dest-feature")]
    pub dest_feature: i64,

    /// Direction from origin to destination (N/E/S/W)
    #[arg(short = 'd', long)]
    pub direction: Direction,

    /// Print the links without writing either file
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl DoorArgs {
    pub fn request(&self) -> DoorRequest {
        DoorRequest {
            plane: self.plane,
            origin_feature: self.origin_feature,
            origin: TilePoint { x: self.x, y: self.y },
            destination_feature: self.dest_feature,
            direction: self.direction,
        }
    }
}

fn save<T: Serialize>(path: &Path, value: &T, out: &mut dyn Write) -> Result<()> {
    let backup = write_with_backup(path, value).with_context(|| format!("saving {:?}", path))?;
    if let Some(b) = backup {
        writeln!(out, "Backed up existing file to {}", b.display())?;
    }
    writeln!(out, "Saved {}", path.display())?;
    Ok(())
}

pub fn run(args: &DoorArgs, out: &mut dyn Write) -> Result<DoorLinks> {
    let mut nav: NavigationFile = load_json_or_default(&args.nav_path)
        .with_context(|| format!("loading {:?}", args.nav_path))?;
    let mut table: FeatureTable = load_json_or_default(&args.table_path)
        .with_context(|| format!("loading {:?}", args.table_path))?;

    let links = plan_door(&nav, &args.request());
    writeln!(out, "--- Generated Links ---")?;
    writeln!(out, "Door {} -> {} heading {}", links.origin_key, links.destination_key, args.direction.as_char())?;
    writeln!(out, "Forward Link (Origin -> Destination):")?;
    writeln!(out, "{}", to_pretty_string(&links.forward)?)?;
    writeln!(out, "Backward Link (Destination -> Origin):")?;
    writeln!(out, "{}", to_pretty_string(&links.backward)?)?;

    if args.dry_run {
        writeln!(out, "Dry run, nothing written.")?;
        return Ok(links);
    }

    apply_door(&mut nav, &mut table, &links);
    sort_navigation(&mut nav);
    sort_table(&mut table);

    save(&args.nav_path, &nav, out)?;
    save(&args.table_path, &table, out)?;
    info!(origin = %links.origin_key, destination = %links.destination_key, row = ?links.forward.row_number, "door added");
    Ok(links)
}
