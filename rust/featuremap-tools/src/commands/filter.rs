use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};

use featuremap_core::json_io::{load_json, write_json_pretty};
use featuremap_core::navigation::{filter_by_region, NavigationFile, Region};

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Navigation file to read
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the filtered navigation file
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Exclusive western edge
    #[arg(long, default_value_t = Region::default().west)]
    pub west: i32,

    /// Exclusive eastern edge
    #[arg(long, default_value_t = Region::default().east)]
    pub east: i32,

    /// Exclusive southern edge
    #[arg(long, default_value_t = Region::default().south)]
    pub south: i32,

    /// Exclusive northern edge
    #[arg(long, default_value_t = Region::default().north)]
    pub north: i32,
}

pub fn run(args: &FilterArgs, out: &mut dyn Write) -> Result<usize> {
    let nav: NavigationFile = load_json(&args.input).with_context(|| format!("loading {:?}", args.input))?;
    let region = Region { west: args.west, east: args.east, south: args.south, north: args.north };
    let kept = filter_by_region(&nav, &region);
    for key in kept.keys() {
        debug!(%key, "has link in range");
    }
    write_json_pretty(&args.output, &kept).with_context(|| format!("writing {:?}", args.output))?;
    info!(total = nav.len(), kept = kept.len(), "filtered navigation");
    writeln!(out, "Kept {} of {} features; wrote {}", kept.len(), nav.len(), args.output.display())?;
    Ok(kept.len())
}
