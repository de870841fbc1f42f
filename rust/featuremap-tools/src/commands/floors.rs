use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use featuremap_core::feature::load_features_by_floor;
use featuremap_core::layout::{compute_bounds, Canvas};
use featuremap_core::render::{canvas_ascii, CANVAS_LEGEND};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct FloorsArgs {
    /// Directory of feature_<plane>_<id>.json files (default: FEATUREMAP_FEATURES_DIR)
    #[arg(long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

pub fn run(args: &FloorsArgs, cfg: &Config, out: &mut dyn Write) -> Result<()> {
    let dir = args.dir.clone().unwrap_or_else(|| cfg.features_dir.clone());
    let floors = load_features_by_floor(&dir).with_context(|| format!("reading {:?}", dir))?;
    if floors.is_empty() {
        writeln!(out, "No features found.")?;
        return Ok(());
    }

    for (plane, features) in &floors {
        let bounds = compute_bounds(features)?;
        info!(plane, width = bounds.width(), height = bounds.height(), "canvas");

        let mut canvas = match Canvas::new(bounds) {
            Ok(canvas) => canvas,
            Err(e) => {
                warn!(plane, error = %e, "could not build canvas");
                continue;
            }
        };
        for feature in features {
            if let Err(e) = canvas.paint_feature(feature) {
                warn!(plane, id = feature.id, error = %e, "could not draw feature");
            }
        }

        writeln!(out, "{}", "-".repeat(30))?;
        writeln!(out, "Floor {plane} bounds: X({}, {}), Y({}, {})", bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y)?;
        write!(out, "{}", canvas_ascii(&canvas))?;
    }
    writeln!(out)?;
    writeln!(out, "{CANVAS_LEGEND}")?;
    Ok(())
}
