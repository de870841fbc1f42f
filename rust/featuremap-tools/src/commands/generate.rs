use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use featuremap_core::feature::feature_file_name;
use featuremap_core::json_io::{to_pretty_string, write_with_backup};
use featuremap_core::room_layout::{generate_feature, FeatureRequest, EXAMPLE_LAYOUT};
use featuremap_core::{FeatureRecord, TilePoint};

use super::RULE;
use crate::config::Config;

const EXAMPLE_ID: i64 = 50001;
const EXAMPLE_PLANE: i32 = 1;
const EXAMPLE_ORIGIN: TilePoint = TilePoint { x: 2700, y: 5350 };

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Feature ID
    #[arg(short = 'f', long = "feature-id")]
    pub feature_id: Option<i64>,

    /// Plane/floor level
    #[arg(short = 'p', long = "plane")]
    pub plane: Option<i32>,

    /// Origin X coordinate (south-west corner)
    #[arg(short = 'x', long = "origin-x", allow_negative_numbers = true)]
    pub origin_x: Option<i32>,

    /// Origin Y coordinate (south-west corner)
    #[arg(short = 'y', long = "origin-y", allow_negative_numbers = true)]
    pub origin_y: Option<i32>,

    /// Room layout as a string, ' ' for walkable and 'X' for walls (use \n between lines)
    #[arg(short = 'm', long = "map", conflicts_with = "map_file")]
    pub map: Option<String>,

    /// Load the room layout from a text file
    #[arg(long = "map-file", value_name = "PATH")]
    pub map_file: Option<PathBuf>,

    /// Use the built-in example room
    #[arg(long, conflicts_with_all = ["map", "map_file"])]
    pub example: bool,

    /// Save output to feature_<plane>_<id>.json
    #[arg(short = 's', long = "save")]
    pub save: bool,

    /// Output directory for the saved file (default: FEATUREMAP_FEATURES_DIR)
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Overwrite an existing file (the old one is kept as a backup)
    #[arg(long)]
    pub force: bool,
}

impl GenerateArgs {
    fn request(&self) -> Result<FeatureRequest> {
        if self.example {
            return Ok(FeatureRequest {
                id: self.feature_id.unwrap_or(EXAMPLE_ID),
                plane: self.plane.unwrap_or(EXAMPLE_PLANE),
                origin: TilePoint {
                    x: self.origin_x.unwrap_or(EXAMPLE_ORIGIN.x),
                    y: self.origin_y.unwrap_or(EXAMPLE_ORIGIN.y),
                },
                layout: EXAMPLE_LAYOUT.to_string(),
            });
        }
        let (Some(id), Some(plane), Some(x), Some(y)) = (self.feature_id, self.plane, self.origin_x, self.origin_y) else {
            bail!("required arguments: -f/--feature-id, -p/--plane, -x/--origin-x, -y/--origin-y (or use --example)");
        };
        let layout = match (&self.map_file, &self.map) {
            (Some(path), _) => fs::read_to_string(path).with_context(|| format!("reading layout {:?}", path))?,
            (None, Some(map)) => map.replace("\\n", "\n"),
            (None, None) => bail!("either --map or --map-file must be provided"),
        };
        Ok(FeatureRequest { id, plane, origin: TilePoint { x, y }, layout })
    }
}

/// Returns the generated feature and, when saved, where it went.
pub fn run(args: &GenerateArgs, cfg: &Config, out: &mut dyn Write) -> Result<(FeatureRecord, Option<PathBuf>)> {
    let request = args.request()?;
    let feature = generate_feature(&request).context("generating feature")?;
    let filename = feature_file_name(request.plane, request.id);

    writeln!(out, "{RULE}")?;
    writeln!(out, "Generated data for: {filename}")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "{}", to_pretty_string(&feature)?)?;
    writeln!(out, "{RULE}")?;

    if !args.save {
        writeln!(out, "Copy the JSON object above and save it as {filename:?} in your features directory.")?;
        return Ok((feature, None));
    }

    let dir = args.output_dir.clone().unwrap_or_else(|| cfg.features_dir.clone());
    fs::create_dir_all(&dir).with_context(|| format!("creating {:?}", dir))?;
    let path = dir.join(&filename);
    if path.exists() && !args.force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }
    write_with_backup(&path, &feature).with_context(|| format!("writing {:?}", path))?;
    info!(path = %path.display(), id = feature.id, "saved feature");
    writeln!(out, "File saved to: {}", path.display())?;
    Ok((feature, Some(path)))
}
