use std::io::{self, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use featuremap_tools::commands::{collision, door, feature, filter, floors, generate};
use featuremap_tools::config::Config;
use featuremap_tools::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "featuremap", version, about = "Inspect and author feature walkability, collision and navigation files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a collision map as ASCII
    Collision(collision::CollisionArgs),
    /// Decode a feature file and print its walkability
    Feature(feature::FeatureArgs),
    /// Draw every floor of a features directory onto one canvas per plane
    Floors(floors::FloorsArgs),
    /// Generate a feature file from an ASCII room layout
    Generate(generate::GenerateArgs),
    /// Add a two-way door between two features
    AddDoor(door::DoorArgs),
    /// Keep only navigation entries with a link inside a region
    FilterNav(filter::FilterArgs),
}

fn main() -> Result<()> {
    let cfg = Config::from_env()?;
    init_tracing(cfg.log_json);

    let cli = Cli::parse();
    info!(core_version = featuremap_core::version(), features_dir = %cfg.features_dir.display(), "starting featuremap");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &cli.command {
        Command::Collision(args) => collision::run(args, &mut out)?,
        Command::Feature(args) => feature::run(args, &mut out)?,
        Command::Floors(args) => floors::run(args, &cfg, &mut out)?,
        Command::Generate(args) => {
            generate::run(args, &cfg, &mut out)?;
        }
        Command::AddDoor(args) => {
            door::run(args, &mut out)?;
        }
        Command::FilterNav(args) => {
            filter::run(args, &mut out)?;
        }
    }
    out.flush()?;
    Ok(())
}
