// ─────────────────────────────────────────────────────────────────────
// SCPN Helix Tracker — CLI
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! helix-sim: integrate the scattered and collimated beams, then write
//! `electron_trajectories.png` and `electron_trajectories.gif`.

use anyhow::{Context, Result};
use clap::Parser;
use helix_core::scenario::run_scenario;
use helix_render::animation::write_animation_gif;
use helix_render::figure::write_static_figure;
use helix_types::config::SimulationConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const FIGURE_FILE: &str = "electron_trajectories.png";
const ANIMATION_FILE: &str = "electron_trajectories.gif";

#[derive(Parser, Debug)]
#[command(name = "helix-sim")]
#[command(about = "Electron beams in a Helmholtz-coil field: static figure and animated GIF")]
#[command(version)]
struct Args {
    /// JSON configuration; omitted fields use the reference setup
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory receiving the PNG and GIF
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Write only the static figure
    #[arg(long)]
    skip_gif: bool,
}

/// Paths written by one run.
#[derive(Debug)]
struct Outputs {
    figure: PathBuf,
    animation: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(p) = path else {
        return Ok(SimulationConfig::default());
    };
    let utf8 = p
        .to_str()
        .with_context(|| format!("Config path is not valid UTF-8: {:?}", p))?;
    SimulationConfig::from_file(utf8).with_context(|| format!("Failed to load config: {:?}", p))
}

fn run(args: &Args) -> Result<Outputs> {
    let config = load_config(args.config.as_deref())?;
    let result = run_scenario(&config).context("Simulation failed")?;

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create output dir: {:?}", args.output_dir))?;

    let figure = args.output_dir.join(FIGURE_FILE);
    write_static_figure(&result, &config.render, &figure)
        .with_context(|| format!("Failed to write figure: {:?}", figure))?;

    let animation = if args.skip_gif {
        None
    } else {
        let path = args.output_dir.join(ANIMATION_FILE);
        write_animation_gif(&result, &config.render, &path)
            .with_context(|| format!("Failed to write animation: {:?}", path))?;
        Some(path)
    };

    Ok(Outputs { figure, animation })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let outputs = run(&args)?;
    info!(figure = ?outputs.figure, animation = ?outputs.animation, "done");
    Ok(())
}
