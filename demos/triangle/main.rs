//! Present a single triangle with a configurable number of frames in flight.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use vk_presenter::{application, config::Config, logging};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML configuration. Defaults are used when the default
    /// file does not exist.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of frame slots.
    #[arg(long)]
    frames_in_flight: Option<usize>,

    /// Enable the Khronos validation layer.
    #[arg(long)]
    validation: bool,

    /// Exit after presenting this many frames.
    #[arg(long)]
    max_frames: Option<u64>,
}

const DEFAULT_CONFIG: &str = "presenter.toml";

fn main() -> Result<()> {
    let _logger = logging::setup()?;
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Unable to load config {:?}", path))?,
        None => Config::load_or_default(DEFAULT_CONFIG)?,
    };
    if let Some(frames_in_flight) = args.frames_in_flight {
        config.renderer.frames_in_flight = frames_in_flight;
    }
    if args.validation {
        config.renderer.enable_validation = true;
    }
    config.validate().context("Invalid configuration")?;

    application::run(config, args.max_frames)
}
