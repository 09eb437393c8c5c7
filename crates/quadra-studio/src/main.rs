//! quadra studio: interactive demo of the batch renderer.
//!
//! Controls: WASD pans, Z/X zooms, R/E rotates, Esc quits.
//!
//! Usage: `quadra-studio [--shader FILE] [--capacity QUADS] [IMAGE [IMAGE]]`

mod app;
mod controls;
mod options;
mod textures;

use anyhow::Result;
use clap::Parser;
use quadra_engine::device::GpuInit;
use quadra_engine::logging::{init_logging, LoggingConfig};
use quadra_engine::window::{Runtime, RuntimeConfig};

use crate::app::StudioApp;
use crate::options::StudioOptions;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let options = StudioOptions::parse();
    log::info!("starting quadra studio ({options:?})");

    Runtime::run(
        RuntimeConfig {
            title: "quadra studio".to_string(),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        StudioApp::new(options),
    )
}
