pub mod coalescing;
pub mod config;
pub mod interaction;
pub mod metadata;
pub mod models;
pub mod navigator;
pub mod render;
pub mod settings;
pub mod timeline;
pub mod tooltip;
mod utils;
pub mod viewport;

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};

pub use config::TimelineConfig;
pub use interaction::{PointerEvent, TimelineAction};
pub use models::{ActivityInterval, RenderBlock, TimeWindow};
pub use render::{render, RenderRequest, RenderResponse};
pub use settings::SettingsStore;
pub use timeline::Timeline;

const ENABLE_LOGS: bool = true;

/// `focus-timeline <request.json> [settings.json]`
///
/// Renders the request and prints the response as JSON on stdout.
pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(request_path) = args.next().map(PathBuf::from) else {
        bail!("usage: focus-timeline <request.json> [settings.json]");
    };

    let config = match args.next() {
        Some(settings_path) => SettingsStore::new(PathBuf::from(settings_path))?.config()?,
        None => TimelineConfig::default(),
    };

    let contents = fs::read_to_string(&request_path)
        .with_context(|| format!("Failed to read request from {}", request_path.display()))?;
    let request: RenderRequest = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse request {}", request_path.display()))?;

    crate::log_info!(
        "Rendering {} intervals on a {}px canvas",
        request.intervals.len(),
        request.canvas_width
    );
    let response = render(request, &config)?;
    crate::log_info!(
        "Produced {} blocks and {} actions",
        response.blocks.len(),
        response.actions.len()
    );

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
