mod app;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use character_graph::config::GraphConfig;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file holding the character list.
    #[arg(long)]
    characters: PathBuf,
    /// Optional JSON file overriding layout constants and keyword sets.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Resolve relationship names with fuzzy matching when containment fails.
    #[arg(long)]
    fuzzy_names: bool,
    #[arg(long, default_value = "info")]
    log_level: String,
    #[arg(long, default_value_t = 1280.0)]
    width: f32,
    #[arg(long, default_value_t = 820.0)]
    height: f32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).compact().init();

    let config = GraphConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    let launch = app::LaunchOptions {
        characters: args.characters,
        config,
        fuzzy_names: args.fuzzy_names,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    eframe::run_native(
        "character-graph",
        options,
        Box::new(move |cc| Ok(Box::new(app::CharacterGraphApp::new(cc, launch)))),
    )
    .map_err(|error| anyhow!("viewer exited with an error: {error}"))
}
