use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use winit::dpi::PhysicalSize;

use credits::app::{CreditsApp, CreditsLogic, CreditsRoll, render_headless};
use credits::audio::{SilentWidget, open_or_silent};
use credits::config::{ConfigStore, CreditsConfig};
use engine::app::{AppConfig, run_scene};
use engine::profiling::WorstStep;
use engine::snapshot::write_snapshots;
use engine::surface::SurfaceSize;

#[derive(Debug, Parser)]
#[command(name = "credits-roll")]
#[command(about = "Anime-style 3D end credits synchronised to an audio track")]
struct Cli {
    /// Config file (defaults to $CREDITS_CONFIG_PATH or ~/.config/credits-roll/config.json).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Plain-text credits, one line per row.
    #[arg(long)]
    lines: Option<PathBuf>,
    /// Audio track to play alongside the roll.
    #[arg(long)]
    audio: Option<PathBuf>,
    /// Render this many frames offscreen and exit instead of opening a window.
    #[arg(long)]
    headless: Option<u64>,
    /// Frame delta used for headless runs, in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    delta: f32,
    /// Where to write headless frame hashes as JSON.
    #[arg(long, requires = "headless")]
    snapshots: Option<PathBuf>,
    /// Write the effective config back to the config file.
    #[arg(long, default_value_t = false)]
    save_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let store = match &cli.config {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::from_env(),
    };
    let mut config: CreditsConfig = store.load().context("loading config")?;
    if cli.lines.is_some() {
        config.lines_path = cli.lines.clone();
    }
    if cli.audio.is_some() {
        config.audio_path = cli.audio.clone();
    }
    if cli.save_config {
        store.save(&config).context("saving config")?;
        tracing::info!(path = %store.path().display(), "config saved");
    }

    let lines = config.load_lines().context("loading credits")?;

    if let Some(frames) = cli.headless {
        let size = SurfaceSize::new(config.window.width, config.window.height);
        let logic = CreditsLogic::new(lines, config, SilentWidget);
        let mut profiler = WorstStep::default();
        let (runner, snapshots) = render_headless(logic, size, frames, cli.delta, &mut profiler);
        tracing::info!(
            frames = runner.frame(),
            offset = runner.state().track().scroll_offset(),
            avg_us = profiler.average().as_micros() as u64,
            worst_us = profiler.worst.as_micros() as u64,
            "headless run complete"
        );
        match &cli.snapshots {
            Some(path) => write_snapshots(path, &snapshots)
                .with_context(|| format!("writing {}", path.display()))?,
            None => {
                for snapshot in &snapshots {
                    println!("{} {}", snapshot.frame, snapshot.hash);
                }
            }
        }
        return Ok(());
    }

    let audio = open_or_silent(config.audio_path.as_deref(), config.volume);
    let roll = CreditsRoll::new(&lines, &config, audio);
    let app_config = AppConfig {
        title: "Credits".to_string(),
        desired_size: PhysicalSize::new(config.window.width, config.window.height),
        clamp_to_monitor: true,
        vsync: Some(config.window.vsync),
    };
    run_scene(app_config, CreditsApp::new(roll)).map_err(|e| anyhow::anyhow!("{e}"))
}
