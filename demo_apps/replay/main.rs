//! Replay
//!
//! Feeds a recording of reading batches through a headless viewer and logs
//! what every batch did to the scene:
//!
//! - batches are applied at a fixed interval of simulated time
//! - interpolation ticks at 60 Hz between batches
//! - frames fire whenever the viewer asked for one
//!
//! The recording is a JSON array of batches, each an array of readings:
//!
//! ```json
//! [
//!   [{ "sensorId": "S1", "value": 80, "position": { "x": 1, "y": 0, "z": 0 }, "timestamp": 1 }],
//!   [{ "sensorId": "S1", "value": 82, "position": { "x": 1, "y": 0, "z": 0 }, "timestamp": 2 }]
//! ]
//! ```
//!
//! Run: `cargo run -p replay -- demo_apps/replay/sample.json [--view top] [--lighting dramatic] [--config viewer.json]`

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};

use pointfield::render::headless::{ManualScheduler, RecordingTarget};
use pointfield::utils::time::Instant;
use pointfield::viewer::reading::Reading;
use pointfield::{Viewer3DPanel, ViewerConfig};

const VIEWPORT: (u32, u32) = (1280, 720);
const BATCH_INTERVAL: Duration = Duration::from_millis(1000);
const TICK: Duration = Duration::from_micros(16_667);

struct Options {
    recording: PathBuf,
    config: Option<PathBuf>,
    view: Option<String>,
    lighting: Option<String>,
}

fn parse_args() -> Result<Options> {
    let mut args = std::env::args().skip(1);
    let mut recording = None;
    let mut options = Options {
        recording: PathBuf::new(),
        config: None,
        view: None,
        lighting: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--view" => options.view = Some(args.next().context("--view needs a preset name")?),
            "--lighting" => options.lighting = Some(args.next().context("--lighting needs a preset name")?),
            "--config" => options.config = Some(args.next().context("--config needs a path")?.into()),
            flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
            path => recording = Some(PathBuf::from(path)),
        }
    }

    options.recording = recording.context("usage: replay <recording.json> [--view NAME] [--lighting NAME] [--config PATH]")?;
    Ok(options)
}

fn load_config(path: Option<&Path>) -> Result<ViewerConfig> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(ViewerConfig::from_json_str(&json)?)
}

fn load_recording(path: &Path) -> Result<Vec<Vec<Reading>>> {
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args()?;
    let config = load_config(options.config.as_deref())?;
    let batches = load_recording(&options.recording)?;
    log::info!("Replaying {} batches from {}", batches.len(), options.recording.display());

    let scheduler = ManualScheduler::new();
    let target = RecordingTarget::new();
    let mut panel = Viewer3DPanel::new(
        config,
        Box::new(scheduler.clone()),
        Box::new(target.clone()),
        VIEWPORT.0,
        VIEWPORT.1,
    )?;

    if let Some(view) = &options.view {
        panel.set_view_by_name(view)?;
    }
    if let Some(lighting) = &options.lighting {
        panel.set_lighting_preset_by_name(lighting)?;
    }
    panel.on_point_select(|reading| match reading {
        Some(r) => log::info!("Selected {} = {}", r.sensor_id, r.value),
        None => log::info!("Selection cleared"),
    });

    let start = Instant::now();
    let mut now = start;
    let fire = |panel: &mut Viewer3DPanel, now: Instant| {
        if scheduler.take_pending().is_some() {
            panel.frame(now);
        }
    };

    for (index, batch) in batches.into_iter().enumerate() {
        let stats = panel.set_readings(batch);
        log::info!(
            "Batch {index}: {} readings -> {} points ({} created, {} updated, {} evicted, {} filtered)",
            panel.reading_count(),
            panel.asset_count(),
            stats.created,
            stats.updated,
            stats.evicted,
            stats.filtered
        );

        if index == 0 {
            select_first_point(&mut panel);
        }

        let batch_end = now + BATCH_INTERVAL;
        let mut settled_at = None;
        while now < batch_end {
            panel.tick_interpolation(now);
            fire(&mut panel, now);
            if settled_at.is_none() && !panel.is_animating() {
                settled_at = Some(now);
            }
            now += TICK;
        }
        match settled_at {
            Some(at) => log::debug!("Batch {index} settled after {:?}", at.saturating_duration_since(batch_end - BATCH_INTERVAL)),
            None => log::warn!("Batch {index} still moving when the next batch arrived"),
        }
    }

    if let Some(frame) = target.last_frame() {
        log::info!(
            "{} frames submitted in {:?} of simulated time; last frame: {} points, {} line vertices, {} lights",
            target.frame_count(),
            now.saturating_duration_since(start),
            frame.instance_count(),
            frame.lines.len(),
            frame.lights.len()
        );
    }

    panel.dispose();
    Ok(())
}

/// Clicks the first point the way a user would, through its screen position.
fn select_first_point(panel: &mut Viewer3DPanel) {
    let Some(screen) = panel
        .reconciler()
        .assets()
        .next()
        .and_then(|(_, asset)| panel.camera().world_to_screen(asset.current_position()))
    else {
        return;
    };
    panel.pointer_down(screen.x, screen.y, pointfield::PointerButton::Primary);
    panel.pointer_up(screen.x, screen.y);
}
