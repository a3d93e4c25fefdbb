//! Runs the race without a window, recording every frame and logging what was drawn.

mod logging;

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use anyhow::Context;
use engine_race::{CameraMode, GlobalState, RaceConfig, RaceScene, RecordingSurface, TrackId};
use lib_time::Clock;
use log::{debug, error, info, warn};
use pico_args::Arguments;

const DEFAULT_FPS: f64 = 60.0;

#[derive(Debug)]
struct Options {
    config: Option<PathBuf>,
    track: TrackId,
    camera: CameraMode,
    /// run until interrupted if absent
    frames: Option<u64>,
    fps: f64,
    stick_figure: bool,
    show_axes: bool,
    speed_up: f64,
}

fn parse_options(mut args: Arguments) -> anyhow::Result<Options> {
    let config = args.opt_value_from_str("--config")?;
    let track: Option<usize> = args.opt_value_from_str("--track")?;
    let camera: Option<usize> = args.opt_value_from_str("--camera")?;
    let frames = args.opt_value_from_str("--frames")?;
    let fps: Option<f64> = args.opt_value_from_str("--fps")?;
    let speed_up: Option<f64> = args.opt_value_from_str("--speed-up")?;
    let stick_figure = args.contains("--stick-figure");
    let show_axes = args.contains("--axes");

    let remaining = args.finish();
    if !remaining.is_empty() {
        warn!("ignoring unknown arguments: {remaining:?}");
    }

    let fps = fps.unwrap_or(DEFAULT_FPS);
    anyhow::ensure!(
        fps.is_finite() && fps > 0.0,
        "--fps must be a positive number, got {fps}"
    );

    Ok(Options {
        config,
        track: track
            .map(TrackId::try_from)
            .transpose()
            .context("invalid --track")?
            .unwrap_or_default(),
        camera: camera
            .map(CameraMode::try_from)
            .transpose()
            .context("invalid --camera")?
            .unwrap_or_default(),
        frames,
        fps,
        stick_figure,
        show_axes,
        speed_up: speed_up.unwrap_or(1.0),
    })
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RaceConfig> {
    let Some(path) = path else {
        debug!("no configuration file given, using defaults");
        return Ok(RaceConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading configuration from {}", path.display()))?;
    let config = serde_json::from_str(&json)
        .with_context(|| format!("parsing configuration in {}", path.display()))?;
    info!("loaded configuration from {}", path.display());
    Ok(config)
}

/// Returns a flag that turns `true` once Ctrl-C is pressed.
fn register_ctrlc() -> anyhow::Result<Arc<AtomicBool>> {
    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        handler_stop.store(true, Ordering::Relaxed);
    })
    .context("installing the Ctrl-C handler")?;
    Ok(stop)
}

fn run(options: &Options) -> anyhow::Result<()> {
    let config = load_config(options.config.as_deref())?;
    let mut scene = RaceScene::new(config).context("building the race")?;
    let stop = register_ctrlc()?;

    let mut state = GlobalState {
        track: options.track,
        camera_mode: options.camera,
        stick_figure: options.stick_figure,
        show_axes: options.show_axes,
        ..GlobalState::default()
    };
    let mut surface = RecordingSurface::new();
    let clock = Clock::start().with_speed_up(options.speed_up);
    let frame_time = Duration::from_secs_f64(1.0 / options.fps);

    info!(
        "racing on {} with the {} camera; press Ctrl-C to stop",
        state.track, state.camera_mode
    );

    let mut frame = 0_u64;
    while !stop.load(Ordering::Relaxed) && options.frames.map_or(true, |frames| frame < frames) {
        state.time = clock.seconds();
        surface.begin_frame();
        scene.frame(&mut surface, &state);

        let stats = surface.stats();
        debug!(
            "frame {frame} at {:.3}s: {} commands, {} primitives ({} in view), {} vertices, \
             stack depth {}",
            state.time,
            stats.commands,
            stats.primitives,
            stats.in_view,
            stats.vertices,
            stats.max_stack_depth
        );
        if frame % 60 == 0 {
            log_progress(&scene, &state);
        }

        frame += 1;
        thread::sleep(frame_time);
    }

    info!("stopped after {frame} frames");
    log_progress(&scene, &state);
    Ok(())
}

fn log_progress(scene: &RaceScene, state: &GlobalState) {
    let camera = scene.camera();
    info!(
        "t = {:.2}s, {} camera at {:.1} looking at {:.1}",
        state.time,
        scene.camera_mode(),
        camera.eye,
        camera.center
    );
    for robot in scene.robots() {
        let progress = robot.state();
        info!(
            "  {}: lap {}, segment {}, {:.1} travelled at {:.1}",
            progress.lane(),
            progress.laps(),
            progress.segment_index(),
            progress.distance(),
            progress.speed()
        );
    }
}

fn main() -> ExitCode {
    logging::init_logger();

    match parse_options(Arguments::from_env()).and_then(|options| run(&options)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}
