use clap::{Parser, Subcommand};
use skyflight_input::{PointerEvent, Viewport};
use skyflight_kernel::{AngleMode, AnimatorConfig, remap};
use skyflight_render::{AppState, DebugTextRenderer, FrameLoop, FrameScheduler, Renderer};
use skyflight_scene::Stage;
use skyflight_tools::{AppInspector, FrameTimer};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const TIMING_WINDOW: usize = 120;

#[derive(Parser)]
#[command(name = "skyflight-cli", about = "Headless tools for the airplane scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run a bounded frame loop with a fixed pointer
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: usize,
        /// Pointer position in client pixels
        #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        pointer: Option<Vec<f32>>,
        /// Viewport width in pixels
        #[arg(long, default_value = "1280")]
        width: f32,
        /// Viewport height in pixels
        #[arg(long, default_value = "720")]
        height: f32,
        /// Animator configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Keep angles within [0, 2π)
        #[arg(long)]
        wrap_angles: bool,
        /// Seed for cloud placement
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Print the scene after the last frame
        #[arg(long)]
        dump: bool,
    },
    /// Print the initial scene tree
    Scene {
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Camera aspect ratio
        #[arg(long, default_value = "1.7778")]
        aspect: f32,
    },
    /// Evaluate one clamped linear remap
    Remap {
        #[arg(allow_negative_numbers = true)]
        v: f32,
        #[arg(allow_negative_numbers = true)]
        vmin: f32,
        #[arg(allow_negative_numbers = true)]
        vmax: f32,
        #[arg(allow_negative_numbers = true)]
        tmin: f32,
        #[arg(allow_negative_numbers = true)]
        tmax: f32,
    },
}

/// Counts requested frames; the bounded loop drives itself.
#[derive(Default)]
struct CountingScheduler {
    requests: u64,
}

impl FrameScheduler for CountingScheduler {
    fn request_next_frame(&mut self) {
        self.requests += 1;
    }
}

/// Renders to text and times each frame. Only the latest dump is kept.
struct TimedRenderer {
    inner: DebugTextRenderer,
    timer: FrameTimer,
    last: String,
}

impl TimedRenderer {
    fn new() -> Self {
        Self {
            inner: DebugTextRenderer::new(),
            timer: FrameTimer::new(TIMING_WINDOW),
            last: String::new(),
        }
    }
}

impl Renderer for TimedRenderer {
    type Output = ();

    fn render(
        &mut self,
        scene: &skyflight_scene::SceneGraph,
        camera: &skyflight_scene::PerspectiveCamera,
    ) {
        let start = Instant::now();
        self.last = self.inner.render(scene, camera);
        self.timer.record(start.elapsed());
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("skyflight-cli v{}", env!("CARGO_PKG_VERSION"));
            let config = AnimatorConfig::default();
            println!(
                "animator: steps propeller={} sea={} sky={} mode={:?}",
                config.propeller_step, config.sea_step, config.sky_step, config.angle_mode
            );
            println!("render: {}", skyflight_render::crate_info());
            println!("tools: {}", skyflight_tools::crate_info());
        }
        Commands::Simulate {
            frames,
            pointer,
            width,
            height,
            config,
            wrap_angles,
            seed,
            dump,
        } => {
            let mut config = match config {
                Some(path) => AnimatorConfig::load(&path)?,
                None => AnimatorConfig::default(),
            };
            if wrap_angles {
                config.angle_mode = AngleMode::Wrapped;
            }
            let mut app = AppState::new(Viewport::new(width, height)?, config, seed)?;
            if let Some([x, y]) = pointer.as_deref() {
                let pos = app.on_pointer_move(PointerEvent::new(*x, *y))?;
                println!("Pointer: ({:+.3}, {:+.3})", pos.x, pos.y);
            }
            tracing::info!(frames, seed, "simulating");

            let mut frame_loop = FrameLoop::new();
            let mut renderer = TimedRenderer::new();
            let mut scheduler = CountingScheduler::default();
            for _ in 0..frames {
                if !frame_loop
                    .tick(&mut app, &mut renderer, &mut scheduler)
                    .is_rendered()
                {
                    break;
                }
            }

            println!("{}", AppInspector::summary(&app, &frame_loop));
            println!(
                "Scheduled: {}  render avg={:?} max={:?}",
                scheduler.requests,
                renderer.timer.average(),
                renderer.timer.max()
            );
            if dump {
                print!("{}", renderer.last);
            }
        }
        Commands::Scene { seed, aspect } => {
            let stage = Stage::build(aspect, seed)?;
            let mut renderer = DebugTextRenderer::new();
            print!("{}", renderer.render(stage.graph(), stage.camera()));
        }
        Commands::Remap {
            v,
            vmin,
            vmax,
            tmin,
            tmax,
        } => {
            println!("{}", remap(v, vmin, vmax, tmin, tmax));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_renderer_keeps_only_latest_frame() {
        let mut app = AppState::new(
            Viewport::new(1280.0, 720.0).unwrap(),
            AnimatorConfig::default(),
            3,
        )
        .unwrap();
        let mut frame_loop = FrameLoop::new();
        let mut renderer = TimedRenderer::new();
        let mut scheduler = CountingScheduler::default();

        let frames = TIMING_WINDOW + 30;
        let outputs = frame_loop.run_for(frames, &mut app, &mut renderer, &mut scheduler);
        assert_eq!(outputs.len(), frames);
        assert!(renderer.last.starts_with(&format!("=== Frame {frames} ")));
        assert_eq!(renderer.timer.count(), TIMING_WINDOW);
        assert_eq!(scheduler.requests, frames as u64);
    }
}
