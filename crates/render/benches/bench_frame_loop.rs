use std::hint::black_box;
use std::time::Instant;

use skyflight_input::{PointerEvent, Viewport};
use skyflight_kernel::AnimatorConfig;
use skyflight_render::{AppState, DebugTextRenderer, FrameLoop, FrameScheduler, Renderer};
use skyflight_scene::{PerspectiveCamera, SceneGraph};

struct NullScheduler;

impl FrameScheduler for NullScheduler {
    fn request_next_frame(&mut self) {}
}

/// Walks the graph like a real backend would, without drawing.
struct WalkRenderer;

impl Renderer for WalkRenderer {
    type Output = usize;

    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> usize {
        black_box(camera.view_projection());
        scene.walk().len()
    }
}

fn make_app(seed: u64) -> AppState {
    AppState::new(
        Viewport::new(1280.0, 720.0).expect("viewport"),
        AnimatorConfig::default(),
        seed,
    )
    .expect("app state")
}

fn bench_ticks<R: Renderer>(label: &str, renderer: &mut R, frames: usize) {
    let mut app = make_app(42);
    let mut frame_loop = FrameLoop::new();
    let mut scheduler = NullScheduler;

    let start = Instant::now();
    for i in 0..frames {
        let x = (i % 1280) as f32;
        let _ = app.on_pointer_move(PointerEvent::new(x, 360.0));
        black_box(frame_loop.tick(&mut app, renderer, &mut scheduler));
    }
    let elapsed = start.elapsed();
    let per_frame = elapsed / frames as u32;
    println!("  {label} ({frames} frames): {per_frame:?}/frame, total {elapsed:?}");
}

fn bench_stage_build(iterations: usize) {
    let start = Instant::now();
    for seed in 0..iterations as u64 {
        black_box(make_app(seed));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  stage build ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn main() {
    println!("=== skyflight frame loop benchmarks ===");
    bench_ticks("walk renderer", &mut WalkRenderer, 10_000);
    bench_ticks("debug text renderer", &mut DebugTextRenderer::new(), 1_000);
    bench_stage_build(200);
}
