use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::app::AppState;
use crate::renderer::Renderer;

/// Host hook that arranges for the next tick, e.g. a window redraw request.
pub trait FrameScheduler {
    fn request_next_frame(&mut self);
}

/// Shared stop flag. Cloning yields a handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome<T> {
    /// Animated, drew, and rescheduled.
    Rendered(T),
    /// Did nothing; the loop is stopped.
    Stopped,
}

impl<T> FrameOutcome<T> {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }
}

/// The render step as an explicit state machine.
///
/// While `Running`, each [`tick`](Self::tick) animates the app state, draws
/// once, and requests the next frame once. Cancelling the token (or calling
/// [`stop`](Self::stop)) moves it to `Stopped`, after which ticks are no-ops
/// and nothing reschedules.
#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    token: CancelToken,
    frames: u64,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Running,
            token: CancelToken::new(),
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// A handle that stops the loop at its next tick.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Frames rendered since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn stop(&mut self) {
        self.token.cancel();
        self.state = LoopState::Stopped;
        tracing::debug!(frames = self.frames, "frame loop stopped");
    }

    /// Clear cancellation and return to `Running`. The caller must schedule
    /// the first frame again, since a stopped loop left none pending.
    pub fn resume(&mut self) {
        self.token.reset();
        if self.state == LoopState::Stopped {
            self.state = LoopState::Running;
            tracing::debug!(frames = self.frames, "frame loop resumed");
        }
    }

    /// Run one frame.
    pub fn tick<R, S>(
        &mut self,
        app: &mut AppState,
        renderer: &mut R,
        scheduler: &mut S,
    ) -> FrameOutcome<R::Output>
    where
        R: Renderer,
        S: FrameScheduler,
    {
        if self.token.is_cancelled() && self.state == LoopState::Running {
            self.state = LoopState::Stopped;
            tracing::debug!(frames = self.frames, "frame loop cancelled");
        }
        if self.state == LoopState::Stopped {
            return FrameOutcome::Stopped;
        }

        let _span = tracing::trace_span!("frame", n = self.frames).entered();
        app.animate();
        let output = renderer.render(app.scene(), app.camera());
        scheduler.request_next_frame();
        self.frames += 1;
        FrameOutcome::Rendered(output)
    }

    /// Run up to `n` ticks, stopping early if the loop stops.
    ///
    /// `usize::MAX` runs until the token is cancelled.
    pub fn run_for<R, S>(
        &mut self,
        n: usize,
        app: &mut AppState,
        renderer: &mut R,
        scheduler: &mut S,
    ) -> Vec<R::Output>
    where
        R: Renderer,
        S: FrameScheduler,
    {
        let mut outputs = Vec::new();
        for _ in 0..n {
            match self.tick(app, renderer, scheduler) {
                FrameOutcome::Rendered(out) => outputs.push(out),
                FrameOutcome::Stopped => break,
            }
        }
        tracing::debug!(
            requested = n,
            rendered = outputs.len(),
            total = self.frames,
            "bounded run finished"
        );
        outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DebugTextRenderer;
    use skyflight_input::{PointerEvent, Viewport};
    use skyflight_kernel::AnimatorConfig;
    use skyflight_scene::{PerspectiveCamera, SceneGraph};

    #[derive(Default)]
    struct CountingRenderer {
        draws: usize,
    }

    impl Renderer for CountingRenderer {
        type Output = usize;

        fn render(&mut self, _scene: &SceneGraph, _camera: &PerspectiveCamera) -> usize {
            self.draws += 1;
            self.draws
        }
    }

    #[derive(Default)]
    struct CountingScheduler {
        requests: usize,
    }

    impl FrameScheduler for CountingScheduler {
        fn request_next_frame(&mut self) {
            self.requests += 1;
        }
    }

    /// Cancels the loop from inside the scheduler after a number of frames.
    struct CancelAfter {
        remaining: usize,
        token: CancelToken,
    }

    impl FrameScheduler for CancelAfter {
        fn request_next_frame(&mut self) {
            self.remaining -= 1;
            if self.remaining == 0 {
                self.token.cancel();
            }
        }
    }

    fn app() -> AppState {
        AppState::new(
            Viewport::new(800.0, 600.0).unwrap(),
            AnimatorConfig::default(),
            5,
        )
        .unwrap()
    }

    #[test]
    fn one_tick_draws_once_and_reschedules_once() {
        let mut app = app();
        let mut frame_loop = FrameLoop::new();
        let mut r = CountingRenderer::default();
        let mut s = CountingScheduler::default();

        let outcome = frame_loop.tick(&mut app, &mut r, &mut s);
        assert_eq!(outcome, FrameOutcome::Rendered(1));
        assert_eq!(r.draws, 1);
        assert_eq!(s.requests, 1);
        assert_eq!(frame_loop.frames(), 1);
    }

    #[test]
    fn cancelled_tick_neither_draws_nor_reschedules() {
        let mut app = app();
        let mut frame_loop = FrameLoop::new();
        let mut r = CountingRenderer::default();
        let mut s = CountingScheduler::default();

        frame_loop.token().cancel();
        let outcome = frame_loop.tick(&mut app, &mut r, &mut s);
        assert_eq!(outcome, FrameOutcome::Stopped);
        assert_eq!(frame_loop.state(), LoopState::Stopped);
        assert_eq!((r.draws, s.requests), (0, 0));
        assert_eq!(app.animated().propeller_angle, 0.0);
    }

    #[test]
    fn bounded_run_is_deterministic() {
        let mut app = app();
        let mut frame_loop = FrameLoop::new();
        let mut r = CountingRenderer::default();
        let mut s = CountingScheduler::default();

        let outputs = frame_loop.run_for(10, &mut app, &mut r, &mut s);
        assert_eq!(outputs.len(), 10);
        assert_eq!(r.draws, s.requests);
        assert!((app.animated().propeller_angle - 3.0).abs() < 1e-4);
    }

    #[test]
    fn cancel_from_scheduler_stops_after_current_frame() {
        let mut app = app();
        let mut frame_loop = FrameLoop::new();
        let mut r = CountingRenderer::default();
        let mut s = CancelAfter {
            remaining: 3,
            token: frame_loop.token(),
        };

        let outputs = frame_loop.run_for(100, &mut app, &mut r, &mut s);
        assert_eq!(outputs, vec![1, 2, 3]);
        assert_eq!(frame_loop.state(), LoopState::Stopped);
        assert_eq!(frame_loop.frames(), 3);
    }

    #[test]
    fn unbounded_run_ends_on_cancel() {
        let mut app = app();
        let mut frame_loop = FrameLoop::new();
        let mut r = DebugTextRenderer::new();
        let mut s = CancelAfter {
            remaining: 2,
            token: frame_loop.token(),
        };

        let outputs = frame_loop.run_for(usize::MAX, &mut app, &mut r, &mut s);
        assert_eq!(outputs.len(), 2);
        assert!(outputs[1].contains("Frame 2"));
        assert_eq!(frame_loop.state(), LoopState::Stopped);
    }

    #[test]
    fn stop_and_resume() {
        let mut app = app();
        let mut frame_loop = FrameLoop::new();
        let mut r = CountingRenderer::default();
        let mut s = CountingScheduler::default();

        frame_loop.stop();
        assert!(!frame_loop.tick(&mut app, &mut r, &mut s).is_rendered());
        frame_loop.resume();
        assert_eq!(frame_loop.state(), LoopState::Running);
        assert!(frame_loop.tick(&mut app, &mut r, &mut s).is_rendered());
        assert_eq!((r.draws, s.requests), (1, 1));
    }

    #[test]
    fn frames_read_latest_pointer() {
        let mut app = app();
        let mut frame_loop = FrameLoop::new();
        let mut r = CountingRenderer::default();
        let mut s = CountingScheduler::default();

        frame_loop.tick(&mut app, &mut r, &mut s);
        app.on_pointer_move(PointerEvent::new(0.0, 600.0)).unwrap();
        frame_loop.tick(&mut app, &mut r, &mut s);
        let p = app.animated().plane_position;
        assert_eq!((p.x, p.y), (-100.0, 25.0));
    }
}
