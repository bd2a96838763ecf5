use skyflight_input::{InputError, PointerEvent, PointerPosition, PointerTracker, Viewport};
use skyflight_kernel::{AnimatedState, Animator, AnimatorConfig, ConfigError};
use skyflight_scene::{PerspectiveCamera, SceneError, SceneGraph, Stage};

/// Errors from building the application state.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Everything one frame reads and writes, owned by the frame driver.
#[derive(Debug, Clone)]
pub struct AppState {
    tracker: PointerTracker,
    animator: Animator,
    animated: AnimatedState,
    stage: Stage,
}

impl AppState {
    pub fn new(viewport: Viewport, config: AnimatorConfig, seed: u64) -> Result<Self, AppError> {
        config.validate()?;
        let stage = Stage::build(viewport.aspect(), seed)?;
        let mut state = Self {
            tracker: PointerTracker::new(viewport),
            animator: Animator::new(config),
            animated: AnimatedState::default(),
            stage,
        };
        state.stage.apply(&state.animated);
        Ok(state)
    }

    /// Record a pointer move. Only the latest accepted event survives until
    /// the next frame.
    pub fn on_pointer_move(&mut self, event: PointerEvent) -> Result<PointerPosition, InputError> {
        self.tracker.on_pointer_move(event)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.tracker.resize(viewport);
        self.stage.resize(viewport.aspect());
    }

    /// Advance the animation one frame and write it into the scene.
    pub fn animate(&mut self) {
        self.animated = self
            .animator
            .advance(self.tracker.position(), &self.animated);
        self.stage.apply(&self.animated);
    }

    pub fn pointer(&self) -> PointerPosition {
        self.tracker.position()
    }

    pub fn animated(&self) -> &AnimatedState {
        &self.animated
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut Animator {
        &mut self.animator
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn scene(&self) -> &SceneGraph {
        self.stage.graph()
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        self.stage.camera()
    }
}
