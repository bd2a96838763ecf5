use serde::{Deserialize, Serialize};

/// Errors from pointer ingestion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("viewport must be finite and non-empty, got {width}x{height}")]
    EmptyViewport { width: f32, height: f32 },
    #[error("pointer coordinate is not finite: ({x}, {y})")]
    NonFiniteCoordinate { x: f32, y: f32 },
}

/// Size of the drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self, InputError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(InputError::EmptyViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// A pointer-move event in viewport-relative pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub client_x: f32,
    pub client_y: f32,
}

impl PointerEvent {
    pub fn new(client_x: f32, client_y: f32) -> Self {
        Self { client_x, client_y }
    }
}

/// Pointer position normalized to `[-1, 1]` on both axes, +Y up.
///
/// Values outside that square are possible when the pointer leaves the
/// viewport; consumers clamp where it matters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    pub const CENTER: PointerPosition = PointerPosition { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Normalize a pixel event against a viewport.
    pub fn from_event(event: PointerEvent, viewport: Viewport) -> Result<Self, InputError> {
        if !event.client_x.is_finite() || !event.client_y.is_finite() {
            return Err(InputError::NonFiniteCoordinate {
                x: event.client_x,
                y: event.client_y,
            });
        }
        Ok(Self {
            x: -1.0 + 2.0 * (event.client_x / viewport.width),
            y: 1.0 - 2.0 * (event.client_y / viewport.height),
        })
    }
}

/// Holds the latest normalized pointer position.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    viewport: Viewport,
    position: PointerPosition,
    moves: u64,
}

impl PointerTracker {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            position: PointerPosition::CENTER,
            moves: 0,
        }
    }

    /// Normalize and store an event, overwriting the previous position.
    pub fn on_pointer_move(&mut self, event: PointerEvent) -> Result<PointerPosition, InputError> {
        let position = PointerPosition::from_event(event, self.viewport)?;
        self.position = position;
        self.moves += 1;
        tracing::trace!(x = position.x, y = position.y, "pointer moved");
        Ok(position)
    }

    /// Later events normalize against the new size. The stored position is kept.
    pub fn resize(&mut self, viewport: Viewport) {
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            "pointer viewport resized"
        );
        self.viewport = viewport;
    }

    pub fn position(&self) -> PointerPosition {
        self.position
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of accepted pointer events.
    pub fn moves(&self) -> u64 {
        self.moves
    }
}
