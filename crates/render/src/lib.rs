//! Rendering adapter and frame driver.
//!
//! # Invariants
//! - Renderers read the scene; they never mutate it.
//! - A running tick draws exactly once and reschedules exactly once.
//! - A stopped or cancelled tick does neither.

mod app;
mod frame;
mod renderer;

pub use app::{AppError, AppState};
pub use frame::{CancelToken, FrameLoop, FrameOutcome, FrameScheduler, LoopState};
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    concat!("skyflight-render v", env!("CARGO_PKG_VERSION"))
}
