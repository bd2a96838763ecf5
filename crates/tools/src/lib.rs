//! Developer tooling: app-state inspector and frame timing.
//!
//! # Invariants
//! - Tools only read application state.

mod inspector;
mod timer;

pub use inspector::{AppInspector, AppSummary, NodeInfo};
pub use timer::FrameTimer;

pub fn crate_info() -> &'static str {
    concat!("skyflight-tools v", env!("CARGO_PKG_VERSION"))
}
