//! Input tracking: raw pointer events normalized against the viewport.
//!
//! # Invariants
//! - Last write wins: only the most recent accepted event is kept.
//! - A rejected event never disturbs the stored position.

pub mod pointer;

pub use pointer::{InputError, PointerEvent, PointerPosition, PointerTracker, Viewport};
