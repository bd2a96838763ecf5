//! wgpu render backend for the skyflight scene.
//!
//! Draws every mesh node of the scene graph as an instance of a
//! per-geometry mesh, lit by the scene's hemisphere and directional lights
//! and blended into linear fog.
//!
//! # Invariants
//! - Renderer never mutates the scene.
//! - Translucent meshes draw after opaque ones.
//! - Shadow maps are not rendered; shadow flags are carried but unused here.

mod gpu;
mod mesh;
mod shaders;

pub use gpu::{WgpuFrame, WgpuRenderer};
