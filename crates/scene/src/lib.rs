//! Scene graph and stage content.
//!
//! The graph is an arena of nodes addressed by [`NodeId`]. Nodes are never
//! removed, so an id minted by a graph stays valid for that graph's lifetime.
//!
//! # Invariants
//! - Every node except the root has exactly one parent.
//! - Mesh geometry is validated when the node is added.
//! - Renderers read the graph; only the stage writes animated transforms.

mod airplane;
mod camera;
mod geometry;
mod graph;
mod light;
mod sea;
mod sky;
mod stage;

pub use camera::PerspectiveCamera;
pub use geometry::{Geometry, Material, Mesh};
pub use graph::{Fog, Node, NodeId, NodeKind, SceneError, SceneGraph, WalkItem};
pub use light::{Light, ShadowCamera};
pub use stage::{Stage, StageHandles};
