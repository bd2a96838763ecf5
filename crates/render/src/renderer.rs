use skyflight_scene::{Geometry, Light, NodeKind, PerspectiveCamera, SceneGraph};
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene graph and camera and produces output. It never
/// mutates the scene; the stage owns the truth.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Draw one frame.
    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> Self::Output;
}

/// Produces a human-readable dump of the scene.
///
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> String {
        self.frames += 1;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} ({} nodes, {} meshes) ===",
            self.frames,
            scene.node_count(),
            scene.mesh_count()
        );
        let _ = writeln!(
            out,
            "Camera: pos=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.3}",
            camera.position.x, camera.position.y, camera.position.z, camera.fov_degrees, camera.aspect
        );
        if let Some(fog) = &scene.fog {
            let _ = writeln!(out, "Fog: {} {:.0}..{:.0}", fog.color, fog.near, fog.far);
        }

        for item in scene.walk() {
            let Some(node) = scene.get(item.id) else {
                continue;
            };
            let t = &node.transform;
            let kind = match &node.kind {
                NodeKind::Group => "group".to_string(),
                NodeKind::Mesh(mesh) => match mesh.geometry {
                    Geometry::Box {
                        width,
                        height,
                        depth,
                    } => format!("box {width}x{height}x{depth} {}", mesh.material.color),
                    Geometry::Cylinder {
                        radius_top, height, ..
                    } => format!("cylinder r={radius_top} h={height} {}", mesh.material.color),
                },
                NodeKind::Light(Light::Hemisphere { intensity, .. }) => {
                    format!("hemisphere-light {intensity}")
                }
                NodeKind::Light(Light::Directional { intensity, .. }) => {
                    format!("directional-light {intensity}")
                }
            };
            let _ = writeln!(
                out,
                "{:indent$}[{}] {} pos=({:.2}, {:.2}, {:.2}) rot=({:.3}, {:.3}, {:.3})",
                "",
                node.name.as_deref().unwrap_or("-"),
                kind,
                t.position.x,
                t.position.y,
                t.position.z,
                t.rotation.x,
                t.rotation.y,
                t.rotation.z,
                indent = item.depth * 2
            );
        }

        out
    }
}
