use skyflight_render::{AppState, FrameLoop, LoopState};
use skyflight_scene::SceneGraph;

/// Read-only queries against the app state for debugging and the HUD.
pub struct AppInspector;

impl AppInspector {
    /// Produce a summary of the current frame state.
    pub fn summary(app: &AppState, frame_loop: &FrameLoop) -> AppSummary {
        let animated = app.animated();
        let pointer = app.pointer();
        AppSummary {
            frames: frame_loop.frames(),
            running: frame_loop.state() == LoopState::Running,
            pointer: [pointer.x, pointer.y],
            plane_position: animated.plane_position.to_array(),
            propeller_angle: animated.propeller_angle,
            sea_angle: animated.sea_angle,
            sky_angle: animated.sky_angle,
            node_count: app.scene().node_count(),
            mesh_count: app.scene().mesh_count(),
        }
    }

    /// Look up a named node and report its local transform.
    pub fn inspect_node(scene: &SceneGraph, name: &str) -> Option<NodeInfo> {
        let id = scene.find_by_name(name)?;
        let node = scene.get(id)?;
        let t = node.transform;
        Some(NodeInfo {
            name: name.to_string(),
            children: node.children().len(),
            position: t.position.to_array(),
            rotation: t.rotation.to_array(),
            scale: t.scale.to_array(),
        })
    }
}

/// Summary of the app state for the inspector.
#[derive(Debug, Clone)]
pub struct AppSummary {
    pub frames: u64,
    pub running: bool,
    pub pointer: [f32; 2],
    pub plane_position: [f32; 2],
    pub propeller_angle: f32,
    pub sea_angle: f32,
    pub sky_angle: f32,
    pub node_count: usize,
    pub mesh_count: usize,
}

impl std::fmt::Display for AppSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "frames={} {} pointer=({:.3}, {:.3}) plane=({:.2}, {:.2}) propeller={:.3} sea={:.4} sky={:.4} nodes={} meshes={}",
            self.frames,
            if self.running { "running" } else { "stopped" },
            self.pointer[0],
            self.pointer[1],
            self.plane_position[0],
            self.plane_position[1],
            self.propeller_angle,
            self.sea_angle,
            self.sky_angle,
            self.node_count,
            self.mesh_count,
        )
    }
}

/// Detailed info about a single node.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub name: String,
    pub children: usize,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Node [{}] pos=({:.2}, {:.2}, {:.2}) rot=({:.3}, {:.3}, {:.3}) scale=({:.2}, {:.2}, {:.2}) children={}",
            self.name,
            self.position[0],
            self.position[1],
            self.position[2],
            self.rotation[0],
            self.rotation[1],
            self.rotation[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
            self.children,
        )
    }
}
