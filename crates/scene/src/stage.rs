use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use skyflight_common::{Color, Palette, Transform};
use skyflight_kernel::AnimatedState;

use crate::camera::PerspectiveCamera;
use crate::graph::{Fog, Node, NodeId, SceneError, SceneGraph};
use crate::light::{Light, ShadowCamera};
use crate::{airplane, sea, sky};

/// Nodes the animator drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageHandles {
    pub airplane: NodeId,
    pub propeller: NodeId,
    pub sea: NodeId,
    pub sky: NodeId,
}

/// The built scene: graph, camera, and handles to the animated nodes.
#[derive(Debug, Clone)]
pub struct Stage {
    graph: SceneGraph,
    camera: PerspectiveCamera,
    handles: StageHandles,
}

impl Stage {
    /// Build the airplane, sea, cloud ring, lights and fog.
    ///
    /// Cloud layout is drawn from `seed`, so equal seeds give equal scenes.
    pub fn build(aspect: f32, seed: u64) -> Result<Self, SceneError> {
        let _span = tracing::info_span!("stage_build", seed).entered();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let mut rng = StdRng::seed_from_u64(seed);

        graph.fog = Some(Fog {
            color: Palette::SKY,
            near: 100.0,
            far: 950.0,
        });

        graph.add(
            root,
            Node::light(Light::Hemisphere {
                sky: Color(0xaaaaaa),
                ground: Color::BLACK,
                intensity: 0.9,
            })
            .named("hemisphere-light"),
        )?;
        graph.add(
            root,
            Node::light(Light::Directional {
                color: Color::WHITE,
                intensity: 0.9,
                cast_shadow: true,
                shadow: ShadowCamera::default(),
            })
            .named("shadow-light")
            .with_transform(Transform::from_position(Vec3::new(150.0, 350.0, 350.0))),
        )?;

        let sky = sky::build(&mut graph, root, &mut rng)?;
        let plane = airplane::build(&mut graph, root)?;
        let sea = sea::build(&mut graph, root)?;

        let handles = StageHandles {
            airplane: plane.body,
            propeller: plane.propeller,
            sea,
            sky,
        };

        tracing::info!(
            nodes = graph.node_count(),
            meshes = graph.mesh_count(),
            "stage built"
        );

        Ok(Self {
            graph,
            camera: PerspectiveCamera::with_aspect(aspect),
            handles,
        })
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn handles(&self) -> StageHandles {
        self.handles
    }

    pub fn resize(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }

    /// Write an animated state into the graph.
    pub fn apply(&mut self, state: &AnimatedState) {
        let h = self.handles;
        self.update(h.airplane, |t| {
            t.position.x = state.plane_position.x;
            t.position.y = state.plane_position.y;
        });
        self.update(h.propeller, |t| t.rotation.x = state.propeller_angle);
        self.update(h.sea, |t| t.rotation.z = state.sea_angle);
        self.update(h.sky, |t| t.rotation.z = state.sky_angle);
    }

    fn update(&mut self, id: NodeId, f: impl FnOnce(&mut Transform)) {
        match self.graph.transform_mut(id) {
            Some(t) => f(t),
            None => tracing::warn!(?id, "stage handle does not resolve"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;
    use crate::sky::CLOUD_COUNT;
    use glam::Vec2;

    fn stage() -> Stage {
        Stage::build(16.0 / 9.0, 7).unwrap()
    }

    #[test]
    fn build_has_expected_structure() {
        let s = stage();
        let g = s.graph();
        let h = s.handles();
        assert_eq!(g.get(h.airplane).unwrap().name.as_deref(), Some("airplane"));
        assert_eq!(g.get(h.propeller).unwrap().name.as_deref(), Some("propeller"));
        assert_eq!(g.children(h.sky).len(), CLOUD_COUNT);
        // cockpit, engine, tail, wing, propeller
        assert_eq!(g.children(h.airplane).len(), 5);
        assert_eq!(g.children(h.propeller).len(), 1);
        assert!(g.fog.is_some());

        let lights = g
            .walk()
            .iter()
            .filter(|w| matches!(g.get(w.id).unwrap().kind, NodeKind::Light(_)))
            .count();
        assert_eq!(lights, 2);
    }

    #[test]
    fn clouds_have_three_to_five_blocks() {
        let s = stage();
        let g = s.graph();
        for cloud in g.children(s.handles().sky) {
            let n = g.children(*cloud).len();
            assert!((3..=5).contains(&n), "cloud with {n} blocks");
        }
    }

    #[test]
    fn cloud_ring_radius_is_within_band() {
        let s = stage();
        let g = s.graph();
        for cloud in g.children(s.handles().sky) {
            let p = g.get(*cloud).unwrap().transform.position;
            let r = Vec2::new(p.x, p.y).length();
            assert!((749.0..=951.0).contains(&r));
            assert!((-800.0..=-400.0).contains(&p.z));
        }
    }

    #[test]
    fn same_seed_same_scene() {
        let a = Stage::build(1.0, 99).unwrap();
        let b = Stage::build(1.0, 99).unwrap();
        assert_eq!(a.graph().node_count(), b.graph().node_count());
        for (x, y) in a.graph().walk().iter().zip(b.graph().walk().iter()) {
            assert_eq!(x.world, y.world);
        }
    }

    #[test]
    fn apply_writes_animated_nodes() {
        let mut s = stage();
        let state = AnimatedState {
            plane_position: Vec2::new(-50.0, 150.0),
            propeller_angle: 0.9,
            sea_angle: 0.015,
            sky_angle: 0.03,
        };
        s.apply(&state);
        let g = s.graph();
        let h = s.handles();
        let plane = g.get(h.airplane).unwrap().transform;
        assert_eq!(plane.position, Vec3::new(-50.0, 150.0, 0.0));
        assert_eq!(plane.scale, Vec3::splat(0.25));
        assert_eq!(g.get(h.propeller).unwrap().transform.rotation.x, 0.9);
        assert_eq!(g.get(h.sea).unwrap().transform.rotation.z, 0.015);
        assert_eq!(g.get(h.sky).unwrap().transform.rotation.z, 0.03);
    }

    #[test]
    fn resize_updates_camera_aspect() {
        let mut s = stage();
        s.resize(2.5);
        assert_eq!(s.camera().aspect, 2.5);
    }
}
