use glam::Vec3;
use rand::Rng;
use skyflight_common::{Palette, Transform};
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::geometry::{Geometry, Material, Mesh};
use crate::graph::{Node, NodeId, SceneError, SceneGraph};

pub(crate) const CLOUD_COUNT: usize = 20;

/// A cloud: 3 to 5 small cubes in a row, jittered and randomly sized.
fn cloud(
    graph: &mut SceneGraph,
    parent: NodeId,
    transform: Transform,
    rng: &mut impl Rng,
) -> Result<NodeId, SceneError> {
    let cloud = graph.add(
        parent,
        Node::group().named("cloud").with_transform(transform),
    )?;

    let blocks = rng.random_range(3..6);
    for i in 0..blocks {
        let position = Vec3::new(
            i as f32 * 15.0,
            rng.random::<f32>() * 10.0,
            rng.random::<f32>() * 10.0,
        );
        let rotation = Vec3::new(0.0, rng.random::<f32>() * TAU, rng.random::<f32>() * TAU);
        let scale = 0.1 + rng.random::<f32>() * 0.9;
        graph.add(
            cloud,
            Node::mesh(
                Mesh::new(Geometry::cuboid(20.0, 20.0, 20.0), Material::flat(Palette::WHITE))
                    .shadowed(),
            )
            .with_transform(
                Transform::from_position(position)
                    .with_rotation(rotation)
                    .with_uniform_scale(scale),
            ),
        )?;
    }
    Ok(cloud)
}

/// A ring of clouds around the Z axis, centered below the scene like the sea.
pub(crate) fn build(
    graph: &mut SceneGraph,
    parent: NodeId,
    rng: &mut impl Rng,
) -> Result<NodeId, SceneError> {
    let sky = graph.add(
        parent,
        Node::group()
            .named("sky")
            .with_transform(Transform::from_position(Vec3::new(0.0, -600.0, 0.0))),
    )?;

    let step = TAU / CLOUD_COUNT as f32;
    for i in 0..CLOUD_COUNT {
        let a = step * i as f32;
        let h = 750.0 + rng.random::<f32>() * 200.0;
        let z = -400.0 - rng.random::<f32>() * 400.0;
        let s = 1.0 + rng.random::<f32>() * 2.0;
        let transform = Transform::from_position(Vec3::new(a.sin() * h, a.cos() * h, z))
            .with_rotation(Vec3::new(0.0, 0.0, a + FRAC_PI_2))
            .with_uniform_scale(s);
        cloud(graph, sky, transform, rng)?;
    }

    tracing::debug!(clouds = CLOUD_COUNT, "sky built");
    Ok(sky)
}
