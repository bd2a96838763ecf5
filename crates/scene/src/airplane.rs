use glam::Vec3;
use skyflight_common::{Color, Palette, Transform};

use crate::geometry::{Geometry, Material, Mesh};
use crate::graph::{Node, NodeId, SceneError, SceneGraph};

/// Node handles of a built airplane.
pub(crate) struct Airplane {
    pub body: NodeId,
    pub propeller: NodeId,
}

fn part(width: f32, height: f32, depth: f32, color: Color) -> Mesh {
    Mesh::new(Geometry::cuboid(width, height, depth), Material::flat(color)).shadowed()
}

/// Cockpit, engine, tail, wing and a propeller with one blade.
///
/// The whole body is scaled to a quarter and starts at y = 100.
pub(crate) fn build(graph: &mut SceneGraph, parent: NodeId) -> Result<Airplane, SceneError> {
    let body = graph.add(
        parent,
        Node::group().named("airplane").with_transform(
            Transform::from_position(Vec3::new(0.0, 100.0, 0.0)).with_uniform_scale(0.25),
        ),
    )?;

    graph.add(
        body,
        Node::mesh(part(60.0, 50.0, 50.0, Palette::RED)).named("cockpit"),
    )?;
    graph.add(
        body,
        Node::mesh(part(20.0, 50.0, 50.0, Palette::WHITE))
            .named("engine")
            .with_transform(Transform::from_position(Vec3::new(40.0, 0.0, 0.0))),
    )?;
    graph.add(
        body,
        Node::mesh(part(15.0, 20.0, 5.0, Palette::RED))
            .named("tail")
            .with_transform(Transform::from_position(Vec3::new(-35.0, 25.0, 0.0))),
    )?;
    graph.add(
        body,
        Node::mesh(part(40.0, 8.0, 150.0, Palette::WHITE)).named("wing"),
    )?;

    let propeller = graph.add(
        body,
        Node::mesh(part(20.0, 10.0, 10.0, Palette::BROWN))
            .named("propeller")
            .with_transform(Transform::from_position(Vec3::new(50.0, 0.0, 0.0))),
    )?;
    graph.add(
        propeller,
        Node::mesh(part(1.0, 100.0, 10.0, Palette::DARK_BROWN))
            .named("blade")
            .with_transform(Transform::from_position(Vec3::new(8.0, 0.0, 0.0))),
    )?;

    Ok(Airplane { body, propeller })
}
