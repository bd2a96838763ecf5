use glam::Vec3;
use skyflight_common::{Palette, Transform};
use std::f32::consts::FRAC_PI_2;

use crate::geometry::{Geometry, Material, Mesh};
use crate::graph::{Node, NodeId, SceneError, SceneGraph};

/// A translucent cylinder lying along Z, its top half showing as the sea.
///
/// Returns the spinning group; the cylinder is a child turned onto the Z
/// axis so that spinning the group about Z rolls the surface.
pub(crate) fn build(graph: &mut SceneGraph, parent: NodeId) -> Result<NodeId, SceneError> {
    let sea = graph.add(
        parent,
        Node::group()
            .named("sea")
            .with_transform(Transform::from_position(Vec3::new(0.0, -600.0, 0.0))),
    )?;

    let mut surface = Mesh::new(
        Geometry::Cylinder {
            radius_top: 600.0,
            radius_bottom: 600.0,
            height: 800.0,
            radial_segments: 40,
            height_segments: 10,
        },
        Material::flat(Palette::BLUE).with_opacity(0.6),
    );
    surface.receive_shadow = true;

    graph.add(
        sea,
        Node::mesh(surface)
            .named("sea-surface")
            .with_transform(Transform::default().with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0))),
    )?;

    Ok(sea)
}
