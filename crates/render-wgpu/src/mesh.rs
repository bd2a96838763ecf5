use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use skyflight_scene::{Geometry, Mesh};
use std::f32::consts::TAU;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// CPU-side triangle list.
#[derive(Debug, Default)]
pub(crate) struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.vertices.len() as u32;
        self.vertices
            .extend(corners.iter().map(|c| Vertex::new(*c, normal)));
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
}

/// Identity of a generated mesh. Equal keys share one GPU buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum MeshKey {
    Box {
        size: [u32; 3],
    },
    Cylinder {
        radii: [u32; 2],
        height: u32,
        segments: [u32; 2],
        flat: bool,
    },
}

impl MeshKey {
    pub fn of(mesh: &Mesh) -> Self {
        match mesh.geometry {
            Geometry::Box {
                width,
                height,
                depth,
            } => Self::Box {
                size: [width.to_bits(), height.to_bits(), depth.to_bits()],
            },
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
                height_segments,
            } => Self::Cylinder {
                radii: [radius_top.to_bits(), radius_bottom.to_bits()],
                height: height.to_bits(),
                segments: [radial_segments, height_segments],
                flat: mesh.material.flat_shading,
            },
        }
    }

    pub fn build(&self) -> MeshData {
        match *self {
            Self::Box { size } => box_mesh(
                f32::from_bits(size[0]),
                f32::from_bits(size[1]),
                f32::from_bits(size[2]),
            ),
            Self::Cylinder {
                radii,
                height,
                segments,
                flat,
            } => cylinder_mesh(
                f32::from_bits(radii[0]),
                f32::from_bits(radii[1]),
                f32::from_bits(height),
                segments[0],
                segments[1],
                flat,
            ),
        }
    }
}

/// Box centered on the origin, one normal per face.
fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);
    let v = Vec3::new;
    let mut m = MeshData::default();
    // +Z
    m.push_quad([v(-x, -y, z), v(x, -y, z), v(x, y, z), v(-x, y, z)], Vec3::Z);
    // -Z
    m.push_quad([v(x, -y, -z), v(-x, -y, -z), v(-x, y, -z), v(x, y, -z)], Vec3::NEG_Z);
    // +X
    m.push_quad([v(x, -y, z), v(x, -y, -z), v(x, y, -z), v(x, y, z)], Vec3::X);
    // -X
    m.push_quad([v(-x, -y, -z), v(-x, -y, z), v(-x, y, z), v(-x, y, -z)], Vec3::NEG_X);
    // +Y
    m.push_quad([v(-x, y, z), v(x, y, z), v(x, y, -z), v(-x, y, -z)], Vec3::Y);
    // -Y
    m.push_quad([v(-x, -y, -z), v(x, -y, -z), v(x, -y, z), v(-x, -y, z)], Vec3::NEG_Y);
    m
}

/// Cylinder along Y, centered on the origin, with end caps.
///
/// The seam sits on +Z and angles grow toward +X.
fn cylinder_mesh(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
    flat: bool,
) -> MeshData {
    let half = height * 0.5;
    let ring = |theta: f32, t: f32| {
        let r = radius_bottom + (radius_top - radius_bottom) * t;
        Vec3::new(r * theta.sin(), -half + height * t, r * theta.cos())
    };
    // Outward normal of a smooth side, tilted by the cone slope.
    let slope = (radius_bottom - radius_top) / height;
    let smooth = |theta: f32| Vec3::new(theta.sin(), slope, theta.cos()).normalize();

    let mut m = MeshData::default();
    for j in 0..height_segments {
        let t0 = j as f32 / height_segments as f32;
        let t1 = (j + 1) as f32 / height_segments as f32;
        for i in 0..radial_segments {
            let th0 = i as f32 / radial_segments as f32 * TAU;
            let th1 = (i + 1) as f32 / radial_segments as f32 * TAU;
            let corners = [ring(th0, t0), ring(th1, t0), ring(th1, t1), ring(th0, t1)];
            if flat {
                let normal = (corners[2] - corners[0])
                    .cross(corners[3] - corners[1])
                    .normalize_or_zero();
                m.push_quad(corners, normal);
            } else {
                let base = m.vertices.len() as u32;
                let normals = [smooth(th0), smooth(th1), smooth(th1), smooth(th0)];
                for (c, n) in corners.iter().zip(normals) {
                    m.vertices.push(Vertex::new(*c, n));
                }
                m.indices
                    .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
            }
        }
    }

    for (radius, y, normal) in [(radius_top, half, Vec3::Y), (radius_bottom, -half, Vec3::NEG_Y)] {
        if radius <= 0.0 {
            continue;
        }
        let center = m.vertices.len() as u32;
        m.vertices.push(Vertex::new(Vec3::new(0.0, y, 0.0), normal));
        for i in 0..=radial_segments {
            let theta = i as f32 / radial_segments as f32 * TAU;
            m.vertices.push(Vertex::new(
                Vec3::new(radius * theta.sin(), y, radius * theta.cos()),
                normal,
            ));
        }
        for i in 0..radial_segments {
            let (a, b) = (center + 1 + i, center + 2 + i);
            if normal.y > 0.0 {
                m.indices.extend_from_slice(&[center, a, b]);
            } else {
                m.indices.extend_from_slice(&[center, b, a]);
            }
        }
    }
    m
}
