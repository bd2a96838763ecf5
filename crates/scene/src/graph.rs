use glam::Mat4;
use serde::{Deserialize, Serialize};
use skyflight_common::{Color, Transform};

use crate::geometry::Mesh;
use crate::light::Light;

/// Errors from scene graph construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("node {0:?} not found")]
    UnknownNode(NodeId),
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Handle to a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Transform-only container.
    Group,
    Mesh(Mesh),
    Light(Light),
}

/// A node: optional name, local transform, payload, and links.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: Option<String>,
    pub transform: Transform,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            transform: Transform::default(),
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    pub fn mesh(mesh: Mesh) -> Self {
        Self::new(NodeKind::Mesh(mesh))
    }

    pub fn light(light: Light) -> Self {
        Self::new(NodeKind::Light(light))
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(m) => Some(m),
            _ => None,
        }
    }
}

/// Linear distance fog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

/// One entry of a depth-first walk.
#[derive(Debug, Clone, Copy)]
pub struct WalkItem {
    pub id: NodeId,
    pub depth: usize,
    /// Product of all ancestor transforms and this node's own.
    pub world: Mat4,
}

/// Arena-backed scene graph with a group at the root.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    pub fog: Option<Fog>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::group().named("root")],
            fog: None,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Attach `node` under `parent`.
    pub fn add(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId, SceneError> {
        if parent.0 >= self.nodes.len() {
            return Err(SceneError::UnknownNode(parent));
        }
        if let NodeKind::Mesh(mesh) = &node.kind {
            mesh.geometry.validate()?;
        }
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.nodes.get_mut(id.0).map(|n| &mut n.transform)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map(|n| n.children()).unwrap_or(&[])
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name.as_deref() == Some(name))
            .map(NodeId)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Mesh(_)))
            .count()
    }

    /// World matrix of a node, composed from the root down.
    pub fn world_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        let mut node = self.get(id).ok_or(SceneError::UnknownNode(id))?;
        let mut m = node.transform.matrix();
        while let Some(parent) = node.parent {
            node = &self.nodes[parent.0];
            m = node.transform.matrix() * m;
        }
        Ok(m)
    }

    /// Depth-first, pre-order walk from the root with world matrices.
    ///
    /// Children are visited in insertion order.
    pub fn walk(&self) -> Vec<WalkItem> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let root = self.root();
        let mut stack = vec![(root, 0usize, Mat4::IDENTITY)];
        while let Some((id, depth, parent_world)) = stack.pop() {
            let node = &self.nodes[id.0];
            let world = parent_world * node.transform.matrix();
            out.push(WalkItem { id, depth, world });
            for child in node.children.iter().rev() {
                stack.push((*child, depth + 1, world));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Geometry, Material};
    use glam::Vec3;
    use skyflight_common::Palette;

    fn cube(size: f32) -> Mesh {
        Mesh::new(
            Geometry::cuboid(size, size, size),
            Material::flat(Palette::WHITE),
        )
    }

    #[test]
    fn new_graph_has_only_root() {
        let g = SceneGraph::new();
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.mesh_count(), 0);
        assert!(g.get(g.root()).unwrap().parent().is_none());
    }

    #[test]
    fn add_links_parent_and_child() {
        let mut g = SceneGraph::new();
        let group = g.add(g.root(), Node::group().named("group")).unwrap();
        let leaf = g.add(group, Node::mesh(cube(1.0))).unwrap();
        assert_eq!(g.children(group), &[leaf]);
        assert_eq!(g.get(leaf).unwrap().parent(), Some(group));
        assert_eq!(g.find_by_name("group"), Some(group));
        assert_eq!(g.mesh_count(), 1);
    }

    #[test]
    fn add_under_unknown_parent_fails() {
        let mut g = SceneGraph::new();
        let err = g.add(NodeId(42), Node::group()).unwrap_err();
        assert_eq!(err, SceneError::UnknownNode(NodeId(42)));
    }

    #[test]
    fn invalid_geometry_is_rejected() {
        let mut g = SceneGraph::new();
        let root = g.root();
        assert!(matches!(
            g.add(root, Node::mesh(cube(0.0))),
            Err(SceneError::InvalidGeometry(_))
        ));
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn world_matrix_composes_ancestors() {
        let mut g = SceneGraph::new();
        let parent = g
            .add(
                g.root(),
                Node::group().with_transform(
                    Transform::from_position(Vec3::new(0.0, 100.0, 0.0)).with_uniform_scale(0.5),
                ),
            )
            .unwrap();
        let child = g
            .add(
                parent,
                Node::mesh(cube(1.0))
                    .with_transform(Transform::from_position(Vec3::new(40.0, 0.0, 0.0))),
            )
            .unwrap();
        let p = g.world_matrix(child).unwrap().transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(20.0, 100.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn walk_is_preorder_and_matches_world_matrix() {
        let mut g = SceneGraph::new();
        let a = g
            .add(
                g.root(),
                Node::group().with_transform(Transform::from_position(Vec3::X)),
            )
            .unwrap();
        let a1 = g.add(a, Node::mesh(cube(1.0))).unwrap();
        let b = g.add(g.root(), Node::group()).unwrap();
        let order: Vec<NodeId> = g.walk().iter().map(|w| w.id).collect();
        assert_eq!(order, vec![g.root(), a, a1, b]);

        for item in g.walk() {
            assert_eq!(item.world, g.world_matrix(item.id).unwrap());
        }
        assert_eq!(g.walk()[2].depth, 2);
    }
}
