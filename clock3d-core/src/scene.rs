/// Scene graph: an ownership tree of transformable nodes
///
/// Nodes live in a `thunderdome` arena and are addressed by generational
/// [`NodeId`] handles. Every node exclusively owns the children listed in it;
/// removing a node releases its whole subtree. Parent transforms are composed
/// at traversal time, so a node only stores its parent-relative placement.
use nalgebra::{Matrix4, Vector3};
use thunderdome::{Arena, Index};

use crate::catalog::Rgb;
use crate::error::ClockError;
use crate::geometry::Mesh;
use crate::transform::{RotationState, Transform};

/// Handle to a node in a [`SceneGraph`].
///
/// A handle to a released node never resolves again, even after its slot is
/// reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

/// What a node draws.
#[derive(Debug, Clone)]
pub enum NodeContent {
    /// Transform-only grouping node
    Group,
    /// Solid mesh filled with a single colour
    Mesh { mesh: Mesh, color: Rgb },
    /// Text label; `geometry` is already centred on its own bounds
    Label {
        text: String,
        geometry: Mesh,
        color: Rgb,
    },
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub content: NodeContent,
    pub position: Vector3<f32>,
    pub rotation: RotationState,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, content: NodeContent) -> Self {
        Self {
            name: name.into(),
            content,
            position: Vector3::zeros(),
            rotation: RotationState::zero(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeContent::Group)
    }

    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: RotationState) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn local_matrix(&self) -> Matrix4<f32> {
        Transform::local_matrix(&self.position, &self.rotation)
    }
}

/// Arena-backed scene tree.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: Arena<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
        }
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a parentless node
    pub fn insert(&mut self, mut node: SceneNode) -> NodeId {
        node.parent = None;
        node.children.clear();
        NodeId(self.nodes.insert(node))
    }

    /// Insert `node` as the last child of `parent`
    pub fn add_child(&mut self, parent: NodeId, node: SceneNode) -> Result<NodeId, ClockError> {
        if !self.contains(parent) {
            return Err(ClockError::NodeNotFound(parent));
        }
        let id = self.insert(node);
        if let Some(child) = self.get_mut(id) {
            child.parent = Some(parent);
        }
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.push(id);
        }
        Ok(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id.0)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    /// Children of `id`, empty when the node does not exist
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(SceneNode::children).unwrap_or_default()
    }

    /// Remove `id` and release its subtree. Returns the number of nodes released.
    pub fn remove(&mut self, id: NodeId) -> Result<usize, ClockError> {
        let parent = self
            .get(id)
            .ok_or(ClockError::NodeNotFound(id))?
            .parent;
        if let Some(parent_node) = parent.and_then(|p| self.get_mut(p)) {
            parent_node.children.retain(|&child| child != id);
        }
        Ok(self.release(id))
    }

    /// Detach and release every child subtree of `id`, keeping `id` itself.
    pub fn detach_children(&mut self, id: NodeId) -> Result<usize, ClockError> {
        let children = std::mem::take(
            &mut self
                .get_mut(id)
                .ok_or(ClockError::NodeNotFound(id))?
                .children,
        );
        Ok(children.into_iter().map(|child| self.release(child)).sum())
    }

    fn release(&mut self, id: NodeId) -> usize {
        let mut released = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current.0) {
                released += 1;
                stack.extend(node.children);
            }
        }
        released
    }

    /// Compose the parent chain of `id` into a world matrix
    pub fn world_matrix(&self, id: NodeId) -> Option<Matrix4<f32>> {
        let mut node = self.get(id)?;
        let mut matrix = node.local_matrix();
        while let Some(parent) = node.parent {
            node = self.get(parent)?;
            matrix = node.local_matrix() * matrix;
        }
        Some(matrix)
    }

    /// Visit `root` and its descendants depth-first, handing each node its
    /// composed world matrix.
    pub fn traverse<F>(&self, root: NodeId, mut visit: F)
    where
        F: FnMut(NodeId, &SceneNode, &Matrix4<f32>),
    {
        let Some(parent_matrix) = self
            .get(root)
            .map(|node| match node.parent {
                Some(parent) => self.world_matrix(parent).unwrap_or_else(Matrix4::identity),
                None => Matrix4::identity(),
            })
        else {
            return;
        };

        let mut stack = vec![(root, parent_matrix)];
        while let Some((id, parent_matrix)) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            let world = parent_matrix * node.local_matrix();
            visit(id, node, &world);
            stack.extend(node.children.iter().rev().map(|&child| (child, world)));
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
