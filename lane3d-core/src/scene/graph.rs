/// Arena-backed scene graph
///
/// Nodes live in a [`SlotMap`] and refer to each other by [`NodeId`]. The
/// tweener writes transforms through the same arena the renderer later reads,
/// so a frame always mutates first and draws second.

use log::debug;
use slotmap::{new_key_type, SlotMap};

use crate::error::SceneError;
use crate::matrix::Matrix;
use crate::projection::{Camera, Light};
use crate::transform::Transform;

use super::render::{DrawCall, FrameState, Renderer};
use super::shape::{Shape, ShapeBuilder};

new_key_type! {
    /// Stable handle to a node of a [`SceneGraph`]
    pub struct NodeId;
}

/// A node built and validated but not yet inserted
struct PendingNode {
    shape: Shape,
    children: Vec<PendingNode>,
}

impl PendingNode {
    fn build(builder: ShapeBuilder) -> Result<Self, SceneError> {
        let (shape, children) = builder.build()?;
        let children = children
            .into_iter()
            .map(PendingNode::build)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { shape, children })
    }
}

/// Tree of [`Shape`]s under a single root
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Shape>,
    root: NodeId,
}

impl SceneGraph {
    /// A graph whose root is an empty group node
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Shape::group("root"));
        Self { nodes, root }
    }

    /// A graph whose root (and its subtree) comes from `builder`
    pub fn from_root(builder: ShapeBuilder) -> Result<Self, SceneError> {
        let pending = PendingNode::build(builder)?;
        let mut nodes = SlotMap::with_key();
        let root = Self::attach(&mut nodes, None, pending);
        debug!("scene graph created with {} nodes", nodes.len());
        Ok(Self { nodes, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Shape> {
        self.nodes.get(id)
    }

    /// First node with the given name, in insertion order
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, shape)| shape.name() == Some(name))
            .map(|(id, _)| id)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], SceneError> {
        Ok(self.shape(id)?.children())
    }

    /// Build `builder` with its whole subtree and attach it under `parent`.
    ///
    /// Nothing is inserted unless every node of the subtree validates.
    pub fn insert(&mut self, parent: NodeId, builder: ShapeBuilder) -> Result<NodeId, SceneError> {
        self.shape(parent)?;
        let pending = PendingNode::build(builder)?;
        let id = Self::attach(&mut self.nodes, Some(parent), pending);
        debug!("inserted subtree {id:?} under {parent:?}");
        Ok(id)
    }

    /// Deep-copy the subtree at `source` under `parent`; the copy shares nothing
    /// with the source, so animating one leaves the other alone.
    pub fn duplicate(&mut self, source: NodeId, parent: NodeId) -> Result<NodeId, SceneError> {
        self.shape(parent)?;
        let pending = self.snapshot(source)?;
        Ok(Self::attach(&mut self.nodes, Some(parent), pending))
    }

    pub fn transform(&self, id: NodeId) -> Result<&Transform, SceneError> {
        Ok(self.shape(id)?.transform())
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Result<&mut Transform, SceneError> {
        self.nodes
            .get_mut(id)
            .map(|shape| &mut shape.transform)
            .ok_or(SceneError::UnknownNode(id))
    }

    /// Replace a node's translate, rotate and scale in one step
    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> Result<(), SceneError> {
        *self.transform_mut(id)? = transform;
        Ok(())
    }

    /// Cumulative model matrix of a node: `parent x T x R x S` up to the root
    pub fn world_matrix(&self, id: NodeId) -> Result<Matrix, SceneError> {
        let mut matrix = Matrix::identity(4);
        let mut current = Some(id);
        while let Some(node) = current {
            let shape = self.shape(node)?;
            matrix = shape.transform().local_matrix()?.multiply(&matrix)?;
            current = shape.parent();
        }
        Ok(matrix)
    }

    /// Draw `node` and its subtree under `parent_transform`.
    ///
    /// Non-empty nodes produce one [`DrawCall`]; every node, empty or not,
    /// passes its composed model matrix down to its children.
    pub fn draw<R>(
        &self,
        node: NodeId,
        parent_transform: &Matrix,
        renderer: &mut R,
    ) -> Result<(), SceneError>
    where
        R: Renderer + ?Sized,
    {
        let shape = self.shape(node)?;
        let model = parent_transform.multiply(&shape.transform().local_matrix()?)?;

        if !shape.nothing_to_draw() {
            let arrays = shape.arrays();
            renderer.draw(&DrawCall {
                node,
                mode: shape.mode(),
                positions: &arrays.positions,
                normals: &arrays.normals,
                colors: &arrays.colors,
                specular_colors: &arrays.specular_colors,
                tex_coords: &arrays.tex_coords,
                shininess: shape.shininess(),
                model: &model,
            })?;
        }

        for &child in shape.children() {
            self.draw(child, &model, renderer)?;
        }
        Ok(())
    }

    /// Draw the whole tree for one frame seen through `camera`, lit by `light`
    pub fn render<R>(&self, renderer: &mut R, camera: &Camera, light: &Light) -> Result<(), SceneError>
    where
        R: Renderer + ?Sized,
    {
        let frame = FrameState {
            view: camera.view_matrix()?,
            projection: camera.projection_matrix(),
            light,
        };
        renderer.begin_frame(&frame)?;
        self.draw(self.root, &Matrix::identity(4), renderer)?;
        renderer.end_frame()
    }

    fn shape(&self, id: NodeId) -> Result<&Shape, SceneError> {
        self.nodes.get(id).ok_or(SceneError::UnknownNode(id))
    }

    fn snapshot(&self, id: NodeId) -> Result<PendingNode, SceneError> {
        let shape = self.shape(id)?;
        let children = shape
            .children()
            .iter()
            .map(|&child| self.snapshot(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PendingNode {
            shape: shape.clone(),
            children,
        })
    }

    fn attach(
        nodes: &mut SlotMap<NodeId, Shape>,
        parent: Option<NodeId>,
        pending: PendingNode,
    ) -> NodeId {
        let PendingNode {
            mut shape,
            children,
        } = pending;
        shape.parent = parent;
        shape.children.clear();

        let id = nodes.insert(shape);
        if let Some(parent) = parent.and_then(|p| nodes.get_mut(p)) {
            parent.children.push(id);
        }
        for child in children {
            Self::attach(nodes, Some(id), child);
        }
        id
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
