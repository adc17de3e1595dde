use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::SharedRegistry;
use crate::canvas::Canvas;
use crate::errors::{KineticError, Result};
use crate::registry::{ColorKey, GlobalRegistry, NodeId, Registrable};
use crate::toolkit::Toolkit;

/// What a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Top-level node bound to one surface.
    Stage,
    /// Child of a stage with its own surface.
    Layer,
    /// Container for shapes and other groups.
    Group,
    /// Drawable leaf.
    Shape,
}

impl NodeKind {
    #[must_use]
    pub fn is_container(self) -> bool {
        !matches!(self, Self::Shape)
    }

    /// Stages and layers own a surface.
    #[must_use]
    pub fn has_canvas(self) -> bool {
        matches!(self, Self::Stage | Self::Layer)
    }
}

/// Construction attributes of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeConfig {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl NodeConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

struct NodeInner {
    node_id: NodeId,
    kind: NodeKind,
    id: RefCell<Option<String>>,
    name: RefCell<Option<String>>,
    parent: RefCell<Weak<NodeInner>>,
    children: RefCell<Vec<Node>>,
    canvas: RefCell<Option<Canvas>>,
    color_key: Cell<Option<ColorKey>>,
    registry: Weak<RefCell<GlobalRegistry<Node>>>,
}

/// Shared handle to a scene node.
///
/// Cloning yields another handle to the same node. Parents hold their
/// children; a child only keeps a weak link back to its parent.
#[derive(Clone)]
pub struct Node(Rc<NodeInner>);

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("node_id", &self.0.node_id)
            .field("kind", &self.0.kind)
            .field("id", &self.0.id.borrow())
            .field("name", &self.0.name.borrow())
            .field("children", &self.0.children.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Registrable for Node {
    fn node_id(&self) -> NodeId {
        self.0.node_id
    }
}

impl Node {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Creates a stage, registers it in the stage list and gives it a surface.
    pub fn stage(toolkit: &Toolkit, config: NodeConfig) -> Result<Self> {
        let canvas = toolkit.create_canvas()?;
        Ok(Self::build(toolkit, NodeKind::Stage, config, Some(canvas)))
    }

    /// Creates a layer with its own surface.
    pub fn layer(toolkit: &Toolkit, config: NodeConfig) -> Result<Self> {
        let canvas = toolkit.create_canvas()?;
        Ok(Self::build(toolkit, NodeKind::Layer, config, Some(canvas)))
    }

    #[must_use]
    pub fn group(toolkit: &Toolkit, config: NodeConfig) -> Self {
        Self::build(toolkit, NodeKind::Group, config, None)
    }

    /// Creates a shape and assigns it a hit-detection colour key.
    #[must_use]
    pub fn shape(toolkit: &Toolkit, config: NodeConfig) -> Self {
        Self::build(toolkit, NodeKind::Shape, config, None)
    }

    fn build(
        toolkit: &Toolkit,
        kind: NodeKind,
        config: NodeConfig,
        canvas: Option<Canvas>,
    ) -> Self {
        let shared = toolkit.registry();
        let mut registry = shared.borrow_mut();

        let node = Self(Rc::new(NodeInner {
            node_id: registry.next_node_id(),
            kind,
            id: RefCell::new(config.id),
            name: RefCell::new(config.name),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            canvas: RefCell::new(canvas),
            color_key: Cell::new(None),
            registry: Rc::downgrade(shared),
        }));

        registry.add_id(&node, node.0.id.borrow().as_deref());
        registry.add_name(&node, node.0.name.borrow().as_deref());
        match kind {
            NodeKind::Stage => registry.add_stage(&node),
            NodeKind::Shape => node
                .0
                .color_key
                .set(Some(registry.allocate_color_key(&node))),
            NodeKind::Layer | NodeKind::Group => {}
        }

        node
    }

    fn registry(&self) -> Option<SharedRegistry> {
        self.0.registry.upgrade()
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    #[must_use]
    pub fn node_id(&self) -> NodeId {
        self.0.node_id
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.0.kind
    }

    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.0.id.borrow().clone()
    }

    /// Changes the user id, moving the registry entry along.
    pub fn set_id(&self, id: Option<&str>) {
        let old = self.0.id.replace(id.map(str::to_owned));
        if let Some(registry) = self.registry() {
            let mut registry = registry.borrow_mut();
            registry.remove_id(old.as_deref());
            registry.add_id(self, id);
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.0.name.borrow().clone()
    }

    /// Changes the name, moving the registry entry along.
    pub fn set_name(&self, name: Option<&str>) {
        let old = self.0.name.replace(name.map(str::to_owned));
        if let Some(registry) = self.registry() {
            let mut registry = registry.borrow_mut();
            registry.remove_name(old.as_deref(), self.0.node_id);
            registry.add_name(self, name);
        }
    }

    /// The hit-detection colour of a shape.
    #[must_use]
    pub fn color_key(&self) -> Option<ColorKey> {
        self.0.color_key.get()
    }

    /// Runs `f` on the node's surface, if it has one.
    pub fn with_canvas<R>(&self, f: impl FnOnce(&mut Canvas) -> R) -> Option<R> {
        self.0.canvas.borrow_mut().as_mut().map(f)
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.parent.borrow().upgrade().map(Self)
    }

    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        self.0.children.borrow().clone()
    }

    /// Returns `true` if `other` sits somewhere below this node.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        let mut current = other.parent();
        while let Some(node) = current {
            if node == *self {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Attaches `child`, detaching it from its previous parent first.
    ///
    /// # Errors
    ///
    /// [`KineticError::InvalidHierarchy`] if this node cannot hold `child`:
    /// shapes hold nothing, stages hold only layers, layers live only in
    /// stages, and a node cannot be added below itself.
    pub fn add(&self, child: &Self) -> Result<()> {
        let parent_kind = self.kind();
        let child_kind = child.kind();

        let allowed = match (parent_kind, child_kind) {
            (NodeKind::Shape, _) | (_, NodeKind::Stage) => false,
            (NodeKind::Stage, kind) => kind == NodeKind::Layer,
            (_, NodeKind::Layer) => false,
            _ => true,
        };
        if !allowed {
            return Err(KineticError::InvalidHierarchy(format!(
                "{child_kind:?} cannot be added to {parent_kind:?}"
            )));
        }
        if child == self || child.is_ancestor_of(self) {
            return Err(KineticError::InvalidHierarchy(format!(
                "node {} cannot be added below itself",
                child.node_id()
            )));
        }

        child.remove();
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        self.0.children.borrow_mut().push(child.clone());
        Ok(())
    }

    /// Detaches the node from its parent. It stays registered and can be
    /// added elsewhere.
    pub fn remove(&self) {
        if let Some(parent) = self.parent() {
            parent.0.children.borrow_mut().retain(|c| c != self);
        }
        *self.0.parent.borrow_mut() = Weak::new();
    }

    /// Detaches the node and unregisters it and all its descendants.
    pub fn destroy(&self) {
        for child in self.children() {
            child.destroy();
        }
        self.remove();

        let Some(registry) = self.registry() else {
            return;
        };
        let mut registry = registry.borrow_mut();
        registry.remove_id(self.0.id.borrow().as_deref());
        registry.remove_name(self.0.name.borrow().as_deref(), self.0.node_id);
        if let Some(key) = self.0.color_key.take() {
            registry.remove_shape(key);
        }
        if self.0.kind == NodeKind::Stage {
            registry.remove_stage(self.0.node_id);
        }
    }

    /// Looks up `#id` or `.name` among this node's descendants.
    #[must_use]
    pub fn get(&self, selector: &str) -> Vec<Self> {
        let Some(registry) = self.registry() else {
            return Vec::new();
        };
        let found = registry.borrow().find(selector);
        found
            .into_iter()
            .filter(|node| self.is_ancestor_of(node))
            .collect()
    }
}
