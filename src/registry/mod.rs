//! Node Registry
//!
//! [`GlobalRegistry`] indexes the nodes of one scene graph:
//!
//! - `ids`: user identifier → node. One entry per identifier; registering a
//!   second node under a used identifier replaces the first.
//! - `names`: name → nodes, in insertion order. A name key exists only while
//!   its sequence is non-empty.
//! - `stages`: the top-level stages, in creation order.
//! - `shapes`: hit-detection colour key → shape.
//!
//! The registry also hands out [`NodeId`]s (the node's own stored identifier)
//! and answers drag-state queries by delegating to an optional
//! [`DragAndDrop`] capability resolved at construction.
//!
//! Every operation is total. `None` ids and names are legitimate "absent"
//! inputs and turn the call into a no-op; removing something that is not
//! registered is a no-op too.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut registry = GlobalRegistry::new(None);
//! registry.add_id(&node, Some("player"));
//! registry.add_name(&node, Some("sprite"));
//!
//! assert!(registry.get_by_id("player").is_some());
//! assert_eq!(registry.find(".sprite").len(), 1);
//! ```

mod color_key;

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use rustc_hash::FxHashMap;

use crate::drag::DragAndDrop;

pub use color_key::ColorKey;

/// The identifier a node stores for itself.
///
/// Allocated from the registry's monotonically increasing counter, unlike the
/// optional user-facing `id` string which callers choose freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node handle the registry can index.
///
/// Handles are cloned into the registry, so they should be cheap references
/// (an `Rc`, an index) rather than the node data itself.
pub trait Registrable: Clone {
    /// The node's own stored identifier.
    fn node_id(&self) -> NodeId;
}

/// Process-wide pointer-event flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFlags {
    /// A click/tap sequence is being tracked.
    pub listen_click_tap: bool,
    /// The last click happened less than the double-click window ago.
    pub in_dbl_click_window: bool,
}

/// Index of nodes by identifier and by name for one scene graph.
pub struct GlobalRegistry<N> {
    stages: Vec<N>,
    id_counter: u64,
    ids: FxHashMap<String, N>,
    names: FxHashMap<String, Vec<N>>,
    shapes: FxHashMap<ColorKey, N>,
    color_counter: u32,
    drag_and_drop: Option<Rc<dyn DragAndDrop>>,

    pub events: EventFlags,
    dbl_click_window: Duration,
}

impl<N> fmt::Debug for GlobalRegistry<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalRegistry")
            .field("stages", &self.stages.len())
            .field("id_counter", &self.id_counter)
            .field("ids", &self.ids.len())
            .field("names", &self.names.len())
            .field("shapes", &self.shapes.len())
            .field("drag_and_drop", &self.drag_and_drop.is_some())
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl<N: Registrable> Default for GlobalRegistry<N> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<N: Registrable> GlobalRegistry<N> {
    /// Creates an empty registry.
    ///
    /// `drag_and_drop` is the capability queried by [`is_dragging`](Self::is_dragging)
    /// and [`is_drag_ready`](Self::is_drag_ready); pass `None` when the build
    /// has no drag-and-drop support.
    #[must_use]
    pub fn new(drag_and_drop: Option<Rc<dyn DragAndDrop>>) -> Self {
        Self {
            stages: Vec::new(),
            id_counter: 0,
            ids: FxHashMap::default(),
            names: FxHashMap::default(),
            shapes: FxHashMap::default(),
            color_counter: 0,
            drag_and_drop,
            events: EventFlags::default(),
            dbl_click_window: Duration::from_millis(400),
        }
    }

    /// Sets the double-click window.
    #[must_use]
    pub fn with_dbl_click_window(mut self, window: Duration) -> Self {
        self.dbl_click_window = window;
        self
    }

    #[must_use]
    pub fn dbl_click_window(&self) -> Duration {
        self.dbl_click_window
    }

    /// Allocates the next node identifier.
    pub fn next_node_id(&mut self) -> NodeId {
        let id = NodeId(self.id_counter);
        self.id_counter += 1;
        id
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    /// Registers `node` under `id`, replacing any previous occupant.
    pub fn add_id(&mut self, node: &N, id: Option<&str>) {
        let Some(id) = id else { return };
        if let Some(previous) = self.ids.insert(id.to_owned(), node.clone())
            && previous.node_id() != node.node_id()
        {
            log::debug!(
                "id {id:?} moved from node {} to node {}",
                previous.node_id(),
                node.node_id()
            );
        }
    }

    /// Drops the entry for `id`, if any.
    pub fn remove_id(&mut self, id: Option<&str>) {
        if let Some(id) = id {
            self.ids.remove(id);
        }
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&N> {
        self.ids.get(id)
    }

    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Number of registered identifiers.
    #[must_use]
    pub fn id_count(&self) -> usize {
        self.ids.len()
    }

    // ========================================================================
    // Names
    // ========================================================================

    /// Appends `node` to the sequence for `name`, creating it if needed.
    pub fn add_name(&mut self, node: &N, name: Option<&str>) {
        let Some(name) = name else { return };
        self.names
            .entry(name.to_owned())
            .or_default()
            .push(node.clone());
    }

    /// Removes every node stored under `name` whose identifier is `node_id`.
    ///
    /// All matches go in one call, including adjacent ones. The `name` key is
    /// dropped once its sequence is empty.
    pub fn remove_name(&mut self, name: Option<&str>, node_id: NodeId) {
        let Some(name) = name else { return };
        let Some(nodes) = self.names.get_mut(name) else {
            return;
        };
        nodes.retain(|node| node.node_id() != node_id);
        if nodes.is_empty() {
            self.names.remove(name);
        }
    }

    /// The nodes stored under `name`, in insertion order.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> &[N] {
        self.names.get(name).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Number of distinct registered names.
    #[must_use]
    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    /// Resolves a `#id` or `.name` selector.
    ///
    /// Any other selector matches nothing.
    #[must_use]
    pub fn find(&self, selector: &str) -> Vec<N> {
        if let Some(id) = selector.strip_prefix('#') {
            self.get_by_id(id).cloned().into_iter().collect()
        } else if let Some(name) = selector.strip_prefix('.') {
            self.get_by_name(name).to_vec()
        } else {
            log::warn!("unsupported selector {selector:?}; expected '#id' or '.name'");
            Vec::new()
        }
    }

    // ========================================================================
    // Stages
    // ========================================================================

    pub fn add_stage(&mut self, stage: &N) {
        self.stages.push(stage.clone());
    }

    /// Removes the stage with `node_id`, if present.
    pub fn remove_stage(&mut self, node_id: NodeId) {
        self.stages.retain(|stage| stage.node_id() != node_id);
    }

    #[must_use]
    pub fn stages(&self) -> &[N] {
        &self.stages
    }

    // ========================================================================
    // Hit-detection colours
    // ========================================================================

    /// Assigns `shape` a colour key no other shape currently uses.
    pub fn allocate_color_key(&mut self, shape: &N) -> ColorKey {
        loop {
            let key = ColorKey::for_index(self.color_counter);
            self.color_counter = self.color_counter.wrapping_add(1);
            if !self.shapes.contains_key(&key) {
                self.shapes.insert(key, shape.clone());
                return key;
            }
            // Every colour is taken; nothing can be handed out without aliasing.
            if self.shapes.len() >= ColorKey::MAX as usize {
                log::error!("hit colour space exhausted; reusing {key}");
                self.shapes.insert(key, shape.clone());
                return key;
            }
        }
    }

    #[must_use]
    pub fn shape(&self, key: ColorKey) -> Option<&N> {
        self.shapes.get(&key)
    }

    pub fn remove_shape(&mut self, key: ColorKey) {
        self.shapes.remove(&key);
    }

    // ========================================================================
    // Drag state
    // ========================================================================

    /// Returns whether a drag operation is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag_and_drop
            .as_ref()
            .is_some_and(|dd| dd.is_dragging())
    }

    /// Returns whether a drag is armed, though it may not have started yet.
    #[must_use]
    pub fn is_drag_ready(&self) -> bool {
        self.drag_and_drop.as_ref().is_some_and(|dd| dd.has_node())
    }
}
