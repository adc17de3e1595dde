//! Scene Nodes
//!
//! The minimal node handle the registry indexes: stages, layers, groups and
//! shapes arranged in a tree. Drawing and event dispatch live elsewhere; this
//! module only keeps the registry in step with the tree.
//!
//! - Creating a node registers its id and name. Stages also join the stage
//!   list, shapes get a hit-detection colour key.
//! - [`Node::set_id`] and [`Node::set_name`] move the registry entries.
//! - [`Node::remove`] detaches a subtree but leaves it registered, so it can
//!   be re-added. [`Node::destroy`] unregisters the whole subtree.

mod node;

use std::cell::RefCell;
use std::rc::Rc;

use crate::registry::GlobalRegistry;

pub use node::{Node, NodeConfig, NodeKind};

/// The registry shared by a toolkit and its nodes.
pub type SharedRegistry = Rc<RefCell<GlobalRegistry<Node>>>;
