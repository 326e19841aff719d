//! Heddle DOM - live document tree
//!
//! Arena-backed document tree the reconciliation engine captures from
//! and patches back onto. Also hosts the custom element registry that
//! the patch applier consults for lifecycle hooks.

mod custom;
mod node;
mod tree;

pub use custom::{ElementDefinition, ElementRegistry, LifecycleHook, RegistryError};
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use tree::{DomError, DomResult, LiveTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);
