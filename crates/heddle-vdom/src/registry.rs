//! Virtual-to-live back-reference table
//!
//! Maps each virtual node's identity token to the live node it was
//! captured from (or re-associated with during patching), so the patch
//! applier never has to re-walk the live tree. Keyed by handle, never
//! by an embedded live reference, which keeps pooled records inert.

use std::collections::HashMap;

use heddle_dom::NodeId;

use crate::vnode::VNodeId;

/// Back-reference table from virtual identity to live node
#[derive(Debug, Default)]
pub struct NodeRegistry {
    entries: HashMap<VNodeId, NodeId>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a virtual node with a live node, replacing any
    /// previous association.
    pub(crate) fn bind(&mut self, vnode: VNodeId, live: NodeId) {
        self.entries.insert(vnode, live);
    }

    /// Remove the association for a virtual node.
    pub(crate) fn unbind(&mut self, vnode: VNodeId) -> Option<NodeId> {
        self.entries.remove(&vnode)
    }

    /// The live node a virtual node was captured from
    pub fn lookup(&self, vnode: VNodeId) -> Option<NodeId> {
        self.entries.get(&vnode).copied()
    }

    /// Check if a virtual node has a live association
    pub fn contains(&self, vnode: VNodeId) -> bool {
        self.entries.contains_key(&vnode)
    }

    /// Number of associations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
