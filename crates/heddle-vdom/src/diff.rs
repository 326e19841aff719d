//! Diff engine
//!
//! Compares an old virtual tree against a new one and yields an
//! ordered edit script. The script is deterministic: attribute changes
//! come before child reconciliation, children are visited left to
//! right, and child lists are matched strictly by position - index i
//! of the old list against index i of the new list, insertions for an
//! appended tail, removals for a truncated tail.

use crate::vnode::VNodeId;
use crate::{EngineError, Reconciler};

/// One edit operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// Swap the whole subtree rooted at `old` for `new`; emitted when
    /// the two nodes differ in kind or tag name
    Replace { old: VNodeId, new: VNodeId },
    /// Update a text node's value in place
    SetText { node: VNodeId, value: Box<str> },
    /// Add or update an attribute
    SetAttribute {
        node: VNodeId,
        name: Box<str>,
        value: Box<str>,
    },
    /// Remove an attribute
    RemoveAttribute { node: VNodeId, name: Box<str> },
    /// Insert a new child subtree at `index` under `parent`
    InsertChild {
        parent: VNodeId,
        index: usize,
        child: VNodeId,
    },
    /// Remove the child at `index` under `parent`
    RemoveChild {
        parent: VNodeId,
        index: usize,
        child: VNodeId,
    },
}

/// Ordered sequence of edit operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditScript {
    ops: Vec<EditOp>,
}

impl EditScript {
    /// Operations in application order
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    fn push(&mut self, op: EditOp) {
        self.ops.push(op);
    }
}

impl Reconciler {
    /// Compare two virtual trees into an edit script sufficient to
    /// transform a live tree matching `old` into one matching `new`.
    ///
    /// Structurally identical trees produce an empty script.
    pub fn diff(&self, old: VNodeId, new: VNodeId) -> Result<EditScript, EngineError> {
        let mut script = EditScript::default();
        self.diff_node(old, new, &mut script)?;
        tracing::debug!("diff produced {} op(s)", script.len());
        Ok(script)
    }

    fn diff_node(
        &self,
        old: VNodeId,
        new: VNodeId,
        script: &mut EditScript,
    ) -> Result<(), EngineError> {
        let old_node = self.pool.resolve(old)?;
        let new_node = self.pool.resolve(new)?;

        if old_node.is_text() != new_node.is_text() || old_node.node_name != new_node.node_name {
            script.push(EditOp::Replace { old, new });
            return Ok(());
        }

        if old_node.is_text() {
            if old_node.node_value != new_node.node_value {
                script.push(EditOp::SetText {
                    node: old,
                    value: new_node.node_value.as_deref().unwrap_or("").into(),
                });
            }
            return Ok(());
        }

        // Attributes first: name-keyed, order-independent. Additions
        // and updates in new-tree order, then removals in old-tree
        // order.
        for attr in &new_node.attributes {
            match old_node.attr(&attr.name) {
                Some(value) if value == attr.value => {}
                _ => script.push(EditOp::SetAttribute {
                    node: old,
                    name: attr.name.as_str().into(),
                    value: attr.value.as_str().into(),
                }),
            }
        }
        for attr in &old_node.attributes {
            if new_node.attr(&attr.name).is_none() {
                script.push(EditOp::RemoveAttribute {
                    node: old,
                    name: attr.name.as_str().into(),
                });
            }
        }

        // Children: strictly positional. Tail removals are emitted in
        // descending index order so earlier removals never shift the
        // coordinates of later ones.
        let shared = old_node.children.len().min(new_node.children.len());
        for i in 0..shared {
            self.diff_node(old_node.children[i], new_node.children[i], script)?;
        }
        for (i, &child) in new_node.children.iter().enumerate().skip(shared) {
            script.push(EditOp::InsertChild {
                parent: old,
                index: i,
                child,
            });
        }
        for (i, &child) in old_node.children.iter().enumerate().skip(shared).rev() {
            script.push(EditOp::RemoveChild {
                parent: old,
                index: i,
                child,
            });
        }

        Ok(())
    }
}
