//! Heddle VDOM - virtual-DOM reconciliation engine
//!
//! Mirrors a live [`heddle_dom::LiveTree`] subtree into pooled virtual
//! nodes, diffs successive captures into an edit script, and replays
//! the script back onto the live tree while honoring custom element
//! lifecycle hooks.
//!
//! The cycle is: [`Reconciler::capture`] the current subtree, capture
//! the desired subtree (usually built in a scratch tree), feed both to
//! [`Reconciler::diff`], then [`Reconciler::apply`] the resulting
//! script. Virtual trees must be handed back through
//! [`Reconciler::release`] before being discarded or their pooled
//! records and registry entries stay claimed for the life of the
//! reconciler.
//!
//! The engine is single-threaded and synchronous; capture, diff, and
//! patch run to completion on the calling thread. Overlapping patches
//! over the same live subtree are the caller's hazard to prevent.

mod capture;
mod diff;
mod patch;
mod pool;
mod registry;
mod vnode;

pub use diff::{EditOp, EditScript};
pub use pool::{NodePool, PoolStats};
pub use registry::NodeRegistry;
pub use vnode::{VAttr, VNode, VNodeId, TEXT_NODE};

use heddle_dom::DomError;

/// Engine errors
///
/// `StaleNode` and `Desync` are invariant violations: continuing after
/// either would corrupt further patches, so callers should treat them
/// as fatal. `ScriptMismatch` and `Dom` report caller misuse (a script
/// applied to a live tree it was not computed against). Nothing here is
/// retriable; the engine is deterministic over its inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Virtual node handle was released, or never allocated
    #[error("stale virtual node handle {0:?}")]
    StaleNode(VNodeId),
    /// No live node is registered for a coordinate the script expects
    #[error("virtual tree desynchronized: no live node for {0:?}")]
    Desync(VNodeId),
    /// Edit script no longer matches the live tree
    #[error("edit script does not match live tree: {0}")]
    ScriptMismatch(&'static str),
    /// Live tree rejected a mutation
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Reconciliation context: object pool plus node registry.
///
/// Construct one per independent UI root. Pool and registry state are
/// scoped to this value's lifetime; nothing is process-global.
#[derive(Debug, Default)]
pub struct Reconciler {
    pool: NodePool,
    registry: NodeRegistry,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The backing object pool
    pub fn pool(&self) -> &NodePool {
        &self.pool
    }

    /// The virtual-to-live back-reference table
    pub fn node_registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Resolve a virtual node handle to its record
    pub fn vnode(&self, id: VNodeId) -> Result<&VNode, EngineError> {
        self.pool.resolve(id)
    }

    /// Recursively return a virtual tree's records to the pool and
    /// purge their registry entries.
    ///
    /// The root handle must still be live; descendants that were
    /// already retired by an earlier [`Reconciler::apply`] (replaced or
    /// truncated subtrees) are skipped. Releasing a handle twice is a
    /// use-after-release and fails with [`EngineError::StaleNode`].
    pub fn release(&mut self, root: VNodeId) -> Result<(), EngineError> {
        self.pool.resolve(root)?;
        self.release_tree(root);
        Ok(())
    }

    pub(crate) fn release_tree(&mut self, root: VNodeId) {
        if !self.pool.is_live(root) {
            // Already retired by a patch
            return;
        }
        let children = match self.pool.resolve(root) {
            Ok(record) => record.children.clone(),
            Err(_) => return,
        };
        for child in children {
            self.release_tree(child);
        }
        self.registry.unbind(root);
        // Infallible: liveness was checked above
        let _ = self.pool.release(root);
    }
}
