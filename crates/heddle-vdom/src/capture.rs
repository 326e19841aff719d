//! Live-tree capture
//!
//! Converts a live subtree into pooled virtual nodes, filtering out
//! everything the diff does not care about: documents, doctypes,
//! comments, processing instructions, and whitespace-only text.

use heddle_dom::{LiveTree, NodeData, NodeId};

use crate::vnode::{VNodeId, TEXT_NODE};
use crate::Reconciler;

impl Reconciler {
    /// Convert a live node into a virtual node.
    ///
    /// Returns `None` for node kinds the virtual tree does not track;
    /// that is expected filtering, not a failure. Element tag names are
    /// lower-cased; attributes are copied in source order; children are
    /// captured recursively, keeping only the non-filtered ones in
    /// order. The returned node and every captured descendant are
    /// registered against the live nodes they came from.
    pub fn capture(&mut self, tree: &LiveTree, live: NodeId) -> Option<VNodeId> {
        let node = tree.get(live)?;

        match &node.data {
            NodeData::Document
            | NodeData::Doctype { .. }
            | NodeData::Comment(_)
            | NodeData::ProcessingInstruction { .. } => None,

            NodeData::Text(text) => {
                if text.content.trim().is_empty() {
                    return None;
                }
                let vid = self.pool.get();
                {
                    let record = self.pool.record_mut(vid);
                    record.node_name.push_str(TEXT_NODE);
                    // Raw value: only whitespace-only text is rejected,
                    // trimmed text is kept as-is.
                    record.node_value = Some(text.content.clone());
                }
                self.registry.bind(vid, live);
                tracing::trace!("captured text node as {:?}", vid);
                Some(vid)
            }

            NodeData::Element(elem) => {
                let vid = self.pool.get();
                // Bind before recursing so registry lookups are valid
                // even while children are still being captured.
                self.registry.bind(vid, live);

                {
                    let record = self.pool.record_mut(vid);
                    for c in elem.name.chars() {
                        record.node_name.push(c.to_ascii_lowercase());
                    }
                }

                for attr in &elem.attrs {
                    let mut captured = self.pool.get_attr();
                    captured.name.push_str(&attr.name);
                    captured.value.push_str(&attr.value);
                    self.pool.record_mut(vid).attributes.push(captured);
                }

                for &child in node.children() {
                    if let Some(child_vid) = self.capture(tree, child) {
                        self.pool.record_mut(vid).children.push(child_vid);
                    }
                }

                tracing::trace!(
                    "captured <{}> as {:?}",
                    self.pool.record_mut(vid).node_name,
                    vid
                );
                Some(vid)
            }
        }
    }
}
