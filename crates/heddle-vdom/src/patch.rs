//! Patch applier
//!
//! Replays an edit script against the live tree in script order,
//! resolving old-tree coordinates through the node registry and
//! materializing new subtrees from their virtual records. Custom
//! element lifecycle runs at the contractual points: definition merge
//! and `created` before structural insertion, `attached` after, and
//! only if the element ended up connected to the document; `detached`
//! after structural removal. Retired virtual subtrees go back to the
//! pool.

use std::rc::Rc;

use heddle_dom::{ElementDefinition, ElementRegistry, LifecycleHook, LiveTree, NodeId};

use crate::diff::{EditOp, EditScript};
use crate::vnode::VNodeId;
use crate::{EngineError, Reconciler};

impl Reconciler {
    /// Replay an edit script against the live tree, in script order.
    ///
    /// `definitions` is consulted for custom element lifecycle hooks
    /// whenever a new element is materialized. On success the live
    /// tree matches the new virtual tree the script was computed
    /// toward, and every virtual node the script retired has been
    /// released.
    pub fn apply(
        &mut self,
        tree: &mut LiveTree,
        definitions: &ElementRegistry,
        script: &EditScript,
    ) -> Result<(), EngineError> {
        tracing::debug!("applying {} op(s)", script.len());
        for op in script.ops() {
            match op {
                EditOp::Replace { old, new } => {
                    self.apply_replace(tree, definitions, *old, *new)?;
                }
                EditOp::SetText { node, value } => {
                    let live = self.live_node(*node)?;
                    tree.set_text(live, value)?;
                }
                EditOp::SetAttribute { node, name, value } => {
                    let live = self.live_node(*node)?;
                    tree.set_attribute(live, name, value)?;
                }
                EditOp::RemoveAttribute { node, name } => {
                    let live = self.live_node(*node)?;
                    tree.remove_attribute(live, name)?;
                }
                EditOp::InsertChild {
                    parent,
                    index,
                    child,
                } => {
                    self.apply_insert(tree, definitions, *parent, *index, *child)?;
                }
                EditOp::RemoveChild {
                    parent,
                    index,
                    child,
                } => {
                    self.apply_remove(tree, *parent, *index, *child)?;
                }
            }
        }
        Ok(())
    }

    /// Activate custom elements already present in a live subtree.
    ///
    /// For every element matching a registered definition (by tag
    /// name, or through an `is` attribute naming a definition that
    /// extends the tag) that has not been activated yet: merge the
    /// definition, run `created`, and, if the element is connected to
    /// the document, run `attached`. Each element is activated at most
    /// once; repeated calls are no-ops.
    pub fn activate(
        &mut self,
        tree: &mut LiveTree,
        definitions: &ElementRegistry,
        root: NodeId,
    ) -> Result<(), EngineError> {
        if tree.get(root).is_none() {
            return Err(EngineError::Dom(heddle_dom::DomError::NotFound));
        }
        let mut order = Vec::new();
        collect_preorder(tree, root, &mut order);
        for id in order {
            if activate_element(tree, definitions, id) && tree.is_connected(id) {
                if let Some(hook) = attached_hook(tree, id) {
                    hook(tree, id);
                }
            }
        }
        Ok(())
    }

    /// Resolve an old-tree coordinate to its live node.
    fn live_node(&self, vnode: VNodeId) -> Result<NodeId, EngineError> {
        self.pool.resolve(vnode)?;
        self.registry
            .lookup(vnode)
            .ok_or(EngineError::Desync(vnode))
    }

    fn apply_replace(
        &mut self,
        tree: &mut LiveTree,
        definitions: &ElementRegistry,
        old: VNodeId,
        new: VNodeId,
    ) -> Result<(), EngineError> {
        let live_old = self.live_node(old)?;
        let parent = tree
            .parent(live_old)
            .ok_or(EngineError::ScriptMismatch("replaced node has no parent"))?;

        let live_new = self.materialize(tree, definitions, new)?;
        tree.replace_child(parent, live_new, live_old)?;
        if tree.is_connected(live_new) {
            fire_attached(tree, live_new);
        }
        fire_detached(tree, live_old);
        self.release_tree(old);
        Ok(())
    }

    fn apply_insert(
        &mut self,
        tree: &mut LiveTree,
        definitions: &ElementRegistry,
        parent: VNodeId,
        index: usize,
        child: VNodeId,
    ) -> Result<(), EngineError> {
        let live_parent = self.live_node(parent)?;
        if index > tree.child_count(live_parent) {
            return Err(EngineError::ScriptMismatch(
                "insertion index beyond live children",
            ));
        }
        let live_child = self.materialize(tree, definitions, child)?;
        tree.insert_child_at(live_parent, index, live_child)?;
        if tree.is_connected(live_child) {
            fire_attached(tree, live_child);
        }
        Ok(())
    }

    fn apply_remove(
        &mut self,
        tree: &mut LiveTree,
        parent: VNodeId,
        index: usize,
        child: VNodeId,
    ) -> Result<(), EngineError> {
        let live_parent = self.live_node(parent)?;
        if index >= tree.child_count(live_parent) {
            return Err(EngineError::ScriptMismatch(
                "removal index beyond live children",
            ));
        }
        let live_child = tree.children(live_parent)[index];
        match self.registry.lookup(child) {
            None => return Err(EngineError::Desync(child)),
            Some(expected) if expected != live_child => {
                return Err(EngineError::ScriptMismatch("removal target mismatch"));
            }
            Some(_) => {}
        }
        tree.remove_child_at(live_parent, index)?;
        fire_detached(tree, live_child);
        self.release_tree(child);
        Ok(())
    }

    /// Build the live subtree for a virtual subtree.
    ///
    /// Each element is created, given its attributes, activated
    /// (definition merge plus `created`) before it is woven into its
    /// parent, then filled with its materialized children. The virtual
    /// nodes are re-bound in the registry to the live nodes they
    /// produced. `attached` is the caller's to fire once the subtree
    /// is rooted, since connectivity is unknowable here.
    fn materialize(
        &mut self,
        tree: &mut LiveTree,
        definitions: &ElementRegistry,
        vnode: VNodeId,
    ) -> Result<NodeId, EngineError> {
        let record = self.pool.resolve(vnode)?;

        if record.is_text() {
            let value = record.node_value.clone().unwrap_or_default();
            let live = tree.create_text(&value);
            self.registry.bind(vnode, live);
            return Ok(live);
        }

        let name = record.node_name.clone();
        let attrs: Vec<(String, String)> = record
            .attributes
            .iter()
            .map(|a| (a.name.clone(), a.value.clone()))
            .collect();
        let children = record.children.clone();

        let live = tree.create_element(&name);
        for (attr_name, attr_value) in &attrs {
            tree.set_attribute(live, attr_name, attr_value)?;
        }
        self.registry.bind(vnode, live);
        activate_element(tree, definitions, live);

        for child in children {
            let live_child = self.materialize(tree, definitions, child)?;
            tree.append_child(live, live_child)?;
        }

        Ok(live)
    }
}

/// Resolve the definition an element should be activated with: a
/// direct tag-name registration, or an `is` attribute naming a
/// definition that extends this tag.
fn resolve_definition(
    tree: &LiveTree,
    definitions: &ElementRegistry,
    live: NodeId,
) -> Option<Rc<ElementDefinition>> {
    let elem = tree.get(live)?.as_element()?;
    if elem.is_activated() {
        return None;
    }
    if let Some(def) = definitions.lookup(&elem.name) {
        if def.extends.is_none() {
            return Some(def);
        }
    }
    let extension = elem.get_attr("is")?;
    let def = definitions.lookup(extension)?;
    if def.extends.as_deref() == Some(elem.name.as_str()) {
        Some(def)
    } else {
        None
    }
}

/// Merge the matching definition onto an element and run `created`.
/// Returns true if activation ran; false if there was no match or the
/// element was already activated.
fn activate_element(tree: &mut LiveTree, definitions: &ElementRegistry, live: NodeId) -> bool {
    let Some(def) = resolve_definition(tree, definitions, live) else {
        return false;
    };
    let adopted = tree
        .get_mut(live)
        .and_then(|n| n.as_element_mut())
        .map(|e| e.adopt_definition(def.clone()))
        .unwrap_or(false);
    if !adopted {
        return false;
    }
    tracing::debug!("activated custom element <{}>", def.name);
    if let Some(hook) = def.created.clone() {
        hook(tree, live);
    }
    true
}

fn attached_hook(tree: &LiveTree, live: NodeId) -> Option<LifecycleHook> {
    let elem = tree.get(live)?.as_element()?;
    elem.definition()?.attached.clone()
}

fn detached_hook(tree: &LiveTree, live: NodeId) -> Option<LifecycleHook> {
    let elem = tree.get(live)?.as_element()?;
    elem.definition()?.detached.clone()
}

fn collect_preorder(tree: &LiveTree, root: NodeId, out: &mut Vec<NodeId>) {
    out.push(root);
    for &child in tree.children(root) {
        collect_preorder(tree, child, out);
    }
}

/// Fire `attached` for every activated element in a freshly connected
/// subtree, document order.
fn fire_attached(tree: &mut LiveTree, root: NodeId) {
    let mut order = Vec::new();
    collect_preorder(tree, root, &mut order);
    for id in order {
        if let Some(hook) = attached_hook(tree, id) {
            hook(tree, id);
        }
    }
}

/// Fire `detached` for every activated element in a freshly removed
/// subtree, document order.
fn fire_detached(tree: &mut LiveTree, root: NodeId) {
    let mut order = Vec::new();
    collect_preorder(tree, root, &mut order);
    for id in order {
        if let Some(hook) = detached_hook(tree, id) {
            hook(tree, id);
        }
    }
}
