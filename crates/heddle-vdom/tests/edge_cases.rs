//! Edge case tests for heddle-vdom
//!
//! Stale handles, mismatched scripts, subtree replacement at the
//! captured root, and pool reuse across capture cycles.

use heddle_dom::{ElementRegistry, LiveTree, NodeId};
use heddle_vdom::{EngineError, Reconciler};

fn connected_div(tree: &mut LiveTree) -> NodeId {
    let div = tree.create_element("div");
    tree.append_child(tree.root(), div).unwrap();
    div
}

#[test]
fn test_released_handle_is_rejected_everywhere() {
    let mut tree = LiveTree::new();
    let div = connected_div(&mut tree);

    let mut engine = Reconciler::new();
    let vid = engine.capture(&tree, div).unwrap();
    engine.release(vid).unwrap();

    assert!(matches!(engine.vnode(vid), Err(EngineError::StaleNode(_))));
    assert!(matches!(
        engine.release(vid),
        Err(EngineError::StaleNode(_))
    ));
    assert!(matches!(
        engine.diff(vid, vid),
        Err(EngineError::StaleNode(_))
    ));
}

#[test]
fn test_slot_reuse_does_not_revive_old_handles() {
    let mut tree = LiveTree::new();
    let div = connected_div(&mut tree);

    let mut engine = Reconciler::new();
    let first = engine.capture(&tree, div).unwrap();
    engine.release(first).unwrap();

    // Same slot, new generation
    let second = engine.capture(&tree, div).unwrap();
    assert!(engine.vnode(second).is_ok());
    assert!(matches!(
        engine.vnode(first),
        Err(EngineError::StaleNode(_))
    ));
}

#[test]
fn test_pool_reuses_records_across_cycles() {
    let mut tree = LiveTree::new();
    let div = connected_div(&mut tree);
    tree.set_attribute(div, "class", "x").unwrap();
    let span = tree.create_element("span");
    let text = tree.create_text("body");
    tree.append_child(span, text).unwrap();
    tree.append_child(div, span).unwrap();

    let mut engine = Reconciler::new();
    let first = engine.capture(&tree, div).unwrap();
    engine.release(first).unwrap();
    let created_after_first = engine.pool().stats().elements_created;

    let second = engine.capture(&tree, div).unwrap();
    engine.release(second).unwrap();

    // The second capture ran entirely off the free-lists
    assert_eq!(engine.pool().stats().elements_created, created_after_first);
    assert!(engine.pool().stats().elements_reused >= 3);
    assert!(engine.pool().stats().attrs_reused >= 1);
}

#[test]
fn test_replace_at_captured_root() {
    let mut tree = LiveTree::new();
    let div = connected_div(&mut tree);

    let mut template = LiveTree::new();
    let t_span = template.create_element("span");

    let definitions = ElementRegistry::new();
    let mut engine = Reconciler::new();
    let old = engine.capture(&tree, div).unwrap();
    let new = engine.capture(&template, t_span).unwrap();

    let script = engine.diff(old, new).unwrap();
    engine.apply(&mut tree, &definitions, &script).unwrap();

    let replacement = tree.children(tree.root())[0];
    assert_eq!(tree.tag_name(replacement), Some("span"));
    assert!(!tree.is_connected(div));

    // The replaced subtree was retired by the patch; its handle is
    // use-after-release from here on.
    assert!(matches!(
        engine.release(old),
        Err(EngineError::StaleNode(_))
    ));
    engine.release(new).unwrap();
}

#[test]
fn test_text_and_element_swap_in_children() {
    let mut tree = LiveTree::new();
    let div = connected_div(&mut tree);
    let text = tree.create_text("plain");
    tree.append_child(div, text).unwrap();

    let mut template = LiveTree::new();
    let t_div = template.create_element("div");
    let t_span = template.create_element("span");
    template.append_child(t_div, t_span).unwrap();

    let definitions = ElementRegistry::new();
    let mut engine = Reconciler::new();
    let old = engine.capture(&tree, div).unwrap();
    let new = engine.capture(&template, t_div).unwrap();

    let script = engine.diff(old, new).unwrap();
    engine.apply(&mut tree, &definitions, &script).unwrap();

    assert_eq!(tree.child_count(div), 1);
    assert_eq!(tree.tag_name(tree.children(div)[0]), Some("span"));
}

#[test]
fn test_stale_script_is_reported_not_applied() {
    let mut tree = LiveTree::new();
    let ul = tree.create_element("ul");
    tree.append_child(tree.root(), ul).unwrap();
    for _ in 0..2 {
        let li = tree.create_element("li");
        tree.append_child(ul, li).unwrap();
    }

    let mut template = LiveTree::new();
    let t_ul = template.create_element("ul");
    let t_li = template.create_element("li");
    template.append_child(t_ul, t_li).unwrap();

    let definitions = ElementRegistry::new();
    let mut engine = Reconciler::new();
    let old = engine.capture(&tree, ul).unwrap();
    let new = engine.capture(&template, t_ul).unwrap();

    let script = engine.diff(old, new).unwrap();
    engine.apply(&mut tree, &definitions, &script).unwrap();
    assert_eq!(tree.child_count(ul), 1);

    // The live tree no longer matches the tree the script was computed
    // against; replaying it must be rejected, not half-applied.
    let err = engine.apply(&mut tree, &definitions, &script).unwrap_err();
    assert!(matches!(err, EngineError::ScriptMismatch(_)));
    assert_eq!(tree.child_count(ul), 1);
}

#[test]
fn test_grow_then_shrink_child_lists() {
    let mut tree = LiveTree::new();
    let ul = tree.create_element("ul");
    tree.append_child(tree.root(), ul).unwrap();

    let definitions = ElementRegistry::new();
    let mut engine = Reconciler::new();

    // Grow from zero to three children
    let mut grown = LiveTree::new();
    let g_ul = grown.create_element("ul");
    for label in ["a", "b", "c"] {
        let li = grown.create_element("li");
        let text = grown.create_text(label);
        grown.append_child(li, text).unwrap();
        grown.append_child(g_ul, li).unwrap();
    }

    let old = engine.capture(&tree, ul).unwrap();
    let new = engine.capture(&grown, g_ul).unwrap();
    let script = engine.diff(old, new).unwrap();
    assert_eq!(script.len(), 3);
    engine.apply(&mut tree, &definitions, &script).unwrap();
    assert_eq!(tree.child_count(ul), 3);

    // Shrink back down to one
    let mut shrunk = LiveTree::new();
    let s_ul = shrunk.create_element("ul");
    let li = shrunk.create_element("li");
    let text = shrunk.create_text("a");
    shrunk.append_child(li, text).unwrap();
    shrunk.append_child(s_ul, li).unwrap();

    let recaptured = engine.capture(&tree, ul).unwrap();
    let target = engine.capture(&shrunk, s_ul).unwrap();
    let script = engine.diff(recaptured, target).unwrap();
    engine.apply(&mut tree, &definitions, &script).unwrap();

    assert_eq!(tree.child_count(ul), 1);
    let li = tree.children(ul)[0];
    assert_eq!(tree.text(tree.children(li)[0]), Some("a"));
}

#[test]
fn test_empty_element_captures_empty_sequences() {
    let mut tree = LiveTree::new();
    let div = connected_div(&mut tree);

    let mut engine = Reconciler::new();
    let vid = engine.capture(&tree, div).unwrap();
    let record = engine.vnode(vid).unwrap();

    assert!(record.attributes.is_empty());
    assert!(record.children.is_empty());
    assert!(record.node_value.is_none());
}
