//! Heddle Demo - Main Entry Point
//!
//! Runs one capture/diff/apply cycle over a small live tree and logs
//! what the engine did at each step.

use std::error::Error;
use std::rc::Rc;

use heddle_dom::{ElementDefinition, ElementRegistry, LiveTree};
use heddle_vdom::Reconciler;

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting heddle demo...");

    let mut definitions = ElementRegistry::new();
    let mut badge = ElementDefinition::new("status-badge");
    badge.created = Some(Rc::new(|_, _| log::info!("<status-badge> created")));
    badge.attached = Some(Rc::new(|tree, node| {
        log::info!(
            "<status-badge> attached (connected: {})",
            tree.is_connected(node)
        );
    }));
    definitions.define(badge)?;

    // The live tree the engine owns
    let mut tree = LiveTree::new();
    let list = tree.create_element("ul");
    tree.append_child(tree.root(), list)?;
    let item = tree.create_element("li");
    let text = tree.create_text("first");
    tree.append_child(item, text)?;
    tree.append_child(list, item)?;

    // A scratch tree describing the next frame
    let mut template = LiveTree::new();
    let t_list = template.create_element("ul");
    template.set_attribute(t_list, "class", "active")?;
    template.append_child(template.root(), t_list)?;
    let t_item = template.create_element("li");
    let t_text = template.create_text("first, revised");
    template.append_child(t_item, t_text)?;
    template.append_child(t_list, t_item)?;
    let t_badge = template.create_element("status-badge");
    template.append_child(t_list, t_badge)?;

    let mut engine = Reconciler::new();
    let old = engine
        .capture(&tree, list)
        .ok_or("live list was filtered out")?;
    let new = engine
        .capture(&template, t_list)
        .ok_or("template list was filtered out")?;

    let script = engine.diff(old, new)?;
    log::info!("edit script: {} op(s)", script.len());

    engine.apply(&mut tree, &definitions, &script)?;
    log::info!("list class is now {:?}", tree.attribute(list, "class"));
    log::info!("list has {} children", tree.child_count(list));

    log::info!(
        "pool: {} live / {} free records, reuse rate {:.2}",
        engine.pool().live_len(),
        engine.pool().free_len(),
        engine.pool().stats().reuse_rate()
    );

    engine.release(old)?;
    engine.release(new)?;
    log::info!(
        "after release: {} live / {} free records, registry entries: {}",
        engine.pool().live_len(),
        engine.pool().free_len(),
        engine.node_registry().len()
    );

    Ok(())
}
