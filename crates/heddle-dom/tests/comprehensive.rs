//! Comprehensive tests for heddle-dom
//!
//! Tree construction, mutation primitives, and custom element
//! registration exercised through the public API.

use std::cell::Cell;
use std::rc::Rc;

use heddle_dom::{DomError, ElementDefinition, ElementRegistry, LiveTree, RegistryError};

#[test]
fn test_build_and_inspect_tree() {
    let mut tree = LiveTree::new();

    let article = tree.create_element("article");
    let h1 = tree.create_element("h1");
    let title = tree.create_text("Reconciliation");
    let p = tree.create_element("p");
    let body = tree.create_text("Trees all the way down.");

    tree.append_child(tree.root(), article).unwrap();
    tree.append_child(article, h1).unwrap();
    tree.append_child(h1, title).unwrap();
    tree.append_child(article, p).unwrap();
    tree.append_child(p, body).unwrap();

    assert_eq!(tree.tag_name(article), Some("article"));
    assert_eq!(tree.children(article), &[h1, p]);
    assert_eq!(tree.text(title), Some("Reconciliation"));
    assert!(tree.is_connected(body));
}

#[test]
fn test_mutation_primitives_round_trip() {
    let mut tree = LiveTree::new();

    let ul = tree.create_element("ul");
    tree.append_child(tree.root(), ul).unwrap();

    let items: Vec<_> = (0..3).map(|_| tree.create_element("li")).collect();
    for &li in &items {
        tree.append_child(ul, li).unwrap();
    }

    // Remove the middle item, reinsert it at the front
    let middle = tree.remove_child_at(ul, 1).unwrap();
    tree.insert_child_at(ul, 0, middle).unwrap();
    assert_eq!(tree.children(ul), &[items[1], items[0], items[2]]);

    // Replace the tail with a fresh element
    let replacement = tree.create_element("li");
    tree.replace_child(ul, replacement, items[2]).unwrap();
    assert_eq!(tree.children(ul)[2], replacement);
    assert!(!tree.is_connected(items[2]));
}

#[test]
fn test_misuse_errors() {
    let mut tree = LiveTree::new();
    let div = tree.create_element("div");
    let text = tree.create_text("x");

    assert_eq!(tree.set_text(div, "x"), Err(DomError::NotAText));
    assert_eq!(tree.set_attribute(text, "a", "b"), Err(DomError::NotAnElement));
    assert_eq!(
        tree.remove_child(tree.root(), div),
        Err(DomError::NotAChild)
    );
}

#[test]
fn test_registry_and_hooks() {
    let mut registry = ElementRegistry::new();

    let created = Rc::new(Cell::new(0u32));
    let count = created.clone();
    let mut def = ElementDefinition::new("x-counter");
    def.created = Some(Rc::new(move |_, _| count.set(count.get() + 1)));
    registry.define(def).unwrap();

    assert_eq!(
        registry
            .define(ElementDefinition::new("x-counter"))
            .unwrap_err(),
        RegistryError::AlreadyDefined("x-counter".to_string())
    );

    // Invoke the stored hook the way the patch applier would
    let def = registry.lookup("x-counter").unwrap();
    let mut tree = LiveTree::new();
    let node = tree.create_element("x-counter");
    if let Some(hook) = def.created.clone() {
        hook(&mut tree, node);
    }
    assert_eq!(created.get(), 1);
}

#[test]
fn test_extends_definition_shape() {
    let mut registry = ElementRegistry::new();

    let mut def = ElementDefinition::new("extended-div");
    def.extends = Some("div".to_string());
    registry.define(def).unwrap();

    let def = registry.lookup("extended-div").unwrap();
    assert_eq!(def.extends.as_deref(), Some("div"));
    assert!(registry.lookup("div").is_none());
}
