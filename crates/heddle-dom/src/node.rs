//! Document nodes
//!
//! Node kinds mirror the DOM: document, doctype, element, text,
//! comment, processing instruction. Elements keep their attributes in
//! source order and cache their custom element resolution once
//! activated.

use std::rc::Rc;

use crate::custom::ElementDefinition;
use crate::NodeId;

/// One node in the live tree.
#[derive(Debug)]
pub struct Node {
    /// Parent node (None for the document or while detached)
    pub(crate) parent: Option<NodeId>,
    /// Children in document order
    pub(crate) children: Vec<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    /// Parent node, if attached.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in document order.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Check if this is the document node
    #[inline]
    pub fn is_document(&self) -> bool {
        matches!(self.data, NodeData::Document)
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype { name: String },
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
    /// Comment
    Comment(String),
    /// Processing instruction
    ProcessingInstruction { target: String, data: String },
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Tag name, as created
    pub name: String,
    /// Attributes in source order, no duplicate names
    pub attrs: Vec<Attribute>,
    /// Cached custom element resolution (set at activation)
    definition: Option<Rc<ElementDefinition>>,
    /// Activation guard: lifecycle creation hooks run at most once
    activated: bool,
}

impl ElementData {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
            definition: None,
            activated: false,
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, updating in place if the name already exists
    pub fn set_attr(&mut self, name: &str, value: &str) {
        for attr in self.attrs.iter_mut() {
            if attr.name == name {
                attr.value.clear();
                attr.value.push_str(value);
                return;
            }
        }
        self.attrs.push(Attribute {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|a| a.name == name)?;
        Some(self.attrs.remove(idx).value)
    }

    /// Cache the element's custom element resolution and mark it
    /// activated. Returns false if the element was already activated.
    pub fn adopt_definition(&mut self, definition: Rc<ElementDefinition>) -> bool {
        if self.activated {
            return false;
        }
        self.definition = Some(definition);
        self.activated = true;
        true
    }

    /// The cached custom element resolution, if activated.
    pub fn definition(&self) -> Option<&Rc<ElementDefinition>> {
        self.definition.as_ref()
    }

    /// Whether lifecycle activation already ran for this element.
    #[inline]
    pub fn is_activated(&self) -> bool {
        self.activated
    }
}

/// Text node data
#[derive(Debug)]
pub struct TextData {
    pub content: String,
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attr_updates_in_place() {
        let mut elem = ElementData::new("div");
        elem.set_attr("class", "a");
        elem.set_attr("id", "x");
        elem.set_attr("class", "b");

        assert_eq!(elem.attrs.len(), 2);
        assert_eq!(elem.get_attr("class"), Some("b"));
        // Order preserved: class was set first
        assert_eq!(elem.attrs[0].name, "class");
    }

    #[test]
    fn test_remove_attr() {
        let mut elem = ElementData::new("div");
        elem.set_attr("id", "x");

        assert_eq!(elem.remove_attr("id"), Some("x".to_string()));
        assert_eq!(elem.remove_attr("id"), None);
        assert!(elem.attrs.is_empty());
    }

    #[test]
    fn test_adopt_definition_once() {
        let mut elem = ElementData::new("div");
        let def = Rc::new(ElementDefinition::new("extended-div"));

        assert!(elem.adopt_definition(def.clone()));
        assert!(!elem.adopt_definition(def));
        assert!(elem.is_activated());
    }
}
