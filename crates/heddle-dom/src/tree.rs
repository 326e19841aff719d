//! Live tree (arena-based allocation)
//!
//! Nodes are created detached and woven in with the mutation
//! primitives. The arena never shrinks; dropped subtrees simply stop
//! being reachable from the document node.

use crate::node::{ElementData, Node, NodeData, TextData};
use crate::NodeId;

/// Result type for tree operations
pub type DomResult<T> = Result<T, DomError>;

/// Tree operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("node not found")]
    NotFound,
    /// Operation requires an element node
    #[error("node is not an element")]
    NotAnElement,
    /// Operation requires a text node
    #[error("node is not a text node")]
    NotAText,
    /// Node is not a child of the given parent
    #[error("node is not a child of the given parent")]
    NotAChild,
    /// Child index out of bounds
    #[error("child index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
    /// Hierarchy error (e.g. inserting an attached node or an ancestor)
    #[error("hierarchy request error: {0}")]
    HierarchyRequest(&'static str),
    /// No such method on the element's definition
    #[error("no such method: {0}")]
    NoSuchMethod(String),
}

/// Arena-based live document tree
#[derive(Debug)]
pub struct LiveTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl LiveTree {
    /// Create a new tree holding only its document node
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.alloc(Node::new(NodeData::Document));
        tree
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element node
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.alloc(Node::new(NodeData::Element(ElementData::new(name))))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::new(NodeData::Text(TextData {
            content: content.to_string(),
        })))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text.to_string())))
    }

    /// Create a detached processing instruction node
    pub fn create_processing_instruction(&mut self, target: &str, data: &str) -> NodeId {
        self.alloc(Node::new(NodeData::ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        }))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.alloc(Node::new(NodeData::Doctype {
            name: name.to_string(),
        }))
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes in the arena (including detached ones)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of a node in document order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Number of children
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    /// Tag name, for element nodes
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| e.name.as_str())
    }

    /// Attribute value, for element nodes
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.get_attr(name)
    }

    /// Text content, for text nodes
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_text()
    }

    /// Whether the node is reachable from the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            let Some(node) = self.get(current) else {
                return false;
            };
            if node.is_document() {
                return true;
            }
            match node.parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn is_ancestor(&self, maybe_ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == maybe_ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_node = self.get(parent).ok_or(DomError::NotFound)?;
        if !parent_node.is_element() && !parent_node.is_document() {
            return Err(DomError::HierarchyRequest("parent cannot hold children"));
        }
        let child_node = self.get(child).ok_or(DomError::NotFound)?;
        if child_node.parent.is_some() {
            return Err(DomError::HierarchyRequest("child is already attached"));
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest("child is an ancestor of parent"));
        }
        Ok(())
    }

    /// Append a child node
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let index = self.child_count(parent);
        self.insert_child_at(parent, index, child)
    }

    /// Insert a child node at the given index
    pub fn insert_child_at(&mut self, parent: NodeId, index: usize, child: NodeId) -> DomResult<NodeId> {
        self.check_insertable(parent, child)?;
        let len = self.child_count(parent);
        if index > len {
            return Err(DomError::IndexOutOfBounds { index, len });
        }
        self.nodes[child.0 as usize].parent = Some(parent);
        self.nodes[parent.0 as usize].children.insert(index, child);
        Ok(child)
    }

    /// Remove the child at the given index, returning it detached
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> DomResult<NodeId> {
        let len = self.child_count(parent);
        if self.get(parent).is_none() {
            return Err(DomError::NotFound);
        }
        if index >= len {
            return Err(DomError::IndexOutOfBounds { index, len });
        }
        let child = self.nodes[parent.0 as usize].children.remove(index);
        self.nodes[child.0 as usize].parent = None;
        tracing::trace!("removed child {:?} from {:?}", child, parent);
        Ok(child)
    }

    /// Remove a child node, returning it detached
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let index = self
            .children(parent)
            .iter()
            .position(|&c| c == child)
            .ok_or(DomError::NotAChild)?;
        self.remove_child_at(parent, index)
    }

    /// Replace a child with another node, returning the old child detached
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> DomResult<NodeId> {
        let index = self
            .children(parent)
            .iter()
            .position(|&c| c == old_child)
            .ok_or(DomError::NotAChild)?;
        self.check_insertable(parent, new_child)?;
        self.nodes[old_child.0 as usize].parent = None;
        self.nodes[new_child.0 as usize].parent = Some(parent);
        self.nodes[parent.0 as usize].children[index] = new_child;
        tracing::trace!("replaced child {:?} with {:?} under {:?}", old_child, new_child, parent);
        Ok(old_child)
    }

    /// Set an attribute on an element node
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let node = self.get_mut(id).ok_or(DomError::NotFound)?;
        let elem = node.as_element_mut().ok_or(DomError::NotAnElement)?;
        elem.set_attr(name, value);
        Ok(())
    }

    /// Remove an attribute from an element node, returning the old value
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        let node = self.get_mut(id).ok_or(DomError::NotFound)?;
        let elem = node.as_element_mut().ok_or(DomError::NotAnElement)?;
        Ok(elem.remove_attr(name))
    }

    /// Set the content of a text node
    pub fn set_text(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        let node = self.get_mut(id).ok_or(DomError::NotFound)?;
        match &mut node.data {
            NodeData::Text(t) => {
                t.content.clear();
                t.content.push_str(value);
                Ok(())
            }
            _ => Err(DomError::NotAText),
        }
    }

    /// Invoke a named method from the element's cached definition
    pub fn call_method(&mut self, id: NodeId, name: &str) -> DomResult<()> {
        let node = self.get(id).ok_or(DomError::NotFound)?;
        let elem = node.as_element().ok_or(DomError::NotAnElement)?;
        let hook = elem
            .definition()
            .and_then(|def| def.method(name))
            .cloned()
            .ok_or_else(|| DomError::NoSuchMethod(name.to_string()))?;
        hook(self, id);
        Ok(())
    }
}

impl Default for LiveTree {
    fn default() -> Self {
        Self::new()
    }
}
