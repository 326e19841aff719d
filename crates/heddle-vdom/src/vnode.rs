//! Virtual nodes
//!
//! A virtual node mirrors one live element or significant text node:
//! just the data the diff and patch phases need, nothing else. Records
//! are pooled; handles carry a generation tag so a released record can
//! never be read back through an old handle.

/// Sentinel node name for text nodes
pub const TEXT_NODE: &str = "#text";

/// Handle to a pooled virtual node record
///
/// This is the opaque identity token the node registry is keyed by. It
/// is never a live reference; the generation is bumped every time the
/// underlying slot is released, so stale handles are detectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VNodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// One captured attribute, identity by `name`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VAttr {
    pub name: String,
    pub value: String,
}

impl VAttr {
    pub(crate) fn reset(&mut self) {
        self.name.clear();
        self.value.clear();
    }
}

/// Virtual representation of a node, containing only the data we wish
/// to diff and patch.
#[derive(Debug, Default)]
pub struct VNode {
    /// Lower-cased tag name, or [`TEXT_NODE`]
    pub node_name: String,
    /// Text payload; present only for text nodes
    pub node_value: Option<String>,
    /// Attributes in source order, no duplicate names
    pub attributes: Vec<VAttr>,
    /// Children in document order
    pub children: Vec<VNodeId>,
}

impl VNode {
    /// Whether this record represents a text node
    #[inline]
    pub fn is_text(&self) -> bool {
        self.node_name == TEXT_NODE
    }

    /// Attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Clear to zero state, retaining buffer capacity.
    ///
    /// Attribute records are drained separately by the pool so their
    /// buffers return to the attribute free-list.
    pub(crate) fn reset(&mut self) {
        self.node_name.clear();
        self.node_value = None;
        self.attributes.clear();
        self.children.clear();
    }
}
