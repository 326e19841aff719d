//! Custom element registry
//!
//! Definitions are registered once per tag name and looked up during
//! patch application. Lifecycle hooks run against the live tree; extra
//! methods become callable through [`LiveTree::call_method`] once the
//! definition has been cached on an element.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::tree::LiveTree;
use crate::NodeId;

/// Lifecycle hook or element method, run against the live tree.
pub type LifecycleHook = Rc<dyn Fn(&mut LiveTree, NodeId)>;

/// Custom element definition
pub struct ElementDefinition {
    /// Registered name (`custom-element-three`, `extended-div`, ...)
    pub name: String,
    /// Built-in tag this definition extends; instantiated via the `is`
    /// attribute rather than by tag name
    pub extends: Option<String>,
    /// Runs after the definition is merged, before structural insertion
    pub created: Option<LifecycleHook>,
    /// Runs once the element is connected to the document
    pub attached: Option<LifecycleHook>,
    /// Runs after the element is removed from the document
    pub detached: Option<LifecycleHook>,
    methods: HashMap<String, LifecycleHook>,
}

impl ElementDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            extends: None,
            created: None,
            attached: None,
            detached: None,
            methods: HashMap::new(),
        }
    }

    /// Add a named method to the definition
    pub fn add_method(&mut self, name: &str, method: LifecycleHook) {
        self.methods.insert(name.to_string(), method);
    }

    /// Look up a named method
    pub fn method(&self, name: &str) -> Option<&LifecycleHook> {
        self.methods.get(name)
    }
}

impl fmt::Debug for ElementDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementDefinition")
            .field("name", &self.name)
            .field("extends", &self.extends)
            .field("created", &self.created.is_some())
            .field("attached", &self.attached.is_some())
            .field("detached", &self.detached.is_some())
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Registry errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Name fails custom element naming rules
    #[error("invalid custom element name: {0}")]
    InvalidName(String),
    /// A definition already exists under this name
    #[error("custom element already defined: {0}")]
    AlreadyDefined(String),
}

/// Custom element registry with register-once semantics
#[derive(Debug, Default)]
pub struct ElementRegistry {
    definitions: HashMap<String, Rc<ElementDefinition>>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition under its name
    ///
    /// A second registration for the same name fails with
    /// [`RegistryError::AlreadyDefined`] and leaves the first intact.
    pub fn define(&mut self, definition: ElementDefinition) -> Result<(), RegistryError> {
        if !Self::is_valid_name(&definition.name) {
            return Err(RegistryError::InvalidName(definition.name));
        }
        if self.definitions.contains_key(&definition.name) {
            return Err(RegistryError::AlreadyDefined(definition.name));
        }
        tracing::debug!("defined custom element <{}>", definition.name);
        self.definitions
            .insert(definition.name.clone(), Rc::new(definition));
        Ok(())
    }

    /// Look up a definition by registered name
    pub fn lookup(&self, name: &str) -> Option<Rc<ElementDefinition>> {
        self.definitions.get(name).cloned()
    }

    /// Check if a name is registered
    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Number of registered definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Validate a custom element name
    pub fn is_valid_name(name: &str) -> bool {
        // Must contain a hyphen
        if !name.contains('-') {
            return false;
        }

        // Must start with a lowercase letter
        if !name
            .chars()
            .next()
            .map(|c| c.is_ascii_lowercase())
            .unwrap_or(false)
        {
            return false;
        }

        // Reserved names
        const RESERVED: &[&str] = &[
            "annotation-xml",
            "color-profile",
            "font-face",
            "font-face-src",
            "font-face-uri",
            "font-face-format",
            "font-face-name",
            "missing-glyph",
        ];
        if RESERVED.contains(&name) {
            return false;
        }

        name.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    }
}
