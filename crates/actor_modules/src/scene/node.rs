//! Host object hierarchy
//!
//! A minimal containment tree standing in for the host engine's scene graph.
//! Nodes that carry a [`Registry`] are actors; modules activated on any node
//! register with the nearest actor at or above it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::module::{Owner, Registry};

/// Node in the host hierarchy
pub struct SceneNode<O: Owner> {
    name: String,
    parent: Option<Weak<SceneNode<O>>>,
    children: RefCell<Vec<Rc<SceneNode<O>>>>,
    active_self: Cell<bool>,
    registry: Option<Rc<Registry<O>>>,
}

impl<O: Owner> SceneNode<O> {
    /// Create a root node without a registry
    pub fn root(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self::new(name.into(), None, None))
    }

    /// Create a root actor owning a fresh registry for `owner`
    pub fn actor(name: impl Into<String>, owner: O) -> Rc<Self> {
        Rc::new(Self::new(name.into(), None, Some(Registry::shared(owner))))
    }

    /// Create a plain child node
    pub fn spawn_child(self: &Rc<Self>, name: impl Into<String>) -> Rc<Self> {
        self.attach(name.into(), None)
    }

    /// Create a child actor owning a fresh registry for `owner`
    pub fn spawn_child_actor(self: &Rc<Self>, name: impl Into<String>, owner: O) -> Rc<Self> {
        self.attach(name.into(), Some(Registry::shared(owner)))
    }

    fn new(name: String, parent: Option<Weak<Self>>, registry: Option<Rc<Registry<O>>>) -> Self {
        Self {
            name,
            parent,
            children: RefCell::new(Vec::new()),
            active_self: Cell::new(true),
            registry,
        }
    }

    fn attach(self: &Rc<Self>, name: String, registry: Option<Rc<Registry<O>>>) -> Rc<Self> {
        let child = Rc::new(Self::new(name, Some(Rc::downgrade(self)), registry));
        self.children.borrow_mut().push(Rc::clone(&child));
        child
    }

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slash-separated names from the root down to this node
    pub fn path(&self) -> String {
        match self.parent() {
            Some(parent) => format!("{}/{}", parent.path(), self.name),
            None => self.name.clone(),
        }
    }

    /// Parent node, if still alive
    pub fn parent(&self) -> Option<Rc<Self>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Direct children
    pub fn children(&self) -> Vec<Rc<Self>> {
        self.children.borrow().clone()
    }

    /// Registry carried by this node, if it is an actor
    pub fn registry(&self) -> Option<&Rc<Registry<O>>> {
        self.registry.as_ref()
    }

    /// Set this node's own active flag
    pub fn set_active(&self, active: bool) {
        self.active_self.set(active);
    }

    /// This node's own active flag, ignoring ancestors
    pub fn is_active_self(&self) -> bool {
        self.active_self.get()
    }

    /// Active when this node and every ancestor are active
    pub fn is_active_in_hierarchy(&self) -> bool {
        if !self.active_self.get() {
            return false;
        }
        self.parent()
            .map_or(true, |parent| parent.is_active_in_hierarchy())
    }

    /// Nearest registry at this node or above
    pub fn find_owner(&self) -> Option<Rc<Registry<O>>> {
        if let Some(registry) = &self.registry {
            return Some(Rc::clone(registry));
        }
        self.parent().and_then(|parent| parent.find_owner())
    }
}

impl<O: Owner> fmt::Debug for SceneNode<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("path", &self.path())
            .field("active_self", &self.active_self.get())
            .field("owner", &self.registry.as_ref().map(|r| r.owner()))
            .field("children", &self.children.borrow().len())
            .finish()
    }
}
