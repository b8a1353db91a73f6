//! Scene hierarchy
//!
//! Containment tree used to locate a module's owning actor and to decide
//! whether a module's hierarchy is active.

pub mod node;

pub use node::SceneNode;
