//! Frame driving
//!
//! The host engine normally calls the four lifecycle passes itself. [`Stage`]
//! does the same job for programs that own their main loop.

pub mod stage;

pub use stage::{ActorKey, FrameStats, Stage};
