//! Integration scenarios for the registration handshake, typed lookups and
//! dispatch ordering

mod fuel_engine;

use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::time::FrameTime;
use crate::module::{Module, ModuleLink};

pub(super) type Actor = &'static str;
pub(super) type Journal = Rc<RefCell<Vec<String>>>;

/// Records every hook it receives into a shared journal. Each `ID` is a
/// distinct concrete module type.
pub(super) struct Probe<const ID: u8> {
    pub link: ModuleLink<Actor>,
    pub journal: Journal,
}

impl<const ID: u8> Probe<ID> {
    pub fn new(journal: &Journal) -> Self {
        Self {
            link: ModuleLink::new(),
            journal: Rc::clone(journal),
        }
    }

    fn note(&self, hook: &str) {
        self.journal.borrow_mut().push(format!("{}:{}", hook, ID));
    }
}

impl<const ID: u8> Module<Actor> for Probe<ID> {
    fn link(&self) -> &ModuleLink<Actor> {
        &self.link
    }
    fn link_mut(&mut self) -> &mut ModuleLink<Actor> {
        &mut self.link
    }
    fn on_start(&mut self) {
        self.note("start");
    }
    fn on_update(&mut self, _time: &FrameTime) {
        self.note("update");
    }
    fn on_physics_update(&mut self, _time: &FrameTime) {
        self.note("physics");
    }
    fn on_late_update(&mut self, _time: &FrameTime) {
        self.note("late");
    }
}

pub(super) fn entries(journal: &Journal, hook: &str) -> Vec<String> {
    journal
        .borrow()
        .iter()
        .filter(|entry| entry.starts_with(hook))
        .cloned()
        .collect()
}
