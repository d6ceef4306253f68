//! Song Roll: registered so patches referencing it load, nothing more.

use pianoroll_core::{Module, Ports, ProcessArgs};
use serde_json::{Value, json};

/// Portless placeholder module with an empty state object.
#[derive(Debug, Clone, Copy, Default)]
pub struct SongRoll;

impl SongRoll {
    /// Create the module.
    pub fn new() -> Self {
        Self
    }
}

impl Module for SongRoll {
    fn process(&mut self, _args: &ProcessArgs, _ports: &mut Ports) {}

    fn on_reset(&mut self) {}

    fn data_to_json(&self) -> Value {
        json!({})
    }

    fn data_from_json(&mut self, _root: &Value) {}
}
