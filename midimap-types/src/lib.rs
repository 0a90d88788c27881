//! # midimap-types
//!
//! Shared type definitions for the midimap remapper.
//! This crate contains the event and rule data model used across
//! midimap-core and midimap-ui, with no I/O of its own.

mod event;
mod names;
mod rule;

pub use event::{MessageType, MidiEvent};
pub use names::{cc_name, note_name};
pub use rule::{MappingRule, RouteTarget, Transform, MAX_FAN_OUT};

/// Session-scoped toggles controlling whether mapping and demo
/// generation are active. Mutated only by command dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RuntimeMode {
    pub mapping_enabled: bool,
    pub demo_enabled: bool,
}

impl Default for RuntimeMode {
    fn default() -> Self {
        Self {
            mapping_enabled: true,
            demo_enabled: false,
        }
    }
}
