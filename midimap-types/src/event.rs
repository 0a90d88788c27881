use serde::{Deserialize, Serialize};

use crate::names::note_name;

/// MIDI-like message type. Channel voice messages beyond these three are
/// out of scope for the remapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    ControlChange,
    ProgramChange,
    Note,
}

impl MessageType {
    pub const ALL: [MessageType; 3] = [
        MessageType::ControlChange,
        MessageType::ProgramChange,
        MessageType::Note,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MessageType::ControlChange => "CC",
            MessageType::ProgramChange => "PC",
            MessageType::Note => "Note",
        }
    }

    /// Token used for this type in the mapping source ("cc:74" etc.).
    pub fn token(&self) -> &'static str {
        match self {
            MessageType::ControlChange => "cc",
            MessageType::ProgramChange => "pc",
            MessageType::Note => "note",
        }
    }

    /// Parse a mapping-source type token. Case-insensitive; "nn" is an
    /// accepted alias for "note". Unknown tokens return `None`, which the
    /// resolver treats as "keep the source event's type".
    pub fn from_token(token: &str) -> Option<MessageType> {
        match token.to_ascii_lowercase().as_str() {
            "cc" => Some(MessageType::ControlChange),
            "pc" => Some(MessageType::ProgramChange),
            "note" | "nn" => Some(MessageType::Note),
            _ => None,
        }
    }
}

/// One MIDI-like message. `value` carries the CC value or note velocity and
/// is 0 by convention for ProgramChange. The same shape serves both the
/// input event and the resolved outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiEvent {
    pub kind: MessageType,
    pub number: u8,
    pub value: u8,
}

impl MidiEvent {
    pub fn new(kind: MessageType, number: u8, value: u8) -> Self {
        Self { kind, number, value }
    }

    pub fn cc(number: u8, value: u8) -> Self {
        Self::new(MessageType::ControlChange, number, value)
    }

    pub fn pc(number: u8) -> Self {
        Self::new(MessageType::ProgramChange, number, 0)
    }

    pub fn note(number: u8, velocity: u8) -> Self {
        Self::new(MessageType::Note, number, velocity)
    }

    /// Display name without the value: "CC12", "PC5", "C4".
    pub fn name(&self) -> String {
        match self.kind {
            MessageType::ControlChange => format!("CC{}", self.number),
            MessageType::ProgramChange => format!("PC{}", self.number),
            MessageType::Note => note_name(self.number),
        }
    }

    /// Echo form: "CC12:123", "PC5", "C4:100". ProgramChange carries no
    /// value on the wire, so none is shown.
    pub fn label(&self) -> String {
        match self.kind {
            MessageType::ProgramChange => self.name(),
            _ => format!("{}:{}", self.name(), self.value),
        }
    }
}
