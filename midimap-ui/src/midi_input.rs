//! Hardware MIDI input.
//!
//! Optional: the monitor is fully usable from the command line alone, so a
//! missing port or backend is never an error. Incoming Control Change,
//! Program Change, and Note On messages become engine events on the same
//! resolution path as typed commands; everything else is ignored.

use std::sync::mpsc::{self, Receiver};

use midir::{MidiInput, MidiInputConnection};

use midimap_types::MidiEvent;

/// MIDI input manager. The midir callback pushes decoded events onto an
/// mpsc channel; the main loop drains it with `poll_event`.
pub struct MidiInputManager {
    midi_in: Option<MidiInput>,
    connection: Option<MidiInputConnection<()>>,
    event_receiver: Option<Receiver<MidiEvent>>,
    connected_port_name: Option<String>,
    available_ports: Vec<String>,
}

impl MidiInputManager {
    pub fn new() -> Self {
        Self {
            midi_in: MidiInput::new("midimap").ok(),
            connection: None,
            event_receiver: None,
            connected_port_name: None,
            available_ports: Vec::new(),
        }
    }

    /// Refresh the list of available MIDI input port names.
    pub fn refresh_ports(&mut self) {
        self.available_ports.clear();
        if let Some(ref midi_in) = self.midi_in {
            for port in midi_in.ports() {
                if let Ok(name) = midi_in.port_name(&port) {
                    self.available_ports.push(name);
                }
            }
        }
    }

    pub fn list_ports(&self) -> &[String] {
        &self.available_ports
    }

    pub fn connected_port_name(&self) -> Option<&str> {
        self.connected_port_name.as_deref()
    }

    /// Connect to a MIDI input port by index.
    pub fn connect(&mut self, port_index: usize) -> Result<(), String> {
        self.disconnect();

        // MidiInput is consumed by connect(); recreate it afterwards for
        // future port listing
        let midi_in = MidiInput::new("midimap").map_err(|e| e.to_string())?;
        let ports = midi_in.ports();
        if port_index >= ports.len() {
            return Err(format!("Invalid port index: {}", port_index));
        }

        let port = &ports[port_index];
        let port_name = midi_in
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());

        let (tx, rx) = mpsc::channel();
        self.event_receiver = Some(rx);

        let connection = midi_in
            .connect(
                port,
                "midimap-input",
                move |_timestamp, message, _| {
                    if let Some(event) = parse_midi_message(message) {
                        let _ = tx.send(event);
                    }
                },
                (),
            )
            .map_err(|e| e.to_string())?;

        self.connection = Some(connection);
        self.connected_port_name = Some(port_name);
        self.midi_in = MidiInput::new("midimap").ok();

        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.close();
        }
        self.event_receiver = None;
        self.connected_port_name = None;
    }

    /// Poll for a single decoded event (non-blocking).
    pub fn poll_event(&self) -> Option<MidiEvent> {
        self.event_receiver.as_ref()?.try_recv().ok()
    }
}

impl Default for MidiInputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MidiInputManager {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Decode a raw MIDI message into an engine event. Note Off (and Note On
/// with velocity 0), aftertouch, pitch bend, and system messages return
/// `None` — the remapper only models CC, PC, and Note.
fn parse_midi_message(data: &[u8]) -> Option<MidiEvent> {
    if data.is_empty() {
        return None;
    }

    match data[0] & 0xF0 {
        0xB0 if data.len() >= 3 => Some(MidiEvent::cc(data[1], data[2])),
        0xC0 if data.len() >= 2 => Some(MidiEvent::pc(data[1])),
        0x90 if data.len() >= 3 && data[2] > 0 => Some(MidiEvent::note(data[1], data[2])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_control_change() {
        let event = parse_midi_message(&[0xB0, 12, 123]).unwrap();
        assert_eq!(event, MidiEvent::cc(12, 123));
    }

    #[test]
    fn test_parse_program_change() {
        let event = parse_midi_message(&[0xC0, 5]).unwrap();
        assert_eq!(event, MidiEvent::pc(5));
    }

    #[test]
    fn test_parse_note_on() {
        let event = parse_midi_message(&[0x90, 60, 100]).unwrap();
        assert_eq!(event, MidiEvent::note(60, 100));
    }

    #[test]
    fn test_channel_is_ignored() {
        // channel 3 CC decodes the same as channel 0
        let event = parse_midi_message(&[0xB3, 12, 64]).unwrap();
        assert_eq!(event, MidiEvent::cc(12, 64));
    }

    #[test]
    fn test_note_off_is_ignored() {
        assert!(parse_midi_message(&[0x80, 60, 0]).is_none());
        assert!(parse_midi_message(&[0x90, 60, 0]).is_none());
    }

    #[test]
    fn test_short_and_unknown_messages_are_ignored() {
        assert!(parse_midi_message(&[]).is_none());
        assert!(parse_midi_message(&[0xB0, 12]).is_none());
        assert!(parse_midi_message(&[0xC0]).is_none());
        assert!(parse_midi_message(&[0xE0, 0x00, 0x40]).is_none());
        assert!(parse_midi_message(&[0xF0, 0x01]).is_none());
    }
}
