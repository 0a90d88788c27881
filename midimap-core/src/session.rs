//! Session state and command execution.
//!
//! `Session` owns the active table and runtime mode; `execute` is the
//! single mutation point. The resolver itself stays pure — the session just
//! hands it the current table and mapping flag.

use midimap_types::{MidiEvent, RuntimeMode};

use crate::command::{help_lines, Command};
use crate::config::Config;
use crate::resolve::{resolve, Resolution};
use crate::table::MappingTable;

/// One resolved event, kept for the display collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEvent {
    pub input: MidiEvent,
    pub outputs: Vec<MidiEvent>,
    pub mapped: bool,
}

/// What a command produced: status text for the echo channel, plus the
/// resolved event when the command injected one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    pub lines: Vec<String>,
    pub resolved: Option<ResolvedEvent>,
}

impl CommandOutcome {
    fn status(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            resolved: None,
        }
    }
}

pub struct Session {
    config: Config,
    table: MappingTable,
    pub mode: RuntimeMode,
}

impl Session {
    /// Start with an empty table; callers issue `Command::LoadMap` to pull
    /// in the configured mapping, so startup and reload share one path.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            table: MappingTable::default(),
            mode: RuntimeMode::default(),
        }
    }

    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    /// Resolve one event under the current table and mode.
    pub fn resolve_event(&self, event: &MidiEvent) -> Resolution {
        resolve(event, &self.table, self.mode.mapping_enabled)
    }

    /// Execute one decoded command. Never panics; the only state touched is
    /// the table (on `LoadMap`) and the mode flags.
    pub fn execute(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::Send(event) => {
                let resolution = self.resolve_event(&event);
                CommandOutcome {
                    lines: vec![echo_line(&resolution)],
                    resolved: Some(ResolvedEvent {
                        input: event,
                        outputs: resolution.outputs,
                        mapped: resolution.mapped,
                    }),
                }
            }
            Command::ToggleMapping => {
                self.mode.mapping_enabled = !self.mode.mapping_enabled;
                CommandOutcome::status(if self.mode.mapping_enabled {
                    "mapping on"
                } else {
                    "mapping off"
                })
            }
            Command::ToggleDemo => {
                self.mode.demo_enabled = !self.mode.demo_enabled;
                CommandOutcome::status(if self.mode.demo_enabled {
                    "demo on"
                } else {
                    "demo off"
                })
            }
            Command::LoadMap => {
                let (source, origin) = self.config.map_source();
                match MappingTable::parse(&source) {
                    Ok(table) => {
                        self.table = table;
                        CommandOutcome::status(format!(
                            "loaded {} mappings from {}",
                            self.table.len(),
                            origin
                        ))
                    }
                    Err(e) => {
                        // previous table stays active; mapping stays off
                        // until a clean reload
                        self.mode.mapping_enabled = false;
                        log::warn!(target: "mapping", "map load failed ({}): {}", origin, e);
                        CommandOutcome::status(format!(
                            "map load failed, keeping previous table (mapping off): {}",
                            first_line(&e.to_string())
                        ))
                    }
                }
            }
            Command::ShowMap => {
                if self.table.is_empty() {
                    CommandOutcome::status("map is empty")
                } else {
                    let mut lines = vec![format!("{} mappings:", self.table.len())];
                    lines.extend(self.table.render_lines());
                    CommandOutcome {
                        lines,
                        resolved: None,
                    }
                }
            }
            Command::Help => CommandOutcome {
                lines: help_lines(),
                resolved: None,
            },
        }
    }
}

/// Echo for a resolved event: all outputs comma-joined ("CC16:123",
/// "PC5", "E4:64").
fn echo_line(resolution: &Resolution) -> String {
    if resolution.outputs.is_empty() {
        return "(no output)".to_string();
    }
    let joined: Vec<String> = resolution.outputs.iter().map(|e| e.label()).collect();
    joined.join(", ")
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or(text)
}
