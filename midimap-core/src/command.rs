//! Line-oriented command grammar.
//!
//! One decoded text line per invocation; parsing never panics and never
//! mutates state. Execution lives in [`crate::session::Session`].

use std::fmt;

use midimap_types::MidiEvent;

/// A decoded command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Inject one event into the resolver (`cc_<n>_<v>`, `pc_<n>`,
    /// `nn_<n>_<v>`).
    Send(MidiEvent),
    /// `map` — toggle mapping on/off.
    ToggleMapping,
    /// `demo` — toggle the demo generator.
    ToggleDemo,
    /// `loadmap` — reload the mapping table from configuration.
    LoadMap,
    /// `showmap` — render the active table.
    ShowMap,
    /// `help` / `?`.
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Recognized command shape with a bad argument (out of 0-127, not a
    /// number, wrong arity).
    Validation(String),
    /// Line did not match any known command.
    Unknown(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Validation(msg) => write!(f, "invalid command: {}", msg),
            CommandError::Unknown(line) => write!(f, "unknown command: {}", line),
        }
    }
}

impl Command {
    /// Parse one trimmed input line.
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let line = line.trim();
        match line {
            "map" => return Ok(Command::ToggleMapping),
            "demo" => return Ok(Command::ToggleDemo),
            "loadmap" => return Ok(Command::LoadMap),
            "showmap" => return Ok(Command::ShowMap),
            "help" | "?" => return Ok(Command::Help),
            _ => {}
        }

        let parts: Vec<&str> = line.split('_').collect();
        match parts.as_slice() {
            ["cc", number, value] => Ok(Command::Send(MidiEvent::cc(
                parse_arg(number)?,
                parse_arg(value)?,
            ))),
            ["pc", number] => Ok(Command::Send(MidiEvent::pc(parse_arg(number)?))),
            ["nn", number, value] => Ok(Command::Send(MidiEvent::note(
                parse_arg(number)?,
                parse_arg(value)?,
            ))),
            ["cc", ..] => Err(CommandError::Validation(
                "usage: cc_<number>_<value>".into(),
            )),
            ["pc", ..] => Err(CommandError::Validation("usage: pc_<number>".into())),
            ["nn", ..] => Err(CommandError::Validation(
                "usage: nn_<note>_<velocity>".into(),
            )),
            _ => Err(CommandError::Unknown(line.to_string())),
        }
    }
}

fn parse_arg(text: &str) -> Result<u8, CommandError> {
    match text.parse::<u16>() {
        Ok(n) if n <= 127 => Ok(n as u8),
        Ok(n) => Err(CommandError::Validation(format!(
            "{} is out of range 0-127",
            n
        ))),
        Err(_) => Err(CommandError::Validation(format!(
            "{:?} is not a number",
            text
        ))),
    }
}

/// Command summary for `help` / `?`.
pub fn help_lines() -> Vec<String> {
    [
        "cc_<n>_<v>   send a Control Change (0-127 each)",
        "pc_<n>       send a Program Change",
        "nn_<n>_<v>   send a Note",
        "map          toggle mapping",
        "demo         toggle the demo generator",
        "loadmap      reload the mapping table",
        "showmap      list the active mappings",
        "help, ?      this summary",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
