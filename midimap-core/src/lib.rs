//! # midimap-core
//!
//! Engine library for the midimap remapper: mapping table construction from
//! the declarative TOML source, pure event resolution, the line command
//! grammar, and session state — independent of any UI.
//!
//! ```rust,ignore
//! use midimap_core::command::Command;
//! use midimap_core::config::Config;
//! use midimap_core::session::Session;
//!
//! let mut session = Session::new(Config::new());
//! session.execute(Command::LoadMap);
//! let outcome = session.execute(Command::parse("cc_12_123").unwrap());
//! ```

pub mod command;
pub mod config;
pub mod resolve;
pub mod session;
pub mod table;
