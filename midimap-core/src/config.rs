//! Mapping source selection: embedded default with an optional user
//! override under the config directory.

use std::path::PathBuf;

const DEFAULT_MAP: &str = include_str!("../default_map.toml");

/// Where the mapping document comes from.
pub struct Config {
    user_map_path: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            user_map_path: user_map_path(),
        }
    }

    /// Use an explicit mapping file instead of the default lookup path.
    pub fn with_map_path(path: PathBuf) -> Self {
        Self {
            user_map_path: Some(path),
        }
    }

    /// The mapping document to load, plus a short origin label for
    /// reporting. Falls back to the embedded default when no user file
    /// exists or it cannot be read.
    pub fn map_source(&self) -> (String, String) {
        if let Some(path) = &self.user_map_path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => return (contents, path.display().to_string()),
                    Err(e) => {
                        log::warn!(target: "config", "could not read map {}: {}", path.display(), e)
                    }
                }
            }
        }
        (DEFAULT_MAP.to_string(), "built-in".to_string())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn user_map_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("midimap").join("map.toml"))
}
