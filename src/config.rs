//! Session configuration shared across editing sessions.
//!
//! Groups the key bindings, initial band-pass corners and the search
//! parameters of the refiner. Serializable to YAML under
//! `~/.phasepick/config.yaml` with the same load/save conventions as
//! [`crate::hotkeys::KeyBindings`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::filter::FilterParams;
use crate::hotkeys::KeyBindings;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Keyboard layout.
    pub bindings: KeyBindings,
    /// Initial band-pass corner frequencies.
    pub filter: FilterParams,
    /// Whether filtering starts enabled.
    pub filter_enabled: bool,
    /// Whether gravity (auto-refinement of clicks) starts enabled.
    pub gravity_enabled: bool,
    /// Maximum half-width of the extremum search window, in seconds.
    pub half_window: f64,
    /// Seconds shown before the anchor when seeding a view window around
    /// a phase marker.
    pub pre_phase: f64,
    /// Seconds shown after the anchor.
    pub post_phase: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bindings: KeyBindings::default(),
            filter: FilterParams::default(),
            filter_enabled: false,
            gravity_enabled: true,
            half_window: 2.0,
            pre_phase: 10.0,
            post_phase: 30.0,
        }
    }
}

impl SessionConfig {
    pub fn save_to_default_path(&self) -> Result<(), String> {
        let home = std::env::var("HOME").map_err(|e| format!("HOME env var not set: {}", e))?;
        let dir = PathBuf::from(home).join(".phasepick");
        if let Err(e) = fs::create_dir_all(&dir) {
            return Err(format!("Failed to create dir {:?}: {}", dir, e));
        }
        let path = dir.join("config.yaml");
        let s = serde_yaml::to_string(self).map_err(|e| format!("Serialization error: {}", e))?;
        let mut f = fs::File::create(&path)
            .map_err(|e| format!("Failed to create file {:?}: {}", path, e))?;
        f.write_all(s.as_bytes())
            .map_err(|e| format!("Failed to write file {:?}: {}", path, e))?;
        Ok(())
    }

    pub fn load_from_default_path() -> Result<SessionConfig, String> {
        let home = std::env::var("HOME").map_err(|e| format!("HOME env var not set: {}", e))?;
        let path = PathBuf::from(home).join(".phasepick").join("config.yaml");
        if !path.exists() {
            return Err(format!("Config file {:?} does not exist", path));
        }
        let s =
            fs::read_to_string(&path).map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
        let cfg: SessionConfig =
            serde_yaml::from_str(&s).map_err(|e| format!("Deserialization error: {}", e))?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = SessionConfig::default();
        assert!(cfg.gravity_enabled);
        assert!(!cfg.filter_enabled);
        assert_eq!(cfg.half_window, 2.0);
        assert!(cfg.filter.low_hz < cfg.filter.high_hz);
    }

    #[test]
    fn yaml_round_trip_preserves_bindings() {
        let mut cfg = SessionConfig::default();
        cfg.bindings.quit = 'X';
        cfg.half_window = 1.5;
        let s = serde_yaml::to_string(&cfg).unwrap();
        let back: SessionConfig = serde_yaml::from_str(&s).unwrap();
        assert_eq!(back.bindings.quit, 'X');
        assert_eq!(back.half_window, 1.5);
    }
}
