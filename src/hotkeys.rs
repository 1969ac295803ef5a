//! Key bindings for the edit session.
//!
//! The backend reports raw key characters; [`KeyBindings`] maps them to
//! session [`Action`]s. Bindings are case-insensitive, serde-serializable
//! and can be persisted to `~/.phasepick/bindings.yaml` so operators keep
//! their layout across sessions. Defaults follow the classic layout:
//! `Z`/`Y` mark, `G` gravity, `F` filter, `D` delete, `L`/`H` corner
//! frequencies, `Q` quit.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// A session action triggered by a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Set the pick at the pointer position (refined when gravity is on).
    Mark,
    /// Flip the auto-refinement mode.
    ToggleGravity,
    /// Flip band-pass filtering of the displayed/refined signal.
    ToggleFilter,
    /// Clear the pick. The pointer position is ignored.
    DeleteMark,
    /// Prompt for a new low corner frequency.
    EnterLowCorner,
    /// Prompt for a new high corner frequency.
    EnterHighCorner,
    /// Leave the edit session.
    Quit,
}

/// Keyboard layout of the session. Two keys map to [`Action::Mark`] so
/// both hands can reach a mark key next to the pointer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub mark: char,
    pub mark_alt: char,
    pub toggle_gravity: char,
    pub toggle_filter: char,
    pub delete_mark: char,
    pub low_corner: char,
    pub high_corner: char,
    pub quit: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            mark: 'Z',
            mark_alt: 'Y',
            toggle_gravity: 'G',
            toggle_filter: 'F',
            delete_mark: 'D',
            low_corner: 'L',
            high_corner: 'H',
            quit: 'Q',
        }
    }
}

impl KeyBindings {
    /// Resolve a raw key character (any case) to an action.
    pub fn action_for(&self, key: char) -> Option<Action> {
        let key = key.to_ascii_uppercase();
        let matches = |bound: char| bound.to_ascii_uppercase() == key;
        if matches(self.mark) || matches(self.mark_alt) {
            Some(Action::Mark)
        } else if matches(self.toggle_gravity) {
            Some(Action::ToggleGravity)
        } else if matches(self.toggle_filter) {
            Some(Action::ToggleFilter)
        } else if matches(self.delete_mark) {
            Some(Action::DeleteMark)
        } else if matches(self.low_corner) {
            Some(Action::EnterLowCorner)
        } else if matches(self.high_corner) {
            Some(Action::EnterHighCorner)
        } else if matches(self.quit) {
            Some(Action::Quit)
        } else {
            None
        }
    }

    pub fn reset_defaults(&mut self) {
        *self = KeyBindings::default();
    }

    pub fn save_to_default_path(&self) -> Result<(), String> {
        let home = std::env::var("HOME").map_err(|e| format!("HOME env var not set: {}", e))?;
        let dir = PathBuf::from(home).join(".phasepick");
        if let Err(e) = fs::create_dir_all(&dir) {
            return Err(format!("Failed to create dir {:?}: {}", dir, e));
        }
        let path = dir.join("bindings.yaml");
        let s = serde_yaml::to_string(self).map_err(|e| format!("Serialization error: {}", e))?;
        let mut f = fs::File::create(&path)
            .map_err(|e| format!("Failed to create file {:?}: {}", path, e))?;
        f.write_all(s.as_bytes())
            .map_err(|e| format!("Failed to write file {:?}: {}", path, e))?;
        Ok(())
    }

    pub fn load_from_default_path() -> Result<KeyBindings, String> {
        let home = std::env::var("HOME").map_err(|e| format!("HOME env var not set: {}", e))?;
        let path = PathBuf::from(home).join(".phasepick").join("bindings.yaml");
        if !path.exists() {
            return Err(format!("Bindings file {:?} does not exist", path));
        }
        let s =
            fs::read_to_string(&path).map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
        let kb: KeyBindings =
            serde_yaml::from_str(&s).map_err(|e| format!("Deserialization error: {}", e))?;
        Ok(kb)
    }
}
