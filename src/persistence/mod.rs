//! Save data: banked score and purchased upgrades
//!
//! Stored as one JSON object under [`SAVE_KEY`] and rewritten wholesale on
//! every change. Loading never fails: each field is decoded on its own, so a
//! missing or mistyped field only resets that field, and an unreadable blob
//! resets everything.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StorageError;
use crate::platform::storage::{Storage, save_json};
use crate::upgrades::Upgrades;

/// Storage key for the save blob
pub const SAVE_KEY: &str = "canvas_invaders_save";

/// Everything that survives between sessions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    /// Spendable score bank
    pub score: u64,
    #[serde(flatten)]
    pub upgrades: Upgrades,
}

impl SaveData {
    /// Decode leniently, defaulting every field independently
    pub fn from_json(json: &str) -> Self {
        let value: Value = match serde_json::from_str(json) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) => {
                log::warn!("Save data is not an object, using defaults");
                return Self::default();
            }
            Err(e) => {
                log::warn!("Malformed save data ({e}), using defaults");
                return Self::default();
            }
        };

        let defaults = Upgrades::default();
        let mut upgrades = Upgrades {
            double_shot: field(&value, "double_shot").unwrap_or(defaults.double_shot),
            fire_rate_level: field(&value, "fire_rate_level").unwrap_or(defaults.fire_rate_level),
            lives_level: field(&value, "lives_level").unwrap_or(defaults.lives_level),
            bullet_speed_level: field(&value, "bullet_speed_level")
                .unwrap_or(defaults.bullet_speed_level),
            side_shot: field(&value, "side_shot").unwrap_or(defaults.side_shot),
        };
        upgrades.sanitize();

        Self {
            score: field(&value, "score").unwrap_or_default(),
            upgrades,
        }
    }

    /// Read from storage; absent or broken data yields defaults
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get_item(SAVE_KEY) {
            Ok(Some(json)) => {
                let save = Self::from_json(&json);
                log::info!(
                    "Loaded save: score {}, upgrades {:?}",
                    save.score,
                    save.upgrades
                );
                save
            }
            Ok(None) => {
                log::info!("No save found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}, starting fresh");
                Self::default()
            }
        }
    }

    /// Write the whole record
    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        save_json(storage, SAVE_KEY, self)?;
        log::debug!("Saved (score {})", self.score);
        Ok(())
    }
}

/// Decode one field, `None` when absent or of the wrong shape
fn field<T: DeserializeOwned>(value: &Value, key: &str) -> Option<T> {
    let raw = value.get(key)?;
    match serde_json::from_value(raw.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("Ignoring save field '{key}': {e}");
            None
        }
    }
}
