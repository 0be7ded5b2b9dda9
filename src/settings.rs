//! Player preferences
//!
//! Persisted separately from the save blob.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::platform::storage::{Storage, load_json, save_json};
use crate::variant::VariantKind;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Mode started on load
    pub variant: VariantKind,
    /// Show FPS counter
    pub show_fps: bool,
    /// Seed override for reproducible runs (random when unset)
    pub fixed_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: VariantKind::Classic,
            show_fps: false,
            fixed_seed: None,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "canvas_invaders_settings";

    /// Seed for the next run: the override if set, otherwise `fallback`
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.fixed_seed.unwrap_or(fallback)
    }

    /// Make `kind` the mode started on load and persist it.
    ///
    /// Returns whether the stored choice changed.
    pub fn remember_variant(
        &mut self,
        kind: VariantKind,
        storage: &mut dyn Storage,
    ) -> Result<bool, StorageError> {
        if self.variant == kind {
            return Ok(false);
        }
        self.variant = kind;
        self.save(storage)?;
        Ok(true)
    }

    pub fn load(storage: &dyn Storage) -> Self {
        match load_json(storage, Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        save_json(storage, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStorage;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(Settings::STORAGE_KEY, r#"{"variant": "Arsenal"}"#)
            .unwrap();
        let settings = Settings::load(&storage);
        assert_eq!(settings.variant, VariantKind::Arsenal);
        assert!(!settings.show_fps);
    }

    #[test]
    fn test_seed_override() {
        let mut settings = Settings::default();
        assert_eq!(settings.seed_or(9), 9);
        settings.fixed_seed = Some(3);
        assert_eq!(settings.seed_or(9), 3);
    }

    #[test]
    fn test_save_and_reload() {
        let mut storage = MemoryStorage::new();
        let settings = Settings {
            variant: VariantKind::Lives,
            show_fps: true,
            fixed_seed: Some(77),
        };
        settings.save(&mut storage).unwrap();
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_remember_variant_persists_choice() {
        let mut storage = MemoryStorage::new();
        let mut settings = Settings::load(&storage);

        assert_eq!(settings.remember_variant(VariantKind::Classic, &mut storage), Ok(false));
        assert!(storage.is_empty());

        assert_eq!(settings.remember_variant(VariantKind::Arsenal, &mut storage), Ok(true));
        assert_eq!(Settings::load(&storage).variant, VariantKind::Arsenal);
    }
}
