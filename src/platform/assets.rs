//! Sprite assets
//!
//! Two images gate the start of sprite-based variants. A failed load is
//! logged and the game proceeds without that image.

use serde::{Deserialize, Serialize};

/// Images the game knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    Player,
    Enemy,
}

impl SpriteId {
    pub const ALL: [SpriteId; 2] = [SpriteId::Player, SpriteId::Enemy];

    pub fn path(&self) -> &'static str {
        match self {
            SpriteId::Player => "assets/player.png",
            SpriteId::Enemy => "assets/enemy.png",
        }
    }
}

/// Which sprites finished loading successfully
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpriteSet {
    pub player: bool,
    pub enemy: bool,
}

impl SpriteSet {
    /// Every sprite available (tests, headless)
    pub fn all() -> Self {
        Self {
            player: true,
            enemy: true,
        }
    }

    pub fn has(&self, id: SpriteId) -> bool {
        match id {
            SpriteId::Player => self.player,
            SpriteId::Enemy => self.enemy,
        }
    }

    pub fn set(&mut self, id: SpriteId, loaded: bool) {
        match id {
            SpriteId::Player => self.player = loaded,
            SpriteId::Enemy => self.enemy = loaded,
        }
    }
}

/// Completion counter over a fixed number of asset loads
#[derive(Debug, Clone, Default)]
pub struct AssetGate {
    expected: usize,
    loaded: usize,
    failed: usize,
    sprites: SpriteSet,
}

impl AssetGate {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            ..Default::default()
        }
    }

    /// Record one finished load; returns true when this completes the gate
    pub fn finish(&mut self, id: SpriteId, ok: bool) -> bool {
        if self.is_ready() {
            return false;
        }
        if ok {
            self.loaded += 1;
        } else {
            self.failed += 1;
            log::warn!("Failed to load {}, continuing without it", id.path());
        }
        self.sprites.set(id, ok);
        self.is_ready()
    }

    /// All loads have finished, successfully or not
    pub fn is_ready(&self) -> bool {
        self.loaded + self.failed >= self.expected
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn sprites(&self) -> SpriteSet {
        self.sprites
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{LoadedImages, load_images};

#[cfg(target_arch = "wasm32")]
mod web {
    use std::collections::HashMap;

    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlImageElement;

    use super::{AssetGate, SpriteId};

    /// Decoded images keyed by sprite
    #[derive(Default)]
    pub struct LoadedImages {
        pub images: HashMap<SpriteId, HtmlImageElement>,
    }

    /// Load every sprite, counting completions through an [`AssetGate`]
    pub async fn load_images() -> (AssetGate, LoadedImages) {
        let mut gate = AssetGate::new(SpriteId::ALL.len());
        let mut loaded = LoadedImages::default();

        for id in SpriteId::ALL {
            let image = match HtmlImageElement::new() {
                Ok(image) => image,
                Err(e) => {
                    log::warn!("Could not create image element: {:?}", e);
                    gate.finish(id, false);
                    continue;
                }
            };
            image.set_src(id.path());
            let ok = JsFuture::from(image.decode()).await.is_ok();
            if ok {
                loaded.images.insert(id, image);
            }
            gate.finish(id, ok);
        }

        log::info!(
            "Assets ready ({} of {} loaded)",
            SpriteId::ALL.len() - gate.failed(),
            SpriteId::ALL.len()
        );
        (gate, loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_waits_for_every_load() {
        let mut gate = AssetGate::new(2);
        assert!(!gate.is_ready());
        assert!(!gate.finish(SpriteId::Player, true));
        assert!(gate.finish(SpriteId::Enemy, true));
        assert!(gate.is_ready());
        assert_eq!(gate.sprites(), SpriteSet::all());
    }

    #[test]
    fn test_failed_load_still_completes_gate() {
        let mut gate = AssetGate::new(2);
        gate.finish(SpriteId::Player, false);
        assert!(gate.finish(SpriteId::Enemy, true));
        assert_eq!(gate.failed(), 1);
        assert!(!gate.sprites().has(SpriteId::Player));
        assert!(gate.sprites().has(SpriteId::Enemy));
    }

    #[test]
    fn test_extra_completions_are_ignored() {
        let mut gate = AssetGate::new(1);
        assert!(gate.finish(SpriteId::Player, true));
        assert!(!gate.finish(SpriteId::Enemy, true));
        assert!(!gate.sprites().has(SpriteId::Enemy));
    }
}
