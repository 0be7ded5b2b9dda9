//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, JSON files on native)
//! - Image assets (decoded on web, assumed present headless)

pub mod assets;
pub mod storage;

pub use assets::{AssetGate, SpriteId, SpriteSet};
pub use storage::{MemoryStorage, Storage, load_json, save_json};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
