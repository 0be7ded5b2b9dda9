//! Rendering module
//!
//! The scene builder produces a draw list; the canvas backend executes it.

pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use scene::{Color, DrawCmd, build_scene};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
