//! Draw list generation
//!
//! Turns a [`GameState`] into an ordered list of rectangles and sprites.
//! Backend-agnostic so it can be checked without a canvas.

use crate::platform::assets::{SpriteId, SpriteSet};
use crate::sim::{GameState, Owner, Rect};

/// Flat fill colours (CSS names, matching the canvas API)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Player,
    PlayerBullet,
    Enemy,
    EnemyBullet,
}

impl Color {
    pub fn css(&self) -> &'static str {
        match self {
            Color::Player => "lime",
            Color::PlayerBullet => "lime",
            Color::Enemy => "red",
            Color::EnemyBullet => "orange",
        }
    }
}

/// One draw operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCmd {
    Fill { rect: Rect, color: Color },
    Sprite { rect: Rect, sprite: SpriteId },
}

/// Build the frame: player, player bullets, enemies, enemy bullets.
///
/// Sprite variants draw the ship and invaders as images; an image that
/// failed to load means that entity is simply not drawn.
pub fn build_scene(state: &GameState, sprites: SpriteSet) -> Vec<DrawCmd> {
    let mut cmds = Vec::with_capacity(1 + state.bullets.len() + state.enemies.len());
    let use_sprites = state.config.uses_sprites;

    let body = |rect: Rect, sprite: SpriteId, color: Color| -> Option<DrawCmd> {
        if !use_sprites {
            Some(DrawCmd::Fill { rect, color })
        } else if sprites.has(sprite) {
            Some(DrawCmd::Sprite { rect, sprite })
        } else {
            None
        }
    };

    cmds.extend(body(state.player.rect(), SpriteId::Player, Color::Player));
    cmds.extend(state.bullets_of(Owner::Player).map(|b| DrawCmd::Fill {
        rect: b.rect(),
        color: Color::PlayerBullet,
    }));
    cmds.extend(
        state
            .enemies
            .iter()
            .filter_map(|e| body(e.rect(), SpriteId::Enemy, Color::Enemy)),
    );
    cmds.extend(state.bullets_of(Owner::Enemy).map(|b| DrawCmd::Fill {
        rect: b.rect(),
        color: Color::EnemyBullet,
    }));

    cmds
}
