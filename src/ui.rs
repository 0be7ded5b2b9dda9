//! HUD and shop view-models
//!
//! Plain text/state derived from the session; the web glue copies these
//! into the DOM every frame.

use crate::persistence::SaveData;
use crate::sim::{GamePhase, GameState};
use crate::upgrades::ShopItem;
use crate::variant::VariantConfig;

/// Score/lives/level readout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    pub score: String,
    pub lives: String,
    pub level: String,
    /// Final score line, only while the run is over
    pub game_over: Option<String>,
}

impl HudView {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: format!("Score: {}", state.score),
            lives: format!("Lives: {}", state.lives),
            level: format!("Level: {}", state.difficulty.level + 1),
            game_over: (state.phase == GamePhase::GameOver)
                .then(|| format!("Final Score: {}", state.score)),
        }
    }
}

/// Whether a shop button can be pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopItemStatus {
    Affordable,
    TooExpensive,
    /// One-off item already bought
    Owned,
    MaxLevel,
}

/// One shop button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopItemView {
    pub item: ShopItem,
    pub label: String,
    /// Price of the next level, `None` once nothing is left to buy
    pub cost: Option<u64>,
    pub level: u8,
    pub max_level: u8,
    pub status: ShopItemStatus,
}

impl ShopItemView {
    pub fn enabled(&self) -> bool {
        self.status == ShopItemStatus::Affordable
    }
}

/// The whole shop panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopView {
    pub bank: String,
    pub items: Vec<ShopItemView>,
}

impl ShopView {
    pub fn build(save: &SaveData, variant: &VariantConfig) -> Self {
        let items = variant
            .shop
            .iter()
            .map(|&item| item_view(item, save))
            .collect();
        Self {
            bank: format!("Current Score: {}", save.score),
            items,
        }
    }
}

fn item_view(item: ShopItem, save: &SaveData) -> ShopItemView {
    let level = save.upgrades.level(item);
    let max_level = item.max_level();
    let cost = save.upgrades.next_cost(item);
    let one_off = max_level == 1;

    let (status, label) = match cost {
        None if one_off => (ShopItemStatus::Owned, format!("{} (Purchased)", item.name())),
        None => (ShopItemStatus::MaxLevel, format!("{} (Max Level)", item.name())),
        Some(cost) => {
            let status = if save.score >= cost {
                ShopItemStatus::Affordable
            } else {
                ShopItemStatus::TooExpensive
            };
            let label = if one_off {
                format!("{} ({} Score)", item.name(), cost)
            } else {
                format!("{} ({} Score) - Level {}/{}", item.name(), cost, level, max_level)
            };
            (status, label)
        }
    };

    ShopItemView {
        item,
        label,
        cost,
        level,
        max_level,
        status,
    }
}
