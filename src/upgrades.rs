//! Permanent upgrades bought with banked score
//!
//! Levels are stored in [`Upgrades`]; everything gameplay needs is derived
//! from them through [`Upgrades::stats`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ShopError;
use crate::variant::VariantConfig;

/// Something the shop sells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopItem {
    DoubleShot,
    FireRate,
    ExtraLife,
    BulletSpeed,
    SideShot,
}

impl ShopItem {
    pub const ALL: [ShopItem; 5] = [
        ShopItem::DoubleShot,
        ShopItem::FireRate,
        ShopItem::ExtraLife,
        ShopItem::BulletSpeed,
        ShopItem::SideShot,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShopItem::DoubleShot => "Double Shot",
            ShopItem::FireRate => "Increased Fire Rate",
            ShopItem::ExtraLife => "Extra Life",
            ShopItem::BulletSpeed => "Bullet Speed",
            ShopItem::SideShot => "Sideways Shot",
        }
    }

    /// DOM id suffix used by the shop buttons
    pub fn slug(&self) -> &'static str {
        match self {
            ShopItem::DoubleShot => "double-shot",
            ShopItem::FireRate => "fire-rate",
            ShopItem::ExtraLife => "extra-life",
            ShopItem::BulletSpeed => "bullet-speed",
            ShopItem::SideShot => "side-shot",
        }
    }

    /// Price of the first level
    pub fn base_cost(&self) -> u64 {
        match self {
            ShopItem::DoubleShot => DOUBLE_SHOT_COST,
            ShopItem::FireRate => FIRE_RATE_BASE_COST,
            ShopItem::ExtraLife => EXTRA_LIFE_BASE_COST,
            ShopItem::BulletSpeed => BULLET_SPEED_BASE_COST,
            ShopItem::SideShot => SIDE_SHOT_COST,
        }
    }

    /// Highest purchasable level (1 for one-off items)
    pub fn max_level(&self) -> u8 {
        match self {
            ShopItem::DoubleShot | ShopItem::SideShot => 1,
            ShopItem::FireRate => MAX_FIRE_RATE_LEVEL,
            ShopItem::ExtraLife => MAX_LIVES_LEVEL,
            ShopItem::BulletSpeed => MAX_BULLET_SPEED_LEVEL,
        }
    }

    /// Price to go from `level` to `level + 1`
    pub fn cost_at(&self, level: u8) -> u64 {
        self.base_cost() * (level as u64 + 1)
    }
}

/// Purchased upgrade levels (persisted)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Upgrades {
    pub double_shot: bool,
    pub fire_rate_level: u8,
    pub lives_level: u8,
    pub bullet_speed_level: u8,
    pub side_shot: bool,
}

impl Upgrades {
    /// Current level of `item` (0/1 for one-off items)
    pub fn level(&self, item: ShopItem) -> u8 {
        match item {
            ShopItem::DoubleShot => self.double_shot as u8,
            ShopItem::FireRate => self.fire_rate_level,
            ShopItem::ExtraLife => self.lives_level,
            ShopItem::BulletSpeed => self.bullet_speed_level,
            ShopItem::SideShot => self.side_shot as u8,
        }
    }

    /// Price of the next level, `None` when maxed out
    pub fn next_cost(&self, item: ShopItem) -> Option<u64> {
        let level = self.level(item);
        (level < item.max_level()).then(|| item.cost_at(level))
    }

    /// Buy the next level of `item`, paying from `bank`.
    ///
    /// On success exactly the returned cost has been deducted. On failure
    /// neither the bank nor the levels change.
    pub fn purchase(
        &mut self,
        item: ShopItem,
        bank: &mut u64,
        variant: &VariantConfig,
    ) -> Result<u64, ShopError> {
        if !variant.offers(item) {
            return Err(ShopError::NotOffered(item));
        }
        let cost = match self.next_cost(item) {
            Some(cost) => cost,
            None if item.max_level() == 1 => return Err(ShopError::AlreadyOwned(item)),
            None => {
                return Err(ShopError::MaxLevel {
                    item,
                    max: item.max_level(),
                });
            }
        };
        if *bank < cost {
            return Err(ShopError::InsufficientScore {
                cost,
                available: *bank,
            });
        }

        *bank -= cost;
        match item {
            ShopItem::DoubleShot => self.double_shot = true,
            ShopItem::FireRate => self.fire_rate_level += 1,
            ShopItem::ExtraLife => self.lives_level += 1,
            ShopItem::BulletSpeed => self.bullet_speed_level += 1,
            ShopItem::SideShot => self.side_shot = true,
        }
        Ok(cost)
    }

    /// Clamp levels that came from storage into their legal ranges
    pub fn sanitize(&mut self) {
        self.fire_rate_level = self.fire_rate_level.min(MAX_FIRE_RATE_LEVEL);
        self.lives_level = self.lives_level.min(MAX_LIVES_LEVEL);
        self.bullet_speed_level = self.bullet_speed_level.min(MAX_BULLET_SPEED_LEVEL);
    }

    /// Gameplay stats for these levels under `variant`
    pub fn stats(&self, variant: &VariantConfig) -> PlayerStats {
        PlayerStats {
            fire_cooldown_ms: fire_cooldown_ms(self.fire_rate_level),
            bullet_speed: bullet_speed(self.bullet_speed_level),
            max_lives: variant.base_lives + self.lives_level as u32,
            double_shot: self.double_shot,
            side_shot: self.side_shot,
        }
    }
}

/// Derived player stats consumed by the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStats {
    pub fire_cooldown_ms: f64,
    pub bullet_speed: f32,
    pub max_lives: u32,
    pub double_shot: bool,
    pub side_shot: bool,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Upgrades::default().stats(&VariantConfig::default())
    }
}

/// Player fire cooldown for a fire-rate level (non-increasing, floored)
pub fn fire_cooldown_ms(level: u8) -> f64 {
    (BASE_FIRE_COOLDOWN_MS - FIRE_COOLDOWN_STEP_MS * level as f64).max(MIN_FIRE_COOLDOWN_MS)
}

/// Player bullet speed for a bullet-speed level
pub fn bullet_speed(level: u8) -> f32 {
    PLAYER_BULLET_SPEED + BULLET_SPEED_STEP * level as f32
}
