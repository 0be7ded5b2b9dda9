//! Game variants
//!
//! The shooter ships in a few flavours that differ only in scoring, starting
//! lives and which upgrades the shop sells. They all run the same core loop.

use serde::{Deserialize, Serialize};

use crate::upgrades::ShopItem;

/// Selectable game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VariantKind {
    /// One life, 100 points per kill, double shot + fire rate shop
    #[default]
    Classic,
    /// Multiple lives that can be extended in the shop
    Lives,
    /// Full shop: lives, bullet speed and sideways shots
    Arsenal,
}

impl VariantKind {
    pub const ALL: [VariantKind; 3] = [
        VariantKind::Classic,
        VariantKind::Lives,
        VariantKind::Arsenal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantKind::Classic => "Classic",
            VariantKind::Lives => "Lives",
            VariantKind::Arsenal => "Arsenal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(VariantKind::Classic),
            "lives" => Some(VariantKind::Lives),
            "arsenal" => Some(VariantKind::Arsenal),
            _ => None,
        }
    }

    pub fn config(self) -> VariantConfig {
        VariantConfig::for_kind(self)
    }
}

/// Tunables that distinguish one variant from another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantConfig {
    pub kind: VariantKind,
    /// Score awarded per enemy destroyed
    pub points_per_kill: u64,
    /// Lives at the start of a run before upgrades
    pub base_lives: u32,
    /// Items sold in the shop, in display order
    pub shop: Vec<ShopItem>,
    /// Draw player/enemies from images instead of flat rectangles
    pub uses_sprites: bool,
}

impl VariantConfig {
    pub fn for_kind(kind: VariantKind) -> Self {
        match kind {
            VariantKind::Classic => Self {
                kind,
                points_per_kill: 100,
                base_lives: 1,
                shop: vec![ShopItem::DoubleShot, ShopItem::FireRate],
                uses_sprites: false,
            },
            VariantKind::Lives => Self {
                kind,
                points_per_kill: 10,
                base_lives: 3,
                shop: vec![ShopItem::DoubleShot, ShopItem::FireRate, ShopItem::ExtraLife],
                uses_sprites: true,
            },
            VariantKind::Arsenal => Self {
                kind,
                points_per_kill: 10,
                base_lives: 3,
                shop: vec![
                    ShopItem::DoubleShot,
                    ShopItem::FireRate,
                    ShopItem::ExtraLife,
                    ShopItem::BulletSpeed,
                    ShopItem::SideShot,
                ],
                uses_sprites: true,
            },
        }
    }

    /// Whether the shop sells `item` in this variant
    pub fn offers(&self, item: ShopItem) -> bool {
        self.shop.contains(&item)
    }
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self::for_kind(VariantKind::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_names() {
        for kind in VariantKind::ALL {
            assert_eq!(VariantKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(VariantKind::parse("snake"), None);
    }

    #[test]
    fn test_classic_sells_only_base_upgrades() {
        let classic = VariantConfig::for_kind(VariantKind::Classic);
        assert!(classic.offers(ShopItem::DoubleShot));
        assert!(classic.offers(ShopItem::FireRate));
        assert!(!classic.offers(ShopItem::ExtraLife));
        assert!(!classic.offers(ShopItem::SideShot));
        assert_eq!(classic.points_per_kill, 100);
        assert_eq!(classic.base_lives, 1);
    }

    #[test]
    fn test_arsenal_sells_everything() {
        let arsenal = VariantKind::Arsenal.config();
        for item in ShopItem::ALL {
            assert!(arsenal.offers(item), "{:?} missing", item);
        }
    }
}
