//! Static tier table
//!
//! Tier `i` fuses into tier `i + 1`. The last tier has no fusion target.

use serde::Serialize;

/// One entry of the fusion chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tier {
    pub index: u8,
    pub radius: f32,
    /// Texture path, resolved by the renderer
    pub asset: &'static str,
    pub name: &'static str,
    /// Fill used when the texture is unavailable (0xRRGGBB)
    pub color: u32,
}

pub const TIER_COUNT: usize = 11;

/// Radii grow strictly with the index
pub static TIERS: [Tier; TIER_COUNT] = [
    Tier { index: 0, radius: 6.0, asset: "assets/1.png", name: "Fruit 1", color: 0xf94144 },
    Tier { index: 1, radius: 10.0, asset: "assets/2.png", name: "Fruit 2", color: 0xf3722c },
    Tier { index: 2, radius: 18.0, asset: "assets/3.png", name: "Fruit 3", color: 0xf8961e },
    Tier { index: 3, radius: 24.0, asset: "assets/4.png", name: "Fruit 4", color: 0xf9844a },
    Tier { index: 4, radius: 35.0, asset: "assets/5.png", name: "Fruit 5", color: 0xf9c74f },
    Tier { index: 5, radius: 45.0, asset: "assets/6.png", name: "Fruit 6", color: 0x90be6d },
    Tier { index: 6, radius: 55.0, asset: "assets/7.png", name: "Fruit 7", color: 0x43aa8b },
    Tier { index: 7, radius: 65.0, asset: "assets/8.png", name: "Fruit 8", color: 0x4d908e },
    Tier { index: 8, radius: 75.0, asset: "assets/9.png", name: "Fruit 9", color: 0x577590 },
    Tier { index: 9, radius: 90.0, asset: "assets/10.png", name: "Fruit 10", color: 0x277da1 },
    Tier { index: 10, radius: 95.0, asset: "assets/11.png", name: "Fruit 11", color: 0x9b5de5 },
];

/// Highest tier index
pub const MAX_TIER: u8 = (TIER_COUNT - 1) as u8;

/// Look up a tier by index
#[inline]
pub fn tier(index: u8) -> Option<&'static Tier> {
    TIERS.get(index as usize)
}

/// Fusion target of `tier`, `None` for the terminal tier
#[inline]
pub fn next_tier(tier: &Tier) -> Option<&'static Tier> {
    tier.index.checked_add(1).and_then(self::tier)
}
