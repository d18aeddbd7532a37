//! Fruit Merge - a physics-driven merging game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tiers, physics seam, merge and loss rules)
//! - `render`: Renderer-facing scene snapshot and HUD view
//! - `tuning`: Data-driven game balance

pub mod render;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Simulation ticks per second
    pub const SIM_HZ: u64 = 120;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Warning line (y grows downward)
    pub const WARNING_LINE_Y: f32 = 100.0;

    /// Pieces slower than this (pixels/s) count as settled
    pub const STABLE_SPEED_THRESHOLD: f32 = 30.0;

    /// Loss-immunity after a drop
    pub const IMMUNITY_MS: u64 = 1500;
    /// Delay between a drop and the next spawn
    pub const DROP_COOLDOWN_MS: u64 = 800;
    /// How long a settled piece may sit above the line
    pub const WARNING_COUNTDOWN_MS: u64 = 3000;

    /// Spawns pick uniformly from tiers `0..SPAWN_TIER_COUNT`
    pub const SPAWN_TIER_COUNT: u8 = 4;
}

/// Convert a duration in milliseconds to whole simulation ticks (rounded up)
#[inline]
pub fn ms_to_ticks(ms: u64) -> u64 {
    ms.saturating_mul(consts::SIM_HZ).div_ceil(1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(0), 0);
        assert_eq!(ms_to_ticks(1500), 180);
        assert_eq!(ms_to_ticks(800), 96);
        assert_eq!(ms_to_ticks(3000), 360);
        // Partial ticks round up
        assert_eq!(ms_to_ticks(1), 1);
    }
}
