//! Data-driven game balance
//!
//! Everything here is fixed for the lifetime of a session. Values can be
//! overridden from JSON at startup; anything missing falls back to `consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::ms_to_ticks;
use crate::sim::tiers::TIER_COUNT;

/// Longest accepted timer (one hour)
pub const MAX_TIMER_MS: u64 = 60 * 60 * 1000;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Play field size
    pub field_width: f32,
    pub field_height: f32,
    /// Warning line Y (y grows downward)
    pub warning_line_y: f32,
    /// Pieces below this speed (pixels/s) are considered settled
    pub stable_speed_threshold: f32,

    // === Timers (milliseconds) ===
    pub immunity_ms: u64,
    pub drop_cooldown_ms: u64,
    pub warning_countdown_ms: u64,

    // === Spawning ===
    /// Number of low tiers new pieces are drawn from
    pub spawn_tier_count: u8,
    /// Gap kept between a hovering piece and the warning line
    pub hover_margin: f32,

    // === Physics ===
    pub gravity: f32,
    pub restitution: f32,
    pub friction: f32,
    pub wall_thickness: f32,
    pub ground_height: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            warning_line_y: WARNING_LINE_Y,
            stable_speed_threshold: STABLE_SPEED_THRESHOLD,

            immunity_ms: IMMUNITY_MS,
            drop_cooldown_ms: DROP_COOLDOWN_MS,
            warning_countdown_ms: WARNING_COUNTDOWN_MS,

            spawn_tier_count: SPAWN_TIER_COUNT,
            hover_margin: 4.0,

            gravity: 980.0,
            restitution: 0.3,
            friction: 0.2,
            wall_thickness: 20.0,
            ground_height: 40.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Parse tuning, falling back to defaults on malformed input
    pub fn load(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(tuning)) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Invalid tuning ({}), using defaults", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Clamp values that would break the rules layer
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.field_width > 0.0) || !(self.field_height > 0.0) {
            log::warn!(
                "Field size {}x{} is invalid, using defaults",
                self.field_width,
                self.field_height
            );
            self.field_width = defaults.field_width;
            self.field_height = defaults.field_height;
        }
        if !(0.0..self.field_height).contains(&self.warning_line_y) {
            log::warn!("Warning line {} outside field, using default", self.warning_line_y);
            self.warning_line_y = defaults.warning_line_y.min(self.field_height / 2.0);
        }
        let max_spawn = TIER_COUNT as u8;
        if self.spawn_tier_count == 0 || self.spawn_tier_count > max_spawn {
            log::warn!(
                "spawn_tier_count {} out of range 1..={}, clamping",
                self.spawn_tier_count,
                max_spawn
            );
            self.spawn_tier_count = self.spawn_tier_count.clamp(1, max_spawn);
        }
        if !(self.stable_speed_threshold >= 0.0) {
            log::warn!(
                "Stable speed threshold {} is invalid, using default",
                self.stable_speed_threshold
            );
            self.stable_speed_threshold = defaults.stable_speed_threshold;
        }
        for (name, ms) in [
            ("immunity_ms", &mut self.immunity_ms),
            ("drop_cooldown_ms", &mut self.drop_cooldown_ms),
            ("warning_countdown_ms", &mut self.warning_countdown_ms),
        ] {
            if *ms > MAX_TIMER_MS {
                log::warn!("{} {} exceeds {}, clamping", name, ms, MAX_TIMER_MS);
                *ms = MAX_TIMER_MS;
            }
        }
        self.hover_margin = self.hover_margin.max(0.0);
        self.restitution = self.restitution.clamp(0.0, 1.0);
        self.friction = self.friction.clamp(0.0, 1.0);
        self
    }

    pub fn immunity_ticks(&self) -> u64 {
        ms_to_ticks(self.immunity_ms)
    }

    pub fn drop_cooldown_ticks(&self) -> u64 {
        ms_to_ticks(self.drop_cooldown_ms)
    }

    pub fn warning_countdown_ticks(&self) -> u64 {
        ms_to_ticks(self.warning_countdown_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "spawn_tier_count": 5 }"#).unwrap();
        assert_eq!(tuning.spawn_tier_count, 5);
        assert_eq!(tuning.warning_line_y, WARNING_LINE_Y);
        assert_eq!(tuning.immunity_ticks(), 180);
    }

    #[test]
    fn test_load_falls_back_on_garbage() {
        assert_eq!(Tuning::load(Some("not json")), Tuning::default());
        assert_eq!(Tuning::load(None), Tuning::default());
    }

    #[test]
    fn test_sanitize_clamps_spawn_range() {
        let tuning = Tuning {
            spawn_tier_count: 0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tuning.spawn_tier_count, 1);

        let tuning = Tuning {
            spawn_tier_count: 200,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tuning.spawn_tier_count, TIER_COUNT as u8);
    }

    #[test]
    fn test_sanitize_clamps_huge_timers() {
        let tuning = Tuning::from_json(r#"{ "immunity_ms": 200000000000000000 }"#)
            .unwrap()
            .sanitized();
        assert_eq!(tuning.immunity_ms, MAX_TIMER_MS);
        assert_eq!(tuning.immunity_ticks(), MAX_TIMER_MS / 1000 * SIM_HZ);
        assert_eq!(tuning.drop_cooldown_ms, DROP_COOLDOWN_MS);
    }

    #[test]
    fn test_tick_conversion_saturates() {
        assert_eq!(ms_to_ticks(u64::MAX), u64::MAX.div_ceil(1000));
    }

    #[test]
    fn test_sanitize_rejects_nan_speed_threshold() {
        let tuning = Tuning {
            stable_speed_threshold: f32::NAN,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tuning.stable_speed_threshold, STABLE_SPEED_THRESHOLD);
    }

    #[test]
    fn test_sanitize_moves_line_inside_field() {
        let tuning = Tuning {
            warning_line_y: -5.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tuning.warning_line_y, WARNING_LINE_Y);
    }
}
