//! Data-driven game balance
//!
//! `Tuning` holds every numeric constant the simulation reads. It can be
//! loaded from JSON so balance changes never touch code; `RoundConfig` is the
//! immutable per-round view derived from it for a given level.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Player sprite placement and hitbox
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub size: Vec2,
    /// Horizontal position as a fraction of screen width
    pub x_fraction: f32,
    /// Starting vertical position as a fraction of screen height
    pub y_fraction: f32,
    /// Hitbox scale relative to sprite size
    pub hitbox_scale: f32,
    /// Seconds of grace after the first obstacle hit
    pub invulnerability_secs: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            x_fraction: PLAYER_X_FRACTION,
            y_fraction: PLAYER_Y_FRACTION,
            hitbox_scale: PLAYER_HITBOX_SCALE,
            invulnerability_secs: INVULNERABILITY_SECS,
        }
    }
}

/// Obstacle balance, with per-level scaling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    pub base_spawn_interval: f32,
    pub min_spawn_interval: f32,
    pub interval_step: f32,
    pub max_interval_reduction: f32,
    pub base_min_speed: f32,
    pub base_max_speed: f32,
    pub min_speed_step: f32,
    pub max_speed_step: f32,
    pub size: Vec2,
    pub margin_low: f32,
    pub margin_high: f32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            base_spawn_interval: OBSTACLE_BASE_SPAWN_INTERVAL,
            min_spawn_interval: OBSTACLE_MIN_SPAWN_INTERVAL,
            interval_step: OBSTACLE_INTERVAL_STEP,
            max_interval_reduction: OBSTACLE_MAX_INTERVAL_REDUCTION,
            base_min_speed: OBSTACLE_BASE_MIN_SPEED,
            base_max_speed: OBSTACLE_BASE_MAX_SPEED,
            min_speed_step: OBSTACLE_MIN_SPEED_STEP,
            max_speed_step: OBSTACLE_MAX_SPEED_STEP,
            size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
            margin_low: OBSTACLE_MARGIN_LOW,
            margin_high: OBSTACLE_MARGIN_HIGH,
        }
    }
}

impl ObstacleTuning {
    /// Seconds between obstacle spawns. Non-increasing in level, floor-clamped.
    pub fn spawn_interval(&self, level: u32) -> f32 {
        let steps = level.max(1) - 1;
        let reduction = (steps as f32 * self.interval_step).min(self.max_interval_reduction);
        (self.base_spawn_interval - reduction).max(self.min_spawn_interval)
    }

    /// Minimum obstacle speed (also the round's base scroll speed for obstacles)
    pub fn min_speed(&self, level: u32) -> f32 {
        let steps = level.max(1) - 1;
        self.base_min_speed + steps as f32 * self.min_speed_step
    }

    pub fn max_speed(&self, level: u32) -> f32 {
        let steps = level.max(1) - 1;
        self.base_max_speed + steps as f32 * self.max_speed_step
    }
}

/// Collectible particle balance (level independent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    pub spawn_interval: f32,
    pub speed: f32,
    /// Probability a due spawn actually produces a particle
    pub spawn_chance: f32,
    pub size: Vec2,
    /// Resources granted per particle
    pub value: u32,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            spawn_interval: PARTICLE_SPAWN_INTERVAL,
            speed: PARTICLE_SPEED,
            spawn_chance: PARTICLE_SPAWN_CHANCE,
            size: Vec2::new(PARTICLE_WIDTH, PARTICLE_HEIGHT),
            value: PARTICLE_VALUE,
        }
    }
}

/// All balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Seconds per round
    pub round_duration: f32,
    /// Viewport size in points
    pub screen: Vec2,
    pub background_speed: f32,
    /// Width of one background tile; defaults to the screen width
    pub background_width: f32,
    pub player: PlayerTuning,
    pub obstacle: ObstacleTuning,
    pub particle: ParticleTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            round_duration: ROUND_DURATION,
            screen: Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            background_speed: BACKGROUND_SPEED,
            background_width: SCREEN_WIDTH,
            player: PlayerTuning::default(),
            obstacle: ObstacleTuning::default(),
            particle: ParticleTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the monotonic level formulas, the
    /// scroller or the spawner. Every value must be finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.round_duration.is_finite() && self.round_duration > 0.0) {
            return Err(ConfigError::invalid("round_duration", "must be positive and finite"));
        }
        if !(self.screen.is_finite() && self.screen.x > 0.0 && self.screen.y > 0.0) {
            return Err(ConfigError::invalid(
                "screen",
                "both dimensions must be positive and finite",
            ));
        }
        if !(self.background_width.is_finite() && self.background_width >= MIN_BACKGROUND_WIDTH) {
            return Err(ConfigError::invalid(
                "background_width",
                format!("must be finite and at least {MIN_BACKGROUND_WIDTH}"),
            ));
        }
        if !(self.background_speed.is_finite() && self.background_speed >= 0.0) {
            return Err(ConfigError::invalid("background_speed", "must be finite and not negative"));
        }

        let pl = &self.player;
        if !(pl.size.is_finite() && pl.size.x > 0.0 && pl.size.y > 0.0) {
            return Err(ConfigError::invalid(
                "player.size",
                "both dimensions must be positive and finite",
            ));
        }
        if !(pl.x_fraction.is_finite() && pl.y_fraction.is_finite()) {
            return Err(ConfigError::invalid("player.fraction", "must be finite"));
        }
        if !(pl.hitbox_scale > 0.0 && pl.hitbox_scale <= 1.0) {
            return Err(ConfigError::invalid("player.hitbox_scale", "must be in (0, 1]"));
        }
        if !(pl.invulnerability_secs.is_finite() && pl.invulnerability_secs >= 0.0) {
            return Err(ConfigError::invalid(
                "player.invulnerability_secs",
                "must be finite and not negative",
            ));
        }

        let o = &self.obstacle;
        let interval_ok = o.min_spawn_interval.is_finite()
            && o.base_spawn_interval.is_finite()
            && o.min_spawn_interval > 0.0
            && o.base_spawn_interval >= o.min_spawn_interval;
        if !interval_ok {
            return Err(ConfigError::invalid(
                "obstacle.spawn_interval",
                "need 0 < min_spawn_interval <= base_spawn_interval, both finite",
            ));
        }
        let reduction_ok = o.interval_step.is_finite()
            && o.max_interval_reduction.is_finite()
            && o.interval_step >= 0.0
            && o.max_interval_reduction >= 0.0;
        if !reduction_ok {
            return Err(ConfigError::invalid(
                "obstacle.interval_step",
                "interval scaling must be finite and must not increase the interval",
            ));
        }
        let speeds = [
            o.base_min_speed,
            o.base_max_speed,
            o.min_speed_step,
            o.max_speed_step,
        ];
        if !speeds.iter().all(|v| v.is_finite() && *v >= 0.0) {
            return Err(ConfigError::invalid(
                "obstacle.speed",
                "speeds and speed steps must be finite and not negative",
            ));
        }
        if o.base_max_speed < o.base_min_speed || o.max_speed_step < o.min_speed_step {
            return Err(ConfigError::invalid(
                "obstacle.max_speed",
                "max speed must stay at or above min speed for every level",
            ));
        }
        if !(o.size.is_finite() && o.size.x > 0.0 && o.size.y > 0.0) {
            return Err(ConfigError::invalid(
                "obstacle.size",
                "both dimensions must be positive and finite",
            ));
        }
        let margins_ok = o.margin_low.is_finite()
            && o.margin_high.is_finite()
            && o.margin_low >= 0.0
            && o.margin_high >= 0.0;
        if !margins_ok {
            return Err(ConfigError::invalid(
                "obstacle.margin",
                "margins must be finite and not negative",
            ));
        }
        let obstacle_band = self.screen.y - o.size.y - o.margin_low - o.margin_high;
        if !obstacle_band.is_finite() {
            return Err(ConfigError::invalid("obstacle.margin", "spawn band must be finite"));
        }

        let p = &self.particle;
        if !(p.spawn_interval.is_finite() && p.spawn_interval > 0.0) {
            return Err(ConfigError::invalid(
                "particle.spawn_interval",
                "must be positive and finite",
            ));
        }
        if !(p.speed.is_finite() && p.speed >= 0.0) {
            return Err(ConfigError::invalid("particle.speed", "must be finite and not negative"));
        }
        if !(0.0..=1.0).contains(&p.spawn_chance) {
            return Err(ConfigError::invalid("particle.spawn_chance", "must be in [0, 1]"));
        }
        if !(p.size.is_finite() && p.size.x > 0.0 && p.size.y > 0.0) {
            return Err(ConfigError::invalid(
                "particle.size",
                "both dimensions must be positive and finite",
            ));
        }

        Ok(())
    }

    /// Derive the immutable configuration for one round at `level`
    pub fn round_config(&self, level: u32, skin_id: &str, background_id: &str) -> RoundConfig {
        let level = level.max(1);
        RoundConfig {
            level,
            duration: self.round_duration,
            screen: self.screen,
            background_speed: self.background_speed,
            background_width: self.background_width,
            player: self.player,
            obstacle: ObstacleSpawn {
                spawn_interval: self.obstacle.spawn_interval(level),
                min_speed: self.obstacle.min_speed(level),
                max_speed: self.obstacle.max_speed(level),
                size: self.obstacle.size,
                margin_low: self.obstacle.margin_low,
                margin_high: self.obstacle.margin_high,
            },
            particle: self.particle,
            skin_id: skin_id.to_string(),
            background_id: background_id.to_string(),
        }
    }
}

/// Obstacle parameters resolved for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpawn {
    pub spawn_interval: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub size: Vec2,
    pub margin_low: f32,
    pub margin_high: f32,
}

/// Immutable per-round configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub level: u32,
    pub duration: f32,
    pub screen: Vec2,
    pub background_speed: f32,
    pub background_width: f32,
    pub player: PlayerTuning,
    pub obstacle: ObstacleSpawn,
    pub particle: ParticleTuning,
    /// Cosmetic skin chosen in the shop (opaque to the simulation)
    pub skin_id: String,
    /// Background chosen in the shop (opaque to the simulation)
    pub background_id: String,
}

impl RoundConfig {
    /// Default tuning for `level` with the starter skin and background
    pub fn for_level(level: u32) -> Self {
        Tuning::default().round_config(level, "default", "bg1")
    }

    /// Base horizontal speed of every obstacle this round
    pub fn obstacle_speed(&self) -> f32 {
        self.obstacle.min_speed
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self::for_level(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_one_matches_base_values() {
        let o = ObstacleTuning::default();
        assert_eq!(o.spawn_interval(1), 4.0);
        assert_eq!(o.min_speed(1), 350.0);
        assert_eq!(o.max_speed(1), 450.0);
    }

    #[test]
    fn test_level_scaling() {
        let o = ObstacleTuning::default();
        assert!((o.spawn_interval(2) - 3.7).abs() < 1e-5);
        assert!((o.spawn_interval(3) - 3.4).abs() < 1e-5);
        assert_eq!(o.min_speed(3), 400.0);
        assert_eq!(o.max_speed(3), 520.0);
        // Reduction caps at 1.5 then the 2.5 floor holds
        assert!((o.spawn_interval(6) - 2.5).abs() < 1e-5);
        assert!((o.spawn_interval(50) - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_level_zero_treated_as_one() {
        let config = Tuning::default().round_config(0, "default", "bg1");
        assert_eq!(config.level, 1);
        assert_eq!(config.obstacle.spawn_interval, 4.0);
    }

    #[test]
    fn test_round_config_passes_ids_through() {
        let config = Tuning::default().round_config(2, "skin3", "not-a-real-bg");
        assert_eq!(config.skin_id, "skin3");
        assert_eq!(config.background_id, "not-a-real-bg");
        assert_eq!(config.obstacle_speed(), 375.0);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{ "round_duration": 60.0 }"#).unwrap();
        assert_eq!(tuning.round_duration, 60.0);
        assert_eq!(tuning.obstacle, ObstacleTuning::default());
    }

    #[test]
    fn test_from_json_rejects_bad_chance() {
        let err = Tuning::from_json(r#"{ "particle": { "spawn_chance": 1.5 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "particle.spawn_chance",
                ..
            }
        ));
    }

    #[test]
    fn test_from_json_rejects_degenerate_background() {
        for json in [
            r#"{ "background_width": 1e-9 }"#,
            r#"{ "background_width": 1e39 }"#,
            r#"{ "background_speed": 1e39 }"#,
        ] {
            let err = Tuning::from_json(json).unwrap_err();
            assert!(
                matches!(
                    err,
                    ConfigError::Invalid {
                        field: "background_width" | "background_speed",
                        ..
                    }
                ),
                "{json} accepted"
            );
        }
    }

    #[test]
    fn test_from_json_rejects_bad_margins() {
        for json in [
            r#"{ "obstacle": { "margin_low": -1e39 } }"#,
            r#"{ "obstacle": { "margin_high": 1e39 } }"#,
            r#"{ "obstacle": { "margin_low": -5.0 } }"#,
        ] {
            let err = Tuning::from_json(json).unwrap_err();
            assert!(
                matches!(
                    err,
                    ConfigError::Invalid {
                        field: "obstacle.margin",
                        ..
                    }
                ),
                "{json} accepted"
            );
        }
    }

    #[test]
    fn test_from_json_rejects_infinite_sizes() {
        assert!(Tuning::from_json(r#"{ "screen": [390.0, 1e39] }"#).is_err());
        assert!(Tuning::from_json(r#"{ "particle": { "size": [30.0, 1e39] } }"#).is_err());
        assert!(Tuning::from_json(r#"{ "obstacle": { "base_max_speed": 1e39 } }"#).is_err());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }
}
