//! Mutation Dash - a side-scrolling dodge game with a mutation economy
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scrolling, spawning, collisions, round state)
//! - `tuning`: Data-driven game balance and per-level round configuration
//! - `catalog`: Skin, background and achievement descriptors
//! - `progress`: Coins, unlocks and achievement rules
//! - `settings`: Sound and music preferences
//! - `bootstrap`: Initial reachability check raced against a timeout
//! - `session`: Host-facing glue between a round and the rest of the app

pub mod bootstrap;
pub mod catalog;
pub mod error;
pub mod progress;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use progress::Progress;
pub use session::Session;
pub use settings::Settings;
pub use tuning::{RoundConfig, Tuning};

/// Game configuration constants (defaults for `Tuning`)
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the platform's nominal frame rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the clock will report (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default viewport (points)
    pub const SCREEN_WIDTH: f32 = 390.0;
    pub const SCREEN_HEIGHT: f32 = 844.0;

    /// Seconds per round
    pub const ROUND_DURATION: f32 = 300.0;
    /// Number of selectable levels
    pub const MAX_LEVELS: u32 = 3;

    /// Background scroll speed (points/s)
    pub const BACKGROUND_SPEED: f32 = 100.0;
    /// Narrowest background tile accepted from tuning (points)
    pub const MIN_BACKGROUND_WIDTH: f32 = 1.0;

    /// Player sprite and placement
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    pub const PLAYER_X_FRACTION: f32 = 0.15;
    pub const PLAYER_Y_FRACTION: f32 = 0.5;
    /// Hitbox size relative to the sprite
    pub const PLAYER_HITBOX_SCALE: f32 = 0.7;
    /// Grace period after the first hit (seconds)
    pub const INVULNERABILITY_SECS: f32 = 2.0;

    /// Obstacle spawn interval at level 1 (seconds)
    pub const OBSTACLE_BASE_SPAWN_INTERVAL: f32 = 4.0;
    /// Interval never drops below this
    pub const OBSTACLE_MIN_SPAWN_INTERVAL: f32 = 2.5;
    pub const OBSTACLE_INTERVAL_STEP: f32 = 0.3;
    pub const OBSTACLE_MAX_INTERVAL_REDUCTION: f32 = 1.5;
    pub const OBSTACLE_BASE_MIN_SPEED: f32 = 350.0;
    pub const OBSTACLE_BASE_MAX_SPEED: f32 = 450.0;
    pub const OBSTACLE_MIN_SPEED_STEP: f32 = 25.0;
    pub const OBSTACLE_MAX_SPEED_STEP: f32 = 35.0;
    pub const OBSTACLE_WIDTH: f32 = 140.0;
    pub const OBSTACLE_HEIGHT: f32 = 80.0;
    /// Vertical spawn margins (bottom, top)
    pub const OBSTACLE_MARGIN_LOW: f32 = 20.0;
    pub const OBSTACLE_MARGIN_HIGH: f32 = 40.0;

    /// Particles (DNA / coins)
    pub const PARTICLE_SPAWN_INTERVAL: f32 = 0.8;
    pub const PARTICLE_SPEED: f32 = 150.0;
    pub const PARTICLE_SPAWN_CHANCE: f32 = 0.95;
    pub const PARTICLE_WIDTH: f32 = 30.0;
    pub const PARTICLE_HEIGHT: f32 = 25.0;
    pub const PARTICLE_VALUE: u32 = 1;

    /// Mutation economy
    pub const BASE_MUTATION_COST: u64 = 10;
    pub const MUTATION_COST_GROWTH: f64 = 1.5;

    /// Rewards
    pub const LEVEL_COMPLETION_REWARD: u64 = 100;
    pub const ACHIEVEMENT_REWARD: u64 = 10;

    /// Bootstrap gives up on the reachability probe after this long
    pub const MAX_LOADING_SECS: f32 = 10.0;

    /// UI exit animation delays before an outcome is shown (seconds)
    pub const WIN_AFTER_ACCEPT_DELAY: f32 = 0.2;
    pub const WIN_AFTER_COLLECT_DELAY: f32 = 0.1;
}

/// Clamp `value` into `[min, max]`; a degenerate band collapses to its midpoint
#[inline]
pub fn clamp_to_band(value: f32, min: f32, max: f32) -> f32 {
    if max < min {
        (min + max) / 2.0
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_band() {
        assert_eq!(clamp_to_band(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp_to_band(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp_to_band(11.0, 0.0, 10.0), 10.0);
        // Band inverted: midpoint
        assert_eq!(clamp_to_band(3.0, 10.0, 0.0), 5.0);
    }
}
