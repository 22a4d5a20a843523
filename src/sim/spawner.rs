//! Obstacle and particle spawning, movement and retirement
//!
//! Two independent timers: obstacles always spawn when their interval has
//! elapsed, particles only pass a probability roll. Both timers reset when
//! they fire regardless of the roll.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Entity, EntityKind};
use crate::tuning::RoundConfig;

/// Owns every live entity of a round (sorted by id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    pub entities: Vec<Entity>,
    /// Round time of the last obstacle spawn
    pub last_obstacle_spawn: f32,
    /// Round time of the last particle roll
    pub last_particle_spawn: f32,
    next_id: u32,
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spawner {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            last_obstacle_spawn: 0.0,
            last_particle_spawn: 0.0,
            next_id: 1,
        }
    }

    /// Move, spawn, then retire. `now` is round time, `dt` the step length.
    pub fn tick<R: Rng + ?Sized>(&mut self, now: f32, dt: f32, config: &RoundConfig, rng: &mut R) {
        for entity in &mut self.entities {
            entity.pos.x -= entity.speed * dt;
        }

        if now - self.last_obstacle_spawn > config.obstacle.spawn_interval {
            self.spawn_obstacle(config, rng);
            self.last_obstacle_spawn = now;
        }

        if now - self.last_particle_spawn > config.particle.spawn_interval {
            let roll: f32 = rng.random();
            if roll < config.particle.spawn_chance {
                self.spawn_particle(config, rng);
            }
            self.last_particle_spawn = now;
        }

        self.retire_off_screen();
    }

    /// Obstacle at the right edge, random height inside the margins
    pub fn spawn_obstacle<R: Rng + ?Sized>(&mut self, config: &RoundConfig, rng: &mut R) -> u32 {
        let size = config.obstacle.size;
        let min_y = size.y / 2.0 + config.obstacle.margin_low;
        let max_y = config.screen.y - size.y / 2.0 - config.obstacle.margin_high;
        let y = random_in_band(rng, min_y, max_y);
        let pos = Vec2::new(config.screen.x + size.x / 2.0, y);
        let id = self.insert(EntityKind::Obstacle, pos, size, config.obstacle_speed());
        log::debug!("Spawned obstacle {} at y={:.1}", id, y);
        id
    }

    /// Particle at the right edge, kept two heights away from top and bottom
    pub fn spawn_particle<R: Rng + ?Sized>(&mut self, config: &RoundConfig, rng: &mut R) -> u32 {
        let size = config.particle.size;
        let min_y = size.y * 2.0;
        let max_y = config.screen.y - size.y * 2.0;
        let y = random_in_band(rng, min_y, max_y);
        let pos = Vec2::new(config.screen.x + size.x / 2.0, y);
        let id = self.insert(EntityKind::Particle, pos, size, config.particle.speed);
        log::debug!("Spawned particle {} at y={:.1}", id, y);
        id
    }

    /// Add an entity directly; returns its id
    pub fn insert(&mut self, kind: EntityKind, pos: Vec2, size: Vec2, speed: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        // ids are monotonic so pushing keeps the list sorted
        self.entities.push(Entity {
            id,
            kind,
            pos,
            size,
            speed,
        });
        id
    }

    pub fn remove(&mut self, id: u32) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    /// Drop entities whose center is strictly left of `-width`; returns how many
    pub fn retire_off_screen(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| !e.is_off_screen());
        before - self.entities.len()
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.kind == EntityKind::Obstacle)
    }

    pub fn particles(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.kind == EntityKind::Particle)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Uniform height in `[min, max]`. An empty or unbounded band yields its
/// midpoint without touching `rng`.
fn random_in_band<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    let usable = min.is_finite() && max.is_finite() && (max - min).is_finite();
    if !usable || max <= min {
        (min + max) / 2.0
    } else {
        rng.random_range(min..=max)
    }
}
