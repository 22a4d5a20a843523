//! Collision detection between the player and scrolling entities
//!
//! Everything is an axis-aligned box. The player's box is shrunk relative to
//! the sprite so grazes feel fair.

use glam::Vec2;

use super::state::{Entity, EntityKind};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box of `size` centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap: boxes that only share an edge do not touch
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// One player/entity overlap found this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub entity_id: u32,
    pub kind: EntityKind,
}

/// All entities overlapping `hitbox`, in entity order. Each overlap is
/// reported separately; the caller decides what an obstacle or particle hit means.
pub fn detect_contacts(hitbox: &Aabb, entities: &[Entity]) -> Vec<Contact> {
    entities
        .iter()
        .filter(|e| hitbox.overlaps(&e.bounds()))
        .map(|e| Contact {
            entity_id: e.id,
            kind: e.kind,
        })
        .collect()
}
