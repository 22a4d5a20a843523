//! Mutation economy
//!
//! Collected resources buy random mutation draws at an escalating price.
//! The round is won once the applied mutation matches the target drawn at
//! round start. Drawing and applying are separate steps so the UI can show a
//! preview and let the player accept or reject; the price is paid either way.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::consts::{BASE_MUTATION_COST, MUTATION_COST_GROWTH};

/// Every cosmetic mutation a draw can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationType {
    FinMask,
    Fin,
    JawMask,
    SpikesFin,
    SpikesFinMask,
    SpikesMask,
    Spikes,
}

impl MutationType {
    pub const ALL: [MutationType; 7] = [
        MutationType::FinMask,
        MutationType::Fin,
        MutationType::JawMask,
        MutationType::SpikesFin,
        MutationType::SpikesFinMask,
        MutationType::SpikesMask,
        MutationType::Spikes,
    ];

    /// Texture id the renderer swaps the player sprite to
    pub fn texture_name(&self) -> &'static str {
        match self {
            MutationType::FinMask => "skin_fin_mask",
            MutationType::Fin => "skin_fin",
            MutationType::JawMask => "skin_jaw_mask",
            MutationType::SpikesFin => "skin_spikes_fin",
            MutationType::SpikesFinMask => "skin_spikes_fin_mask",
            MutationType::SpikesMask => "skin_spikes_mask",
            MutationType::Spikes => "skin_spikes",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MutationType::FinMask | MutationType::Fin => "Fins",
            MutationType::JawMask => "Jaw",
            MutationType::SpikesFin | MutationType::SpikesFinMask => "Spikes + Fins",
            MutationType::SpikesMask | MutationType::Spikes => "Spikes",
        }
    }

    pub fn from_texture_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.texture_name() == name)
    }

    /// Uniform draw over the full set (the current type is not excluded)
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&MutationType::Fin)
    }
}

/// A paid-for draw, not yet applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    /// 1-based draw number within the round
    pub serial: u32,
    pub kind: MutationType,
    /// Price that was deducted for this draw
    pub cost: u64,
}

/// Price of the draw after `count` previous draws: 10, 15, 23, 34, 51, ...
pub fn cost_for(count: u32) -> u64 {
    if count == 0 {
        return BASE_MUTATION_COST;
    }
    let exp = count.min(i32::MAX as u32) as i32;
    let raw = BASE_MUTATION_COST as f64 * MUTATION_COST_GROWTH.powi(exp);
    // float -> int casts saturate, so runaway counts pin at u64::MAX
    raw.round() as u64
}

/// Resource and mutation bookkeeping for one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationEconomy {
    current: Option<MutationType>,
    target: MutationType,
    mutation_count: u32,
    total_spent: u64,
    available: u64,
}

impl MutationEconomy {
    pub fn new(target: MutationType) -> Self {
        Self {
            current: None,
            target,
            mutation_count: 0,
            total_spent: 0,
            available: 0,
        }
    }

    /// Fresh economy with a randomly drawn target
    pub fn with_random_target<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(MutationType::random(rng))
    }

    pub fn current(&self) -> Option<MutationType> {
        self.current
    }

    pub fn target(&self) -> MutationType {
        self.target
    }

    pub fn mutation_count(&self) -> u32 {
        self.mutation_count
    }

    pub fn total_spent(&self) -> u64 {
        self.total_spent
    }

    pub fn available(&self) -> u64 {
        self.available
    }

    /// Add resources; returns whether the economy is in the won state afterwards
    pub fn add_resources(&mut self, amount: u64) -> bool {
        self.available = self.available.saturating_add(amount);
        self.has_won()
    }

    pub fn next_cost(&self) -> u64 {
        cost_for(self.mutation_count)
    }

    pub fn can_afford(&self) -> bool {
        self.available >= self.next_cost()
    }

    /// Pay for and draw a mutation. `None` when unaffordable (nothing changes).
    pub fn perform_mutation<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Mutation> {
        if !self.can_afford() {
            return None;
        }
        let cost = self.next_cost();
        self.available -= cost;
        self.total_spent = self.total_spent.saturating_add(cost);
        self.mutation_count += 1;

        Some(Mutation {
            serial: self.mutation_count,
            kind: MutationType::random(rng),
            cost,
        })
    }

    pub fn apply_mutation(&mut self, mutation: &Mutation) {
        self.current = Some(mutation.kind);
    }

    pub fn has_won(&self) -> bool {
        self.current == Some(self.target)
    }

    /// Replace the target (used when retrying a round against the same goal)
    pub fn set_target(&mut self, target: MutationType) {
        self.target = target;
    }

    /// Back to zero with a newly drawn target
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Self::with_random_target(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_cost_sequence() {
        let costs: Vec<u64> = (0..6).map(cost_for).collect();
        assert_eq!(costs, vec![10, 15, 23, 34, 51, 76]);
    }

    #[test]
    fn test_cost_saturates() {
        assert_eq!(cost_for(u32::MAX), u64::MAX);
    }

    #[test]
    fn test_perform_requires_funds() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut eco = MutationEconomy::new(MutationType::Spikes);
        eco.add_resources(9);
        assert!(!eco.can_afford());
        assert!(eco.perform_mutation(&mut rng).is_none());
        assert_eq!(eco.available(), 9);
        assert_eq!(eco.mutation_count(), 0);
    }

    #[test]
    fn test_perform_deducts_and_escalates() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut eco = MutationEconomy::new(MutationType::Spikes);
        eco.add_resources(30);

        let first = eco.perform_mutation(&mut rng).unwrap();
        assert_eq!(first.cost, 10);
        assert_eq!(first.serial, 1);
        assert_eq!(eco.available(), 20);
        assert_eq!(eco.next_cost(), 15);

        let second = eco.perform_mutation(&mut rng).unwrap();
        assert_eq!(second.cost, 15);
        assert_eq!(eco.available(), 5);
        assert_eq!(eco.total_spent(), 25);
        // Drawn but never applied
        assert_eq!(eco.current(), None);
    }

    #[test]
    fn test_apply_and_win() {
        let mut eco = MutationEconomy::new(MutationType::Spikes);
        let wrong = Mutation {
            serial: 1,
            kind: MutationType::Fin,
            cost: 10,
        };
        eco.apply_mutation(&wrong);
        assert!(!eco.has_won());

        let right = Mutation {
            serial: 2,
            kind: MutationType::JawMask,
            cost: 15,
        };
        eco.apply_mutation(&right);
        assert!(!eco.has_won());

        eco.set_target(MutationType::JawMask);
        assert!(eco.has_won());
        assert!(eco.add_resources(1));
    }

    #[test]
    fn test_texture_names_round_trip() {
        for t in MutationType::ALL {
            assert_eq!(MutationType::from_texture_name(t.texture_name()), Some(t));
        }
        assert_eq!(MutationType::from_texture_name("skin_default"), None);
    }

    #[test]
    fn test_reset_clears_progress() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut eco = MutationEconomy::new(MutationType::Fin);
        eco.add_resources(50);
        eco.perform_mutation(&mut rng);
        eco.reset(&mut rng);
        assert_eq!(eco.available(), 0);
        assert_eq!(eco.total_spent(), 0);
        assert_eq!(eco.mutation_count(), 0);
        assert_eq!(eco.current(), None);
    }
}
