//! Player progress: coins, unlocked levels, shop purchases and achievements
//!
//! Held in memory and handed to the host as JSON for storage.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, achievement_ids};
use crate::consts::{LEVEL_COMPLETION_REWARD, MAX_LEVELS};
use crate::error::ConfigError;

/// Result of a shop purchase attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purchase {
    Bought,
    AlreadyOwned,
    NotEnoughCoins,
    UnknownItem,
}

/// What a finished round did to progress
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoundRecord {
    pub coins_awarded: u64,
    /// Level newly made selectable, if any
    pub level_unlocked: Option<u32>,
    /// Achievements completed by this round
    pub achievements: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub coins: u64,
    /// Highest selectable level (1..=MAX_LEVELS)
    pub max_available_level: u32,
    pub levels_completed: u32,
    pub max_completed_level: u32,
    /// Consecutive wins without touching an obstacle
    pub no_collision_streak: u32,
    pub purchased_skins: Vec<String>,
    pub purchased_backgrounds: Vec<String>,
    pub selected_skin: String,
    pub selected_background: String,
    pub completed_achievements: Vec<String>,
    /// Completed achievements whose reward has been claimed
    pub notified_achievements: Vec<String>,
}

impl Default for Progress {
    fn default() -> Self {
        let skin = catalog::default_skin().id.to_string();
        let background = catalog::default_background().id.to_string();
        Self {
            coins: 0,
            max_available_level: 1,
            levels_completed: 0,
            max_completed_level: 0,
            no_collision_streak: 0,
            purchased_skins: vec![skin.clone()],
            purchased_backgrounds: vec![background.clone()],
            selected_skin: skin,
            selected_background: background,
            completed_achievements: Vec::new(),
            notified_achievements: Vec::new(),
        }
    }
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_coins(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
    }

    pub fn is_level_available(&self, level: u32) -> bool {
        (1..=self.max_available_level).contains(&level)
    }

    pub fn owns_skin(&self, id: &str) -> bool {
        self.purchased_skins.iter().any(|s| s == id)
    }

    pub fn owns_background(&self, id: &str) -> bool {
        self.purchased_backgrounds.iter().any(|b| b == id)
    }

    pub fn purchase_skin(&mut self, id: &str) -> Purchase {
        let item = catalog::skin(id);
        if item.id != id {
            return Purchase::UnknownItem;
        }
        if self.owns_skin(id) {
            return Purchase::AlreadyOwned;
        }
        if !self.spend(item.price) {
            return Purchase::NotEnoughCoins;
        }
        self.purchased_skins.push(id.to_string());
        log::info!("Bought skin {} for {}", id, item.price);
        Purchase::Bought
    }

    pub fn purchase_background(&mut self, id: &str) -> Purchase {
        let item = catalog::background(id);
        if item.id != id {
            return Purchase::UnknownItem;
        }
        if self.owns_background(id) {
            return Purchase::AlreadyOwned;
        }
        if !self.spend(item.price) {
            return Purchase::NotEnoughCoins;
        }
        self.purchased_backgrounds.push(id.to_string());
        log::info!("Bought background {} for {}", id, item.price);
        Purchase::Bought
    }

    /// Select an owned skin; returns false if it is not owned
    pub fn select_skin(&mut self, id: &str) -> bool {
        if !self.owns_skin(id) {
            return false;
        }
        self.selected_skin = id.to_string();
        true
    }

    pub fn select_background(&mut self, id: &str) -> bool {
        if !self.owns_background(id) {
            return false;
        }
        self.selected_background = id.to_string();
        true
    }

    fn spend(&mut self, amount: u64) -> bool {
        match self.coins.checked_sub(amount) {
            Some(rest) => {
                self.coins = rest;
                true
            }
            None => false,
        }
    }

    /// Book a finished round. A win pays the completion reward, unlocks the
    /// next level and extends the no-collision streak if the player was
    /// never hit; a loss breaks the streak.
    pub fn record_round(&mut self, level: u32, won: bool, collided: bool) -> RoundRecord {
        let mut record = RoundRecord::default();
        if won {
            self.levels_completed += 1;
            self.max_completed_level = self.max_completed_level.max(level);
            self.add_coins(LEVEL_COMPLETION_REWARD);
            record.coins_awarded = LEVEL_COMPLETION_REWARD;

            let next = (level + 1).min(MAX_LEVELS);
            if next > self.max_available_level {
                self.max_available_level = next;
                record.level_unlocked = Some(next);
                log::info!("Level {} unlocked", next);
            }

            if collided {
                self.no_collision_streak = 0;
            } else {
                self.no_collision_streak += 1;
            }
        } else {
            self.no_collision_streak = 0;
        }
        record.achievements = self.evaluate_achievements();
        record
    }

    /// Apply every automatic unlock rule; returns the newly completed ids
    pub fn evaluate_achievements(&mut self) -> Vec<&'static str> {
        let all_skins = catalog::SKINS.iter().all(|s| self.owns_skin(s.id));
        let rules = [
            (achievement_ids::FIRST_STEP, self.levels_completed > 0),
            (achievement_ids::MASTER_OF_CHAOS, self.no_collision_streak >= 3),
            (achievement_ids::ADAPTATION_CHAMPION, self.max_completed_level >= MAX_LEVELS),
            (achievement_ids::GRINDILKA_VETERAN, all_skins),
        ];

        rules
            .into_iter()
            .filter(|(id, met)| *met && self.unlock_achievement(id))
            .map(|(id, _)| id)
            .collect()
    }

    /// Mark an achievement completed; false if unknown or already completed
    pub fn unlock_achievement(&mut self, id: &str) -> bool {
        if catalog::achievement(id).is_none() || self.is_achievement_completed(id) {
            return false;
        }
        self.completed_achievements.push(id.to_string());
        log::info!("Achievement completed: {}", id);
        true
    }

    pub fn is_achievement_completed(&self, id: &str) -> bool {
        self.completed_achievements.iter().any(|a| a == id)
    }

    pub fn is_achievement_notified(&self, id: &str) -> bool {
        self.notified_achievements.iter().any(|a| a == id)
    }

    /// Pay out a completed achievement once; returns the coins credited
    pub fn claim_reward(&mut self, id: &str) -> Option<u64> {
        let achievement = catalog::achievement(id)?;
        if !self.is_achievement_completed(id) || self.is_achievement_notified(id) {
            return None;
        }
        self.add_coins(achievement.reward);
        self.notified_achievements.push(id.to_string());
        Some(achievement.reward)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let progress: Self = serde_json::from_str(json)?;
        if !(1..=MAX_LEVELS).contains(&progress.max_available_level) {
            return Err(ConfigError::invalid(
                "max_available_level",
                format!("must be within 1..={MAX_LEVELS}"),
            ));
        }
        Ok(progress)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_owns_free_items() {
        let progress = Progress::new();
        assert!(progress.owns_skin("default"));
        assert!(progress.owns_background("bg1"));
        assert!(progress.is_level_available(1));
        assert!(!progress.is_level_available(2));
        assert!(!progress.is_level_available(0));
    }

    #[test]
    fn test_purchase_flow() {
        let mut progress = Progress::new();
        assert_eq!(progress.purchase_skin("skin2"), Purchase::NotEnoughCoins);
        assert!(!progress.select_skin("skin2"));

        progress.add_coins(150);
        assert_eq!(progress.purchase_skin("skin2"), Purchase::Bought);
        assert_eq!(progress.coins, 50);
        assert_eq!(progress.purchase_skin("skin2"), Purchase::AlreadyOwned);
        assert_eq!(progress.coins, 50);
        assert!(progress.select_skin("skin2"));
        assert_eq!(progress.selected_skin, "skin2");

        assert_eq!(progress.purchase_background("bg9"), Purchase::UnknownItem);
        assert_eq!(progress.purchase_background("bg2"), Purchase::NotEnoughCoins);
    }

    #[test]
    fn test_win_unlocks_next_level_up_to_max() {
        let mut progress = Progress::new();
        let record = progress.record_round(1, true, true);
        assert_eq!(record.coins_awarded, 100);
        assert_eq!(record.level_unlocked, Some(2));
        assert_eq!(record.achievements, vec!["first_step"]);
        assert_eq!(progress.coins, 100);

        progress.record_round(2, true, true);
        let record = progress.record_round(3, true, true);
        assert_eq!(progress.max_available_level, 3);
        assert_eq!(record.level_unlocked, None);
        assert_eq!(record.achievements, vec!["adaptation_champion"]);
    }

    #[test]
    fn test_loss_pays_nothing() {
        let mut progress = Progress::new();
        let record = progress.record_round(1, false, true);
        assert_eq!(record, RoundRecord::default());
        assert_eq!(progress.levels_completed, 0);
    }

    #[test]
    fn test_streak_unlocks_master_of_chaos() {
        let mut progress = Progress::new();
        progress.record_round(1, true, false);
        progress.record_round(1, true, false);
        progress.record_round(1, false, false);
        assert_eq!(progress.no_collision_streak, 0);

        progress.record_round(1, true, false);
        progress.record_round(1, true, false);
        let record = progress.record_round(1, true, false);
        assert_eq!(record.achievements, vec!["master_of_chaos"]);
        assert!(progress.is_achievement_completed("master_of_chaos"));
    }

    #[test]
    fn test_all_skins_unlocks_veteran() {
        let mut progress = Progress::new();
        progress.add_coins(600);
        progress.purchase_skin("skin2");
        progress.purchase_skin("skin3");
        assert!(progress.evaluate_achievements().is_empty());
        progress.purchase_skin("skin4");
        assert_eq!(progress.evaluate_achievements(), vec!["grindilka_veteran"]);
    }

    #[test]
    fn test_claim_reward_once() {
        let mut progress = Progress::new();
        assert_eq!(progress.claim_reward("first_step"), None);
        progress.unlock_achievement("first_step");
        assert_eq!(progress.claim_reward("first_step"), Some(10));
        assert_eq!(progress.claim_reward("first_step"), None);
        assert_eq!(progress.coins, 10);
        assert!(!progress.unlock_achievement("not_an_achievement"));
    }

    #[test]
    fn test_json_round_trip_and_validation() {
        let mut progress = Progress::new();
        progress.add_coins(42);
        let json = progress.to_json().unwrap();
        assert_eq!(Progress::from_json(&json).unwrap(), progress);

        let err = Progress::from_json(r#"{"max_available_level":7}"#).unwrap_err();
        assert!(err.to_string().contains("max_available_level"));
    }
}
