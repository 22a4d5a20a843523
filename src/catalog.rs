//! Shop and achievement descriptors
//!
//! Static tables. Skin and background lookups never fail: an unknown id
//! resolves to the first (free) entry so stale saves still render.

use serde::Serialize;

use crate::consts::ACHIEVEMENT_REWARD;

/// A purchasable level background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackgroundItem {
    pub id: &'static str,
    pub image_name: &'static str,
    pub price: u64,
}

/// A purchasable fish skin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkinItem {
    pub id: &'static str,
    pub image_name: &'static str,
    pub price: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub image_name: &'static str,
    pub reward: u64,
}

pub static BACKGROUNDS: [BackgroundItem; 4] = [
    BackgroundItem {
        id: "bg1",
        image_name: "bg1",
        price: 0,
    },
    BackgroundItem {
        id: "bg2",
        image_name: "bg2",
        price: 100,
    },
    BackgroundItem {
        id: "bg3",
        image_name: "bg3",
        price: 200,
    },
    BackgroundItem {
        id: "bg4",
        image_name: "bg4",
        price: 300,
    },
];

pub static SKINS: [SkinItem; 4] = [
    SkinItem {
        id: "default",
        image_name: "skin_default",
        price: 0,
    },
    SkinItem {
        id: "skin2",
        image_name: "skin2",
        price: 100,
    },
    SkinItem {
        id: "skin3",
        image_name: "skin3",
        price: 200,
    },
    SkinItem {
        id: "skin4",
        image_name: "skin4",
        price: 300,
    },
];

pub static ACHIEVEMENTS: [Achievement; 6] = [
    Achievement {
        id: "first_step",
        image_name: "achieve_first_step",
        reward: ACHIEVEMENT_REWARD,
    },
    Achievement {
        id: "grindilka_veteran",
        image_name: "achieve_grindilka_veteran",
        reward: ACHIEVEMENT_REWARD,
    },
    Achievement {
        id: "master_of_chaos",
        image_name: "achieve_master_of_chaos",
        reward: ACHIEVEMENT_REWARD,
    },
    Achievement {
        id: "true_mutant",
        image_name: "achieve_true_mutant",
        reward: ACHIEVEMENT_REWARD,
    },
    Achievement {
        id: "elusive",
        image_name: "achieve_elusive",
        reward: ACHIEVEMENT_REWARD,
    },
    Achievement {
        id: "adaptation_champion",
        image_name: "achieve_adaptation_champion",
        reward: ACHIEVEMENT_REWARD,
    },
];

/// Achievement ids with an unlock rule in `Progress`
pub mod achievement_ids {
    pub const FIRST_STEP: &str = "first_step";
    pub const GRINDILKA_VETERAN: &str = "grindilka_veteran";
    pub const MASTER_OF_CHAOS: &str = "master_of_chaos";
    pub const ADAPTATION_CHAMPION: &str = "adaptation_champion";
}

pub fn default_background() -> &'static BackgroundItem {
    &BACKGROUNDS[0]
}

pub fn default_skin() -> &'static SkinItem {
    &SKINS[0]
}

/// Background by id, falling back to the first entry
pub fn background(id: &str) -> &'static BackgroundItem {
    BACKGROUNDS
        .iter()
        .find(|b| b.id == id)
        .unwrap_or_else(default_background)
}

/// Skin by id, falling back to the first entry
pub fn skin(id: &str) -> &'static SkinItem {
    SKINS.iter().find(|s| s.id == id).unwrap_or_else(default_skin)
}

pub fn achievement(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_falls_back_to_first() {
        assert_eq!(skin("skin3").price, 200);
        assert_eq!(skin("nope").id, "default");
        assert_eq!(background("bg4").price, 300);
        assert_eq!(background("").id, "bg1");
    }

    #[test]
    fn test_achievement_lookup() {
        assert_eq!(achievement("elusive").map(|a| a.reward), Some(10));
        assert!(achievement("achieve_master_of_chaos").is_none());
        assert!(achievement(achievement_ids::MASTER_OF_CHAOS).is_some());
    }

    #[test]
    fn test_first_entries_are_free() {
        assert_eq!(default_skin().price, 0);
        assert_eq!(default_background().price, 0);
    }
}
