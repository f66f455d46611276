//! Shared domain models.

mod player;
mod progress;

use serde::{Deserialize, Serialize};

pub use player::{PlayerProfile, PlayerSettings, ProfileUpdate, ThemePreference};
pub use progress::{
    Achievement, FarmStats, ItemKind, MarketItem, Notification, NotificationDraft, Quest,
    QuestKind, TradeOffer,
};

/// Rarity tier shared by plants and pets, ordered from most to least common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    /// Everyday stock.
    Common,
    /// Slightly harder to find.
    Uncommon,
    /// Rare drops.
    Rare,
    /// Epic drops.
    Epic,
    /// Highest tier.
    Legendary,
}

impl Rarity {
    /// Every tier in ascending order.
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Capitalised label for display.
    pub fn label(self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }
}

/// Growing season a plant can be planted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// March to May.
    Spring,
    /// June to August.
    Summer,
    /// September to November.
    Fall,
    /// December to February.
    Winter,
}

impl Season {
    /// Every season in calendar order.
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// Capitalised label for display.
    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

/// Lifecycle stage of a plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantStage {
    /// Freshly planted.
    Seed,
    /// First leaves.
    Sprout,
    /// Mid growth.
    Growing,
    /// Fully grown.
    Mature,
    /// Ready to collect.
    Harvestable,
}

/// Category of a tool in the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Watering cans and sprinklers.
    Watering,
    /// Sickles and harvesters.
    Harvesting,
    /// Trowels and seeders.
    Planting,
    /// Everything else.
    Special,
}

/// Static plant record from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    /// Unique catalog key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Emoji glyph.
    pub icon: String,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Time to grow in milliseconds.
    pub growth_time: u64,
    /// Coins earned when sold.
    pub sell_price: u64,
    /// Seed cost in coins.
    pub buy_price: u64,
    /// Stage the catalog entry is illustrated at.
    pub stage: PlantStage,
    /// Waterings required before harvest.
    pub water_needed: u32,
    /// Preferred soil.
    pub soil_type: String,
    /// Seasons the plant grows in.
    #[serde(rename = "season")]
    pub seasons: Vec<Season>,
    /// XP awarded per harvest.
    pub xp_gained: u64,
    /// Flavour text.
    pub description: String,
    /// Player level needed to plant it.
    pub unlock_level: u32,
}

impl Plant {
    /// Whether the plant grows in the given season.
    pub fn grows_in(&self, season: Season) -> bool {
        self.seasons.contains(&season)
    }
}

/// Static pet record from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    /// Unique catalog key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Emoji glyph.
    pub icon: String,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Short ability name.
    pub ability: String,
    /// What the ability does.
    pub ability_description: String,
    /// Movement speed rating.
    pub speed: u32,
    /// Work efficiency rating.
    pub efficiency: u32,
    /// Player level needed to adopt it.
    pub unlock_level: u32,
    /// Price in coins.
    pub price: u64,
}

/// Static tool record from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Unique catalog key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Emoji glyph.
    pub icon: String,
    /// Tool category.
    #[serde(rename = "type")]
    pub kind: ToolKind,
    /// Work efficiency rating.
    pub efficiency: u32,
    /// Uses before breaking.
    pub durability: u32,
    /// Price in coins.
    pub price: u64,
    /// Player level needed to buy it.
    pub unlock_level: u32,
}
