//! Built-in catalog tables.

use crate::models::{Pet, Plant, PlantStage, Rarity, Season, Tool, ToolKind};

use super::Catalog;

/// Version stamp of the tables below; bump whenever a row changes.
pub const CATALOG_VERSION: &str = "2024.08";

use PlantStage::*;
use Rarity::*;
use Season::*;

const ALL_YEAR: &[Season] = &[Spring, Summer, Fall, Winter];

struct PlantRow {
    id: &'static str,
    name: &'static str,
    icon: &'static str,
    rarity: Rarity,
    growth_secs: u64,
    sell: u64,
    buy: u64,
    stage: PlantStage,
    water: u32,
    soil: &'static str,
    seasons: &'static [Season],
    xp: u64,
    unlock: u32,
    description: &'static str,
}

#[rustfmt::skip]
const PLANTS: &[PlantRow] = &[
    PlantRow { id: "carrot", name: "Carrot", icon: "🥕", rarity: Common, growth_secs: 60, sell: 15, buy: 5, stage: Seed, water: 1, soil: "loam", seasons: &[Spring, Fall], xp: 5, unlock: 1, description: "A crunchy starter crop that grows in no time." },
    PlantRow { id: "strawberry", name: "Strawberry", icon: "🍓", rarity: Common, growth_secs: 120, sell: 30, buy: 10, stage: Seed, water: 2, soil: "loam", seasons: &[Spring, Summer], xp: 8, unlock: 1, description: "Sweet red berries that regrow after picking." },
    PlantRow { id: "tomato", name: "Tomato", icon: "🍅", rarity: Common, growth_secs: 180, sell: 40, buy: 15, stage: Seed, water: 2, soil: "loam", seasons: &[Summer], xp: 10, unlock: 2, description: "Juicy vine fruit loved by every kitchen." },
    PlantRow { id: "potato", name: "Potato", icon: "🥔", rarity: Common, growth_secs: 150, sell: 25, buy: 8, stage: Seed, water: 1, soil: "sandy", seasons: &[Spring, Fall, Winter], xp: 6, unlock: 1, description: "Hardy tuber that shrugs off the cold." },
    PlantRow { id: "blueberry", name: "Blueberry", icon: "🫐", rarity: Uncommon, growth_secs: 300, sell: 75, buy: 30, stage: Seed, water: 2, soil: "acidic", seasons: &[Summer], xp: 18, unlock: 4, description: "Tiny berries packed with flavour." },
    PlantRow { id: "corn", name: "Corn", icon: "🌽", rarity: Uncommon, growth_secs: 420, sell: 90, buy: 35, stage: Seed, water: 3, soil: "loam", seasons: &[Summer, Fall], xp: 20, unlock: 5, description: "Tall golden stalks that tower over the garden." },
    PlantRow { id: "tulip", name: "Tulip", icon: "🌷", rarity: Uncommon, growth_secs: 240, sell: 60, buy: 25, stage: Seed, water: 2, soil: "loam", seasons: &[Spring], xp: 15, unlock: 3, description: "Cheerful cup-shaped bloom that opens with the first warm days." },
    PlantRow { id: "pumpkin", name: "Pumpkin", icon: "🎃", rarity: Uncommon, growth_secs: 600, sell: 140, buy: 50, stage: Seed, water: 3, soil: "loam", seasons: &[Fall], xp: 30, unlock: 6, description: "A heavy autumn gourd, perfect for festivals." },
    PlantRow { id: "watermelon", name: "Watermelon", icon: "🍉", rarity: Rare, growth_secs: 900, sell: 260, buy: 100, stage: Seed, water: 4, soil: "sandy", seasons: &[Summer], xp: 55, unlock: 10, description: "Huge striped melon bursting with juice." },
    PlantRow { id: "cactus", name: "Cactus", icon: "🌵", rarity: Rare, growth_secs: 1_200, sell: 300, buy: 120, stage: Seed, water: 1, soil: "sandy", seasons: ALL_YEAR, xp: 60, unlock: 12, description: "Prickly desert survivor that barely needs water." },
    PlantRow { id: "bamboo", name: "Bamboo", icon: "🎋", rarity: Rare, growth_secs: 1_500, sell: 380, buy: 150, stage: Seed, water: 3, soil: "clay", seasons: &[Spring, Summer], xp: 70, unlock: 14, description: "Fast-climbing cane with a calming rustle." },
    PlantRow { id: "glow-mushroom", name: "Glow Mushroom", icon: "🍄", rarity: Rare, growth_secs: 1_800, sell: 420, buy: 180, stage: Seed, water: 2, soil: "peat", seasons: &[Fall, Winter], xp: 80, unlock: 15, description: "Faintly luminous caps that thrive in the dark." },
    PlantRow { id: "frost-lily", name: "Frost Lily", icon: "❄️", rarity: Epic, growth_secs: 3_600, sell: 900, buy: 400, stage: Seed, water: 3, soil: "peat", seasons: &[Winter], xp: 150, unlock: 20, description: "Icy petals that only open under fresh snow." },
    PlantRow { id: "cherry-blossom", name: "Cherry Blossom", icon: "🌸", rarity: Epic, growth_secs: 5_400, sell: 1_200, buy: 500, stage: Seed, water: 3, soil: "loam", seasons: &[Spring], xp: 180, unlock: 22, description: "A pink cloud of petals that drifts across the farm." },
    PlantRow { id: "venus-flytrap", name: "Venus Flytrap", icon: "🪴", rarity: Epic, growth_secs: 4_500, sell: 1_000, buy: 450, stage: Seed, water: 4, soil: "peat", seasons: &[Summer], xp: 160, unlock: 24, description: "Snappy carnivore that keeps pests away from neighbours." },
    PlantRow { id: "sunflower-giant", name: "Giant Sunflower", icon: "🌻", rarity: Epic, growth_secs: 7_200, sell: 1_500, buy: 600, stage: Seed, water: 4, soil: "loam", seasons: &[Summer, Fall], xp: 200, unlock: 25, description: "Towering bloom that follows the sun all day." },
    PlantRow { id: "golden-apple-tree", name: "Golden Apple Tree", icon: "🍎", rarity: Legendary, growth_secs: 14_400, sell: 5_000, buy: 2_000, stage: Seed, water: 5, soil: "enchanted", seasons: &[Summer, Fall], xp: 100, unlock: 30, description: "Bears apples of solid gold once a season." },
    PlantRow { id: "rainbow-rose", name: "Rainbow Rose", icon: "🌹", rarity: Legendary, growth_secs: 28_800, sell: 3_200, buy: 1_500, stage: Seed, water: 4, soil: "enchanted", seasons: &[Spring, Summer], xp: 400, unlock: 32, description: "Each petal shimmers in a different colour." },
    PlantRow { id: "crystal-flower", name: "Crystal Flower", icon: "💎", rarity: Legendary, growth_secs: 7_200, sell: 2_400, buy: 1_000, stage: Seed, water: 3, soil: "crystal", seasons: &[Winter], xp: 350, unlock: 35, description: "Petals of living quartz that chime in the wind." },
    PlantRow { id: "moonlight-lotus", name: "Moonlight Lotus", icon: "🪷", rarity: Legendary, growth_secs: 21_600, sell: 6_000, buy: 2_500, stage: Seed, water: 5, soil: "water", seasons: &[Summer], xp: 450, unlock: 38, description: "Blooms only beneath a full moon." },
    PlantRow { id: "dragon-fruit-vine", name: "Dragon Fruit Vine", icon: "🐉", rarity: Legendary, growth_secs: 10_800, sell: 4_200, buy: 1_800, stage: Seed, water: 4, soil: "volcanic", seasons: &[Summer, Fall], xp: 380, unlock: 40, description: "Fiery fruit said to warm the whole garden." },
    PlantRow { id: "phoenix-sunflower", name: "Phoenix Sunflower", icon: "🔥", rarity: Legendary, growth_secs: 43_200, sell: 9_000, buy: 4_000, stage: Seed, water: 5, soil: "volcanic", seasons: ALL_YEAR, xp: 600, unlock: 45, description: "Burns to ash and regrows brighter every cycle." },
    PlantRow { id: "starfall-orchid", name: "Starfall Orchid", icon: "✨", rarity: Legendary, growth_secs: 3_600, sell: 1_500, buy: 700, stage: Seed, water: 2, soil: "enchanted", seasons: &[Winter, Spring], xp: 300, unlock: 42, description: "Catches falling stars in its glowing petals." },
];

fn build_plants() -> Vec<Plant> {
    PLANTS
        .iter()
        .map(|row| Plant {
            id: row.id.to_string(),
            name: row.name.to_string(),
            icon: row.icon.to_string(),
            rarity: row.rarity,
            growth_time: row.growth_secs * 1_000,
            sell_price: row.sell,
            buy_price: row.buy,
            stage: row.stage,
            water_needed: row.water,
            soil_type: row.soil.to_string(),
            seasons: row.seasons.to_vec(),
            xp_gained: row.xp,
            description: row.description.to_string(),
            unlock_level: row.unlock,
        })
        .collect()
}

fn build_pets() -> Vec<Pet> {
    let pet = |id: &str,
               name: &str,
               icon: &str,
               rarity: Rarity,
               ability: &str,
               ability_description: &str,
               stats: (u32, u32, u32, u64)| {
        let (speed, efficiency, unlock_level, price) = stats;
        Pet {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            rarity,
            ability: ability.to_string(),
            ability_description: ability_description.to_string(),
            speed,
            efficiency,
            unlock_level,
            price,
        }
    };

    #[rustfmt::skip]
    let pets = vec![
        pet("bunny", "Garden Bunny", "🐰", Common, "Nibble Weeds", "Clears weeds from nearby plots.", (6, 3, 1, 250)),
        pet("bee", "Busy Bee", "🐝", Uncommon, "Pollinate", "Speeds up flowering plants by 10%.", (8, 5, 5, 900)),
        pet("hedgehog", "Hedgehog", "🦔", Uncommon, "Pest Patrol", "Scares off crop-eating bugs.", (4, 6, 8, 1_200)),
        pet("owl", "Night Owl", "🦉", Rare, "Night Watch", "Plants keep growing at full speed overnight.", (7, 7, 15, 4_000)),
        pet("fox", "Golden Fox", "🦊", Epic, "Treasure Sniff", "Occasionally digs up bonus coins.", (9, 8, 25, 12_000)),
        pet("dragon", "Garden Dragon", "🐲", Legendary, "Ember Breath", "Instantly ripens one random plant every hour.", (10, 10, 40, 50_000)),
    ];
    pets
}

fn build_tools() -> Vec<Tool> {
    let tool = |id: &str, name: &str, icon: &str, kind: ToolKind, stats: (u32, u32, u64, u32)| {
        let (efficiency, durability, price, unlock_level) = stats;
        Tool {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            kind,
            efficiency,
            durability,
            price,
            unlock_level,
        }
    };

    vec![
        tool("watering-can", "Watering Can", "🚿", ToolKind::Watering, (1, 100, 50, 1)),
        tool("golden-watering-can", "Golden Watering Can", "🏆", ToolKind::Watering, (3, 500, 2_500, 15)),
        tool("sprinkler", "Sprinkler", "💦", ToolKind::Watering, (5, 1_000, 8_000, 25)),
        tool("sickle", "Sickle", "🔪", ToolKind::Harvesting, (2, 200, 300, 3)),
        tool("trowel", "Trowel", "🥄", ToolKind::Planting, (2, 250, 200, 2)),
        tool("growth-lamp", "Growth Lamp", "💡", ToolKind::Special, (4, 300, 6_000, 20)),
    ]
}

pub(super) fn build() -> Catalog {
    Catalog {
        version: CATALOG_VERSION.to_string(),
        plants: build_plants(),
        pets: build_pets(),
        tools: build_tools(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_are_unique() {
        let catalog = build();
        let mut seen = HashSet::new();
        for id in catalog
            .plants
            .iter()
            .map(|p| &p.id)
            .chain(catalog.pets.iter().map(|p| &p.id))
            .chain(catalog.tools.iter().map(|t| &t.id))
        {
            assert!(seen.insert(id.clone()), "duplicate catalog id {id}");
        }
    }

    #[test]
    fn every_plant_has_a_season_and_growth_time() {
        for plant in build().plants {
            assert!(!plant.seasons.is_empty(), "{} has no season", plant.id);
            assert!(plant.growth_time > 0, "{} grows instantly", plant.id);
        }
    }
}
