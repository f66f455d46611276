//! Static game catalog and the plant query layer.

mod data;
/// Filtering, sorting and derived rankings over the plant table.
pub mod query;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::models::{Pet, Plant, Tool};

pub use data::CATALOG_VERSION;
pub use query::{
    coins_per_minute, filter_plants, format_growth_time, growth_time_ranking, rarity_counts,
    season_counts, top_profitable, Facet, PlantQuery, SortKey,
};

/// Process-wide catalog, built on first access and never mutated.
pub static CATALOG: Lazy<Catalog> = Lazy::new(data::build);

/// Read-only reference tables for plants, pets and tools.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    version: String,
    plants: Vec<Plant>,
    pets: Vec<Pet>,
    tools: Vec<Tool>,
}

impl Catalog {
    /// Version stamp of the bundled tables.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// All plants in table order.
    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    /// All pets in table order.
    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    /// All tools in table order.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Look up a plant by catalog key.
    pub fn plant(&self, id: &str) -> Option<&Plant> {
        self.plants.iter().find(|plant| plant.id == id)
    }

    /// Look up a pet by catalog key.
    pub fn pet(&self, id: &str) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.id == id)
    }

    /// Look up a tool by catalog key.
    pub fn tool(&self, id: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_catalog_lookups() {
        assert!(!CATALOG.plants().is_empty());
        assert_eq!(
            CATALOG.plant("rainbow-rose").map(|p| p.name.as_str()),
            Some("Rainbow Rose")
        );
        assert_eq!(CATALOG.pet("bee").map(|p| p.ability.as_str()), Some("Pollinate"));
        assert!(CATALOG.tool("sprinkler").is_some());
        assert!(CATALOG.plant("missing").is_none());
        assert_eq!(CATALOG.version(), CATALOG_VERSION);
    }
}
