use std::cmp::Ordering;

use crate::models::{Plant, Rarity, Season};

/// Number of entries in the profitability ranking.
const PROFIT_RANKING_LEN: usize = 5;

/// Categorical filter: either a wildcard or a single required value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet<T> {
    /// Match everything.
    All,
    /// Match only this value.
    Only(T),
}

impl<T> Default for Facet<T> {
    fn default() -> Self {
        Facet::All
    }
}

impl<T: Copy + PartialEq> Facet<T> {
    /// Step to the next option in `options`, wrapping back to `All` after the last.
    pub fn cycle(self, options: &[T]) -> Self {
        match self {
            Facet::All => options.first().copied().map(Facet::Only).unwrap_or(Facet::All),
            Facet::Only(current) => options
                .iter()
                .position(|option| *option == current)
                .and_then(|idx| options.get(idx + 1))
                .copied()
                .map(Facet::Only)
                .unwrap_or(Facet::All),
        }
    }

    /// The selected value, if any.
    pub fn value(self) -> Option<T> {
        match self {
            Facet::All => None,
            Facet::Only(value) => Some(value),
        }
    }
}

impl Facet<Rarity> {
    fn matches(self, rarity: Rarity) -> bool {
        self.value().map(|wanted| wanted == rarity).unwrap_or(true)
    }
}

impl Facet<Season> {
    fn matches(self, plant: &Plant) -> bool {
        self.value().map(|season| plant.grows_in(season)).unwrap_or(true)
    }
}

/// Ordering applied to filtered plants. Always ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Case-insensitive name.
    #[default]
    Name,
    /// Level required to plant.
    UnlockLevel,
    /// Coins per sale.
    SellPrice,
    /// Time to grow.
    GrowthTime,
}

impl SortKey {
    /// Every key in selector order.
    pub const ALL: [SortKey; 4] = [
        SortKey::Name,
        SortKey::UnlockLevel,
        SortKey::SellPrice,
        SortKey::GrowthTime,
    ];

    /// Label shown in the sort selector.
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::UnlockLevel => "Unlock Level",
            SortKey::SellPrice => "Sell Price",
            SortKey::GrowthTime => "Growth Time",
        }
    }

    /// Following key, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|key| *key == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Query parameters of the plant browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlantQuery {
    /// Free text matched against name and description.
    pub search: String,
    /// Rarity facet.
    pub rarity: Facet<Rarity>,
    /// Season facet.
    pub season: Facet<Season>,
    /// Sort order.
    pub sort: SortKey,
}

impl PlantQuery {
    /// Whether `plant` passes all three predicates.
    pub fn matches(&self, plant: &Plant) -> bool {
        self.matches_with(plant, &self.needle())
    }

    fn needle(&self) -> String {
        self.search.to_lowercase()
    }

    fn matches_with(&self, plant: &Plant, needle: &str) -> bool {
        text_matches(plant, needle)
            && self.rarity.matches(plant.rarity)
            && self.season.matches(plant)
    }
}

fn text_matches(plant: &Plant, needle: &str) -> bool {
    needle.is_empty()
        || plant.name.to_lowercase().contains(needle)
        || plant.description.to_lowercase().contains(needle)
}

/// Filter and sort `plants` according to `query`.
///
/// Returns a fresh sequence of references; the input is never reordered.
/// Equal keys keep their table order.
pub fn filter_plants<'a>(plants: &'a [Plant], query: &PlantQuery) -> Vec<&'a Plant> {
    let needle = query.needle();
    let mut matched: Vec<&Plant> = plants
        .iter()
        .filter(|plant| query.matches_with(plant, &needle))
        .collect();

    match query.sort {
        SortKey::Name => matched.sort_by_cached_key(|plant| plant.name.to_lowercase()),
        SortKey::UnlockLevel => matched.sort_by_key(|plant| plant.unlock_level),
        SortKey::SellPrice => matched.sort_by_key(|plant| plant.sell_price),
        SortKey::GrowthTime => matched.sort_by_key(|plant| plant.growth_time),
    }
    matched
}

fn profit_rate(plant: &Plant) -> f64 {
    plant.sell_price as f64 / plant.growth_time.max(1) as f64
}

/// Top legendary plants by sell price per unit of growth time, best first.
pub fn top_profitable(plants: &[Plant]) -> Vec<&Plant> {
    let mut legendary: Vec<&Plant> = plants
        .iter()
        .filter(|plant| plant.rarity == Rarity::Legendary)
        .collect();
    legendary.sort_by(|a, b| profit_rate(b).total_cmp(&profit_rate(a)));
    legendary.truncate(PROFIT_RANKING_LEN);
    legendary
}

/// Coins earned per minute of growth.
pub fn coins_per_minute(plant: &Plant) -> f64 {
    profit_rate(plant) * 60_000.0
}

/// Number of plants in each rarity tier, in tier order.
pub fn rarity_counts(plants: &[Plant]) -> Vec<(Rarity, usize)> {
    Rarity::ALL
        .iter()
        .map(|rarity| {
            let count = plants.iter().filter(|plant| plant.rarity == *rarity).count();
            (*rarity, count)
        })
        .collect()
}

/// Number of plants growing in each season. A plant counts once per season it grows in.
pub fn season_counts(plants: &[Plant]) -> Vec<(Season, usize)> {
    Season::ALL
        .iter()
        .map(|season| {
            let count = plants.iter().filter(|plant| plant.grows_in(*season)).count();
            (*season, count)
        })
        .collect()
}

/// All plants from fastest to slowest growing; ties broken by name.
pub fn growth_time_ranking(plants: &[Plant]) -> Vec<&Plant> {
    let mut ranked: Vec<&Plant> = plants.iter().collect();
    ranked.sort_by(|a, b| match a.growth_time.cmp(&b.growth_time) {
        Ordering::Equal => a.name.cmp(&b.name),
        other => other,
    });
    ranked
}

/// Render a millisecond duration as `"{m}m {s}s"`.
pub fn format_growth_time(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    format!("{minutes}m {seconds}s")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::CATALOG, models::PlantStage};

    fn plant(name: &str, rarity: Rarity, seasons: &[Season], growth_secs: u64, sell: u64) -> Plant {
        Plant {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            icon: "🌱".to_string(),
            rarity,
            growth_time: growth_secs * 1_000,
            sell_price: sell,
            buy_price: sell / 2,
            stage: PlantStage::Seed,
            water_needed: 1,
            soil_type: "loam".to_string(),
            seasons: seasons.to_vec(),
            xp_gained: 10,
            description: format!("The {name} plant."),
            unlock_level: 1,
        }
    }

    fn names(plants: &[&Plant]) -> Vec<String> {
        plants.iter().map(|plant| plant.name.clone()).collect()
    }

    #[test]
    fn sorts_by_name() {
        let plants = vec![
            plant("Zinnia", Rarity::Common, &[Season::Spring], 60, 10),
            plant("Apple", Rarity::Common, &[Season::Fall], 60, 10),
        ];
        let result = filter_plants(&plants, &PlantQuery::default());
        assert_eq!(names(&result), vec!["Apple", "Zinnia"]);
        assert_eq!(plants[0].name, "Zinnia", "input must not be reordered");
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let plants = vec![
            plant("Rainbow Rose", Rarity::Legendary, &[Season::Spring], 60, 10),
            plant("Crystal Flower", Rarity::Legendary, &[Season::Winter], 60, 10),
        ];
        let query = PlantQuery {
            search: "ROSE".to_string(),
            ..Default::default()
        };
        assert_eq!(names(&filter_plants(&plants, &query)), vec!["Rainbow Rose"]);

        let query = PlantQuery {
            search: "rose".to_string(),
            ..Default::default()
        };
        assert_eq!(
            names(&filter_plants(CATALOG.plants(), &query)),
            vec!["Rainbow Rose"]
        );

        // Whitespace is part of the needle.
        let query = PlantQuery {
            search: "rose  ".to_string(),
            ..Default::default()
        };
        assert!(filter_plants(&plants, &query).is_empty());
    }

    #[test]
    fn search_checks_description() {
        let query = PlantQuery {
            search: "full moon".to_string(),
            ..Default::default()
        };
        assert_eq!(
            names(&filter_plants(CATALOG.plants(), &query)),
            vec!["Moonlight Lotus"]
        );
    }

    #[test]
    fn facets_are_conjunctive_and_commutative() {
        let plants = CATALOG.plants();
        let both = PlantQuery {
            rarity: Facet::Only(Rarity::Legendary),
            season: Facet::Only(Season::Winter),
            ..Default::default()
        };
        let rarity_only = PlantQuery {
            rarity: Facet::Only(Rarity::Legendary),
            ..Default::default()
        };
        let season_only = PlantQuery {
            season: Facet::Only(Season::Winter),
            ..Default::default()
        };

        let combined = filter_plants(plants, &both);
        assert!(!combined.is_empty());
        for p in &combined {
            assert_eq!(p.rarity, Rarity::Legendary);
            assert!(p.grows_in(Season::Winter));
        }

        let rarity_first: Vec<Plant> = filter_plants(plants, &rarity_only)
            .into_iter()
            .cloned()
            .collect();
        let rarity_then_season = filter_plants(&rarity_first, &season_only);
        let season_first: Vec<Plant> = filter_plants(plants, &season_only)
            .into_iter()
            .cloned()
            .collect();
        let season_then_rarity = filter_plants(&season_first, &rarity_only);

        assert_eq!(names(&rarity_then_season), names(&season_then_rarity));
        assert_eq!(names(&rarity_then_season), names(&combined));
    }

    #[test]
    fn filtering_is_idempotent() {
        let query = PlantQuery {
            search: "a".to_string(),
            season: Facet::Only(Season::Summer),
            sort: SortKey::SellPrice,
            ..Default::default()
        };
        let first = filter_plants(CATALOG.plants(), &query);
        let second = filter_plants(CATALOG.plants(), &query);
        assert_eq!(names(&first), names(&second));
        for pair in first.windows(2) {
            assert!(pair[0].sell_price <= pair[1].sell_price);
        }
    }

    #[test]
    fn empty_result_is_valid() {
        let query = PlantQuery {
            search: "no such plant".to_string(),
            ..Default::default()
        };
        assert!(filter_plants(CATALOG.plants(), &query).is_empty());
        assert!(filter_plants(&[], &PlantQuery::default()).is_empty());
    }

    #[test]
    fn numeric_sorts_ascend() {
        let plants = CATALOG.plants();
        for key in [SortKey::UnlockLevel, SortKey::GrowthTime] {
            let query = PlantQuery {
                sort: key,
                ..Default::default()
            };
            let sorted = filter_plants(plants, &query);
            assert_eq!(sorted.len(), plants.len());
            for pair in sorted.windows(2) {
                match key {
                    SortKey::UnlockLevel => assert!(pair[0].unlock_level <= pair[1].unlock_level),
                    _ => assert!(pair[0].growth_time <= pair[1].growth_time),
                }
            }
        }
    }

    #[test]
    fn profitability_is_strictly_descending() {
        let ranked = top_profitable(CATALOG.plants());
        assert_eq!(ranked.len(), 5);
        assert!(ranked.iter().all(|p| p.rarity == Rarity::Legendary));
        for pair in ranked.windows(2) {
            assert!(profit_rate(pair[0]) > profit_rate(pair[1]));
        }
        assert_eq!(ranked[0].name, "Starfall Orchid");
    }

    #[test]
    fn profitability_with_few_legendaries() {
        let plants = vec![
            plant("Common Weed", Rarity::Common, &[Season::Spring], 1, 1_000),
            plant("Slow Gold", Rarity::Legendary, &[Season::Spring], 600, 600),
            plant("Fast Gold", Rarity::Legendary, &[Season::Spring], 60, 600),
        ];
        assert_eq!(names(&top_profitable(&plants)), vec!["Fast Gold", "Slow Gold"]);
    }

    #[test]
    fn facet_cycles_through_options() {
        let mut facet: Facet<Season> = Facet::All;
        let mut seen = Vec::new();
        for _ in 0..5 {
            facet = facet.cycle(&Season::ALL);
            seen.push(facet);
        }
        assert_eq!(
            seen,
            vec![
                Facet::Only(Season::Spring),
                Facet::Only(Season::Summer),
                Facet::Only(Season::Fall),
                Facet::Only(Season::Winter),
                Facet::All,
            ]
        );
        assert_eq!(SortKey::GrowthTime.next(), SortKey::Name);
    }

    #[test]
    fn statistics_helpers() {
        let plants = vec![
            plant("A", Rarity::Common, &[Season::Spring, Season::Summer], 90, 30),
            plant("B", Rarity::Epic, &[Season::Summer], 30, 30),
        ];
        let rarity = rarity_counts(&plants);
        assert_eq!(rarity[0], (Rarity::Common, 1));
        assert_eq!(rarity[3], (Rarity::Epic, 1));
        assert_eq!(rarity[4], (Rarity::Legendary, 0));

        let seasons = season_counts(&plants);
        assert_eq!(seasons[1], (Season::Summer, 2));
        assert_eq!(seasons[3], (Season::Winter, 0));

        assert_eq!(names(&growth_time_ranking(&plants)), vec!["B", "A"]);
        assert!((coins_per_minute(&plants[1]) - 60.0).abs() < 1e-9);
        assert_eq!(format_growth_time(90_500), "1m 30s");
    }
}
