use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// XP span of a single level as drawn by the header progress bar.
const XP_PER_LEVEL: f64 = 1000.0;

/// Colour scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Light palette.
    Light,
    /// Dark palette.
    Dark,
    /// Follow the terminal.
    #[default]
    Auto,
}

/// Player-controlled toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSettings {
    /// Harvest automatically when a plant is ready.
    pub auto_harvest: bool,
    /// Water automatically when a plant is dry.
    pub auto_water: bool,
    /// Show in-app notifications.
    pub notifications: bool,
    /// Play sounds.
    pub sound_enabled: bool,
    /// Colour scheme.
    pub theme: ThemePreference,
    /// Action name to key mapping.
    #[serde(default)]
    pub key_bindings: BTreeMap<String, String>,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            auto_harvest: false,
            auto_water: false,
            notifications: true,
            sound_enabled: true,
            theme: ThemePreference::Auto,
            key_bindings: BTreeMap::new(),
        }
    }
}

/// Authoritative player state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    /// Player identifier.
    pub id: String,
    /// Display name.
    pub username: String,
    /// Current level. Not recomputed from `xp`.
    pub level: u32,
    /// Lifetime experience points.
    pub xp: u64,
    /// Soft currency.
    pub coins: u64,
    /// Premium currency.
    pub gems: u64,
    /// Number of farm plots.
    pub farm_size: u32,
    /// Catalog keys of plants the player may grow.
    #[serde(default)]
    pub plants_unlocked: BTreeSet<String>,
    /// Catalog keys of owned pets.
    #[serde(default)]
    pub pets_owned: BTreeSet<String>,
    /// Catalog keys of owned tools.
    #[serde(default)]
    pub tools_owned: BTreeSet<String>,
    /// Achievement identifiers earned.
    #[serde(default)]
    pub achievements: BTreeSet<String>,
    /// Last time the player signed in.
    pub last_login: DateTime<Utc>,
    /// Total play time in seconds.
    pub play_time: u64,
    /// Player settings.
    #[serde(default)]
    pub settings: PlayerSettings,
}

impl PlayerProfile {
    /// Starter profile for a fresh player.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            level: 1,
            xp: 0,
            coins: 100,
            gems: 0,
            farm_size: 9,
            plants_unlocked: BTreeSet::new(),
            pets_owned: BTreeSet::new(),
            tools_owned: BTreeSet::new(),
            achievements: BTreeSet::new(),
            last_login: Utc::now(),
            play_time: 0,
            settings: PlayerSettings::default(),
        }
    }

    /// Percentage through the current level, clamped to `0..=100`.
    ///
    /// The level is taken as given; a profile whose XP sits outside the
    /// level's band reads as empty or full rather than being corrected.
    pub fn level_progress(&self) -> f64 {
        let floor = f64::from(self.level) * XP_PER_LEVEL;
        let percent = (self.xp as f64 - floor) / XP_PER_LEVEL * 100.0;
        percent.clamp(0.0, 100.0)
    }
}

/// Partial profile update; only `Some` fields overwrite.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub id: Option<String>,
    pub username: Option<String>,
    pub level: Option<u32>,
    pub xp: Option<u64>,
    pub coins: Option<u64>,
    pub gems: Option<u64>,
    pub farm_size: Option<u32>,
    pub plants_unlocked: Option<BTreeSet<String>>,
    pub pets_owned: Option<BTreeSet<String>>,
    pub tools_owned: Option<BTreeSet<String>>,
    pub achievements: Option<BTreeSet<String>>,
    pub last_login: Option<DateTime<Utc>>,
    pub play_time: Option<u64>,
    pub settings: Option<PlayerSettings>,
}

impl ProfileUpdate {
    /// Whether applying this update would move `profile.xp` backwards.
    pub fn lowers_xp(&self, profile: &PlayerProfile) -> bool {
        self.xp.map(|xp| xp < profile.xp).unwrap_or(false)
    }

    /// Overwrite the fields present in the update, leaving the rest untouched.
    pub fn apply_to(self, profile: &mut PlayerProfile) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = self.$field {
                        profile.$field = value;
                    }
                )*
            };
        }

        merge!(
            id,
            username,
            level,
            xp,
            coins,
            gems,
            farm_size,
            plants_unlocked,
            pets_owned,
            tools_owned,
            achievements,
            last_login,
            play_time,
            settings,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_progress_is_clamped() {
        let mut profile = PlayerProfile::new("p1", "Fern");
        profile.level = 3;

        profile.xp = 3_250;
        assert!((profile.level_progress() - 25.0).abs() < f64::EPSILON);

        profile.xp = 100;
        assert_eq!(profile.level_progress(), 0.0);

        profile.xp = 9_000;
        assert_eq!(profile.level_progress(), 100.0);
    }

    #[test]
    fn update_overwrites_only_present_fields() {
        let mut profile = PlayerProfile::new("p1", "Fern");
        let original = profile.clone();

        ProfileUpdate {
            coins: Some(2_450),
            username: Some("Moss".to_string()),
            ..Default::default()
        }
        .apply_to(&mut profile);

        assert_eq!(profile.coins, 2_450);
        assert_eq!(profile.username, "Moss");
        assert_eq!(profile.level, original.level);
        assert_eq!(profile.xp, original.xp);
        assert_eq!(profile.settings, original.settings);
        assert_eq!(profile.last_login, original.last_login);
    }

    #[test]
    fn detects_xp_regression() {
        let mut profile = PlayerProfile::new("p1", "Fern");
        profile.xp = 500;
        let lower = ProfileUpdate {
            xp: Some(400),
            ..Default::default()
        };
        let higher = ProfileUpdate {
            xp: Some(600),
            ..Default::default()
        };
        assert!(lower.lowers_xp(&profile));
        assert!(!higher.lowers_xp(&profile));
        assert!(!ProfileUpdate::default().lowers_xp(&profile));
    }
}
