//! Session state container and its mutation actions.
//!
//! [`GameStore`] owns every mutable entity of a session. Views read it
//! through a [`StoreHandle`] and call the action methods below; mutations of
//! the persisted slice (profile, farm stats, completed quests, achievements)
//! are written through the optional [`SnapshotManager`] as they happen.

mod handle;

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{
    catalog::Catalog,
    models::{
        Achievement, FarmStats, MarketItem, Notification, NotificationDraft, Pet, Plant,
        PlayerProfile, ProfileUpdate, Quest, Tool, TradeOffer,
    },
    snapshot::{PersistedState, SnapshotManager},
};

pub use handle::StoreHandle;

/// Tab shown when nothing else was selected.
pub const DEFAULT_TAB: &str = "dashboard";

static LAST_NOTIFICATION_ID: AtomicU64 = AtomicU64::new(0);

/// Millisecond timestamp, bumped past the last issued value so ids never repeat.
fn next_notification_id() -> String {
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let previous = LAST_NOTIFICATION_ID
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last.saturating_add(1)))
        })
        .unwrap_or_else(|last| last);
    now.max(previous.saturating_add(1)).to_string()
}

/// Everything the dashboard knows during a session.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Current player, if signed in.
    pub profile: Option<PlayerProfile>,
    /// Whether the game client is reachable.
    pub is_connected: bool,
    /// Session copy of the plant table.
    pub plants: Vec<Plant>,
    /// Session copy of the pet table.
    pub pets: Vec<Pet>,
    /// Session copy of the tool table.
    pub tools: Vec<Tool>,
    /// Market listings.
    pub market_items: Vec<MarketItem>,
    /// Open trade offers.
    pub trade_offers: Vec<TradeOffer>,
    /// Quests in progress.
    pub active_quests: Vec<Quest>,
    /// Finished quests.
    pub completed_quests: Vec<Quest>,
    /// Earned achievements.
    pub achievements: Vec<Achievement>,
    /// Lifetime farm counters.
    pub farm_stats: FarmStats,
    /// Identifier of the selected tab.
    pub active_tab: String,
    /// Pending notifications in insertion order.
    pub notifications: Vec<Notification>,
    /// Whether the loading screen is up.
    pub is_loading: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            profile: None,
            is_connected: false,
            plants: Vec::new(),
            pets: Vec::new(),
            tools: Vec::new(),
            market_items: Vec::new(),
            trade_offers: Vec::new(),
            active_quests: Vec::new(),
            completed_quests: Vec::new(),
            achievements: Vec::new(),
            farm_stats: FarmStats::default(),
            active_tab: DEFAULT_TAB.to_string(),
            notifications: Vec::new(),
            is_loading: false,
        }
    }
}

impl GameState {
    /// Copy out the slice of state that is persisted.
    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            profile: self.profile.clone(),
            farm_stats: self.farm_stats,
            completed_quests: self.completed_quests.clone(),
            achievements: self.achievements.clone(),
        }
    }

    fn restore(&mut self, saved: PersistedState) {
        self.profile = saved.profile;
        self.farm_stats = saved.farm_stats;
        self.completed_quests = saved.completed_quests;
        self.achievements = saved.achievements;
    }
}

/// Owner of the session state.
#[derive(Debug, Default)]
pub struct GameStore {
    state: GameState,
    snapshots: Option<SnapshotManager>,
}

impl GameStore {
    /// In-memory store that never touches disk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that writes through `snapshots` but starts from defaults.
    pub fn with_snapshots(snapshots: SnapshotManager) -> Self {
        Self {
            state: GameState::default(),
            snapshots: Some(snapshots),
        }
    }

    /// Store rehydrated from the snapshot, if a readable one exists.
    ///
    /// A missing snapshot starts from defaults; an unreadable or malformed
    /// one is logged and ignored.
    pub fn hydrate(snapshots: SnapshotManager) -> Self {
        let mut state = GameState::default();
        match snapshots.load() {
            Ok(Some(saved)) => {
                info!(
                    path = %snapshots.path().display(),
                    has_profile = saved.profile.is_some(),
                    "Restored saved state"
                );
                state.restore(saved);
            }
            Ok(None) => debug!(path = %snapshots.path().display(), "No saved state"),
            Err(err) => warn!("Ignoring saved state: {err}"),
        }
        Self {
            state,
            snapshots: Some(snapshots),
        }
    }

    /// Current state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current profile, if any.
    pub fn profile(&self) -> Option<&PlayerProfile> {
        self.state.profile.as_ref()
    }

    /// Replace the profile wholesale.
    pub fn set_profile(&mut self, profile: PlayerProfile) {
        info!(player = %profile.id, level = profile.level, "Profile set");
        self.state.profile = Some(profile);
        self.commit();
    }

    /// Merge `update` into the profile. Does nothing when no profile is set.
    pub fn update_profile(&mut self, update: ProfileUpdate) {
        let Some(profile) = self.state.profile.as_mut() else {
            debug!("Profile update ignored; no profile set");
            return;
        };
        if update.lowers_xp(profile) {
            warn!(
                player = %profile.id,
                from = profile.xp,
                to = update.xp.unwrap_or_default(),
                "Profile update lowers XP"
            );
        }
        update.apply_to(profile);
        self.commit();
    }

    /// Record whether the game client is reachable.
    pub fn set_connected(&mut self, connected: bool) {
        self.state.is_connected = connected;
    }

    /// Show or hide the loading screen.
    pub fn set_loading(&mut self, loading: bool) {
        self.state.is_loading = loading;
    }

    /// Select a tab by identifier.
    pub fn set_active_tab(&mut self, tab: impl Into<String>) {
        self.state.active_tab = tab.into();
    }

    /// Append a notification and return its identifier.
    pub fn add_notification(&mut self, draft: NotificationDraft) -> String {
        let id = next_notification_id();
        self.state
            .notifications
            .push(draft.into_notification(id.clone()));
        id
    }

    /// Remove the notification with `id`, if present.
    pub fn remove_notification(&mut self, id: &str) {
        if let Some(pos) = self.state.notifications.iter().position(|n| n.id == id) {
            self.state.notifications.remove(pos);
        }
    }

    /// Install session copies of the catalog tables.
    pub fn set_catalogs(&mut self, plants: Vec<Plant>, pets: Vec<Pet>, tools: Vec<Tool>) {
        self.state.plants = plants;
        self.state.pets = pets;
        self.state.tools = tools;
    }

    /// Install the tables of `catalog`.
    pub fn load_catalog(&mut self, catalog: &Catalog) {
        self.set_catalogs(
            catalog.plants().to_vec(),
            catalog.pets().to_vec(),
            catalog.tools().to_vec(),
        );
    }

    /// Count a harvest and what it earned.
    pub fn record_harvest(&mut self, coins: u64, xp: u64) {
        self.state.farm_stats.record_harvest(coins, xp);
        self.commit();
    }

    /// Count newly planted seeds.
    pub fn record_planting(&mut self, count: u64) {
        self.state.farm_stats.record_planting(count);
        self.commit();
    }

    /// Add session time in seconds.
    pub fn add_play_time(&mut self, seconds: u64) {
        self.state.farm_stats.add_play_time(seconds);
        self.commit();
    }

    /// Replace the active quest list.
    pub fn set_active_quests(&mut self, quests: Vec<Quest>) {
        self.state.active_quests = quests;
    }

    /// Move an active quest to the completed list. Returns whether one moved.
    pub fn complete_quest(&mut self, id: &str) -> bool {
        let Some(pos) = self.state.active_quests.iter().position(|q| q.id == id) else {
            return false;
        };
        let mut quest = self.state.active_quests.remove(pos);
        quest.completed = true;
        info!(quest = %quest.id, "Quest completed");
        self.state.completed_quests.push(quest);
        self.commit();
        true
    }

    /// Drop active quests whose expiry is at or before `now`. Returns how many went.
    pub fn expire_quests(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.state.active_quests.len();
        self.state.active_quests.retain(|quest| !quest.is_expired(now));
        let removed = before - self.state.active_quests.len();
        if removed > 0 {
            debug!(removed, "Expired quests dropped");
        }
        removed
    }

    /// Record an achievement unless one with the same id exists. Returns whether it was new.
    pub fn unlock_achievement(&mut self, achievement: Achievement) -> bool {
        if self
            .state
            .achievements
            .iter()
            .any(|existing| existing.id == achievement.id)
        {
            return false;
        }
        info!(achievement = %achievement.id, "Achievement unlocked");
        self.state.achievements.push(achievement);
        self.commit();
        true
    }

    /// Replace the market listings.
    pub fn set_market_items(&mut self, items: Vec<MarketItem>) {
        self.state.market_items = items;
    }

    /// Replace the open trade offers.
    pub fn set_trade_offers(&mut self, offers: Vec<TradeOffer>) {
        self.state.trade_offers = offers;
    }

    fn commit(&self) {
        let Some(snapshots) = self.snapshots.as_ref() else {
            return;
        };
        if let Err(err) = snapshots.persist(&self.state.persisted()) {
            warn!("Failed to save state: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{catalog::CATALOG, models::QuestKind};
    use anyhow::Result;
    use chrono::Duration;
    use serde_json::json;
    use tempfile::tempdir;

    fn profile() -> PlayerProfile {
        let mut profile = PlayerProfile::new("player-1", "Fern");
        profile.level = 4;
        profile.xp = 4_200;
        profile.coins = 900;
        profile
    }

    fn quest(id: &str, expires_at: Option<DateTime<Utc>>) -> Quest {
        Quest {
            id: id.to_string(),
            title: format!("Quest {id}"),
            description: "Harvest crops".to_string(),
            kind: QuestKind::Weekly,
            requirements: [("harvest".to_string(), 20)].into(),
            rewards: [("coins".to_string(), 500)].into(),
            progress: [("harvest".to_string(), 10)].into(),
            completed: false,
            expires_at,
        }
    }

    fn achievement(id: &str) -> Achievement {
        Achievement {
            id: id.to_string(),
            kind: "milestone".to_string(),
            payload: json!({"title": id}),
        }
    }

    #[test]
    fn update_without_profile_is_noop() {
        let mut store = GameStore::new();
        store.update_profile(ProfileUpdate {
            coins: Some(10),
            ..Default::default()
        });
        assert!(store.profile().is_none());
        assert_eq!(store.state(), &GameState::default());
    }

    #[test]
    fn update_merges_into_profile() {
        let mut store = GameStore::new();
        let original = profile();
        store.set_profile(original.clone());
        store.update_profile(ProfileUpdate {
            gems: Some(12),
            level: Some(5),
            ..Default::default()
        });

        let mut expected = original;
        expected.gems = 12;
        expected.level = 5;
        assert_eq!(store.profile(), Some(&expected));
    }

    #[test]
    fn xp_regression_is_still_applied() {
        let mut store = GameStore::new();
        store.set_profile(profile());
        store.update_profile(ProfileUpdate {
            xp: Some(10),
            ..Default::default()
        });
        assert_eq!(store.profile().map(|p| p.xp), Some(10));
    }

    #[test]
    fn flag_setters() {
        let mut store = GameStore::new();
        store.set_connected(true);
        store.set_loading(true);
        store.set_active_tab("plants");
        assert!(store.state().is_connected);
        assert!(store.state().is_loading);
        assert_eq!(store.state().active_tab, "plants");
    }

    #[test]
    fn notifications_keep_order_and_unique_ids() {
        let mut store = GameStore::new();
        let ids: Vec<String> = (0..4)
            .map(|_| store.add_notification(NotificationDraft::new("info", "Same text")))
            .collect();
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());

        store.remove_notification(&ids[1]);
        let remaining: Vec<&str> = store
            .state()
            .notifications
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(remaining, vec![ids[0].as_str(), ids[2].as_str(), ids[3].as_str()]);

        let before = store.state().notifications.clone();
        store.remove_notification("does-not-exist");
        assert_eq!(store.state().notifications, before);
    }

    #[test]
    fn quests_complete_and_expire() {
        let mut store = GameStore::new();
        let now = Utc::now();
        store.set_active_quests(vec![
            quest("a", None),
            quest("b", Some(now - Duration::minutes(1))),
            quest("c", Some(now + Duration::hours(1))),
        ]);

        assert!(store.complete_quest("a"));
        assert!(!store.complete_quest("a"));
        assert_eq!(store.state().completed_quests.len(), 1);
        assert!(store.state().completed_quests[0].completed);

        assert_eq!(store.expire_quests(now), 1);
        let active: Vec<&str> = store
            .state()
            .active_quests
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(active, vec!["c"]);
    }

    #[test]
    fn achievements_are_deduplicated() {
        let mut store = GameStore::new();
        assert!(store.unlock_achievement(achievement("first-harvest")));
        assert!(!store.unlock_achievement(achievement("first-harvest")));
        assert_eq!(store.state().achievements.len(), 1);
    }

    #[test]
    fn persisted_subset_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let snapshots = SnapshotManager::new(dir.path(), "store");

        let mut store = GameStore::hydrate(snapshots.clone());
        store.load_catalog(&CATALOG);
        store.set_profile(profile());
        store.record_harvest(250, 40);
        store.record_planting(3);
        store.add_play_time(120);
        store.set_active_quests(vec![quest("a", None), quest("b", None)]);
        store.complete_quest("a");
        store.unlock_achievement(achievement("first-harvest"));
        store.set_active_tab("plants");
        store.set_connected(true);
        store.add_notification(NotificationDraft::new("info", "Welcome back"));
        let expected = store.state().persisted();

        let restored = GameStore::hydrate(snapshots);
        assert_eq!(restored.state().persisted(), expected);

        let state = restored.state();
        assert!(state.plants.is_empty());
        assert!(state.active_quests.is_empty());
        assert!(state.notifications.is_empty());
        assert!(!state.is_connected);
        assert_eq!(state.active_tab, DEFAULT_TAB);
        Ok(())
    }

    #[test]
    fn malformed_snapshot_falls_back_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        let snapshots = SnapshotManager::new(dir.path(), "store");
        fs::write(snapshots.path(), "{\"version\": 1, \"state\": [")?;

        let mut store = GameStore::hydrate(snapshots.clone());
        assert_eq!(store.state(), &GameState::default());

        store.set_profile(profile());
        assert!(snapshots.load()?.and_then(|saved| saved.profile).is_some());
        Ok(())
    }

    #[test]
    fn notification_ids_strictly_increase() {
        let ids: Vec<u64> = (0..200)
            .map(|_| next_notification_id().parse::<u64>().unwrap())
            .collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn foreign_version_snapshot_falls_back_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        let snapshots = SnapshotManager::new(dir.path(), "store");
        let payload = json!({
            "version": crate::snapshot::SNAPSHOT_VERSION + 1,
            "savedAt": Utc::now(),
            "state": { "profile": profile() }
        });
        fs::write(snapshots.path(), serde_json::to_vec(&payload)?)?;

        let store = GameStore::hydrate(snapshots);
        assert_eq!(store.state(), &GameState::default());
        Ok(())
    }

    #[test]
    fn failed_write_keeps_memory_state() -> Result<()> {
        let dir = tempdir()?;
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "occupied")?;
        let snapshots = SnapshotManager::new(&blocker, "store");

        let mut store = GameStore::with_snapshots(snapshots.clone());
        store.set_profile(profile());
        store.record_harvest(50, 10);

        assert_eq!(store.profile(), Some(&profile()));
        assert_eq!(store.state().farm_stats.total_harvests, 1);
        assert!(!snapshots.path().exists());
        Ok(())
    }

    #[test]
    fn session_only_mutations_do_not_write() -> Result<()> {
        let dir = tempdir()?;
        let snapshots = SnapshotManager::new(dir.path(), "store");
        let mut store = GameStore::with_snapshots(snapshots.clone());
        store.set_active_tab("market");
        store.set_loading(true);
        store.add_notification(NotificationDraft::new("info", "hello"));
        assert!(!snapshots.path().exists());
        Ok(())
    }
}
