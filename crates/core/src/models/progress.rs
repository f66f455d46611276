#![allow(missing_docs)]

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cadence of a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestKind {
    Daily,
    Weekly,
    Achievement,
    Story,
}

impl QuestKind {
    pub fn label(self) -> &'static str {
        match self {
            QuestKind::Daily => "daily",
            QuestKind::Weekly => "weekly",
            QuestKind::Achievement => "achievement",
            QuestKind::Story => "story",
        }
    }
}

/// Quest with metric-keyed requirement, reward and progress tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: QuestKind,
    #[serde(default)]
    pub requirements: BTreeMap<String, u64>,
    #[serde(default)]
    pub rewards: BTreeMap<String, u64>,
    #[serde(default)]
    pub progress: BTreeMap<String, u64>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Quest {
    /// Fraction of the summed requirements met so far, in `0.0..=1.0`.
    ///
    /// Progress beyond a requirement does not spill over into other metrics.
    pub fn progress_ratio(&self) -> f64 {
        let required: u64 = self.requirements.values().sum();
        if required == 0 {
            return if self.completed { 1.0 } else { 0.0 };
        }
        let met: u64 = self
            .requirements
            .iter()
            .map(|(metric, needed)| self.progress.get(metric).copied().unwrap_or(0).min(*needed))
            .sum();
        met as f64 / required as f64
    }

    /// `met/required` label summed across metrics.
    pub fn progress_label(&self) -> String {
        let required: u64 = self.requirements.values().sum();
        let met: u64 = self
            .requirements
            .iter()
            .map(|(metric, needed)| self.progress.get(metric).copied().unwrap_or(0).min(*needed))
            .sum();
        format!("{met}/{required}")
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }
}

/// Monotonic farm counters. Every mutation only adds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FarmStats {
    pub total_harvests: u64,
    pub total_planted: u64,
    pub coins_earned: u64,
    pub xp_gained: u64,
    /// Seconds.
    pub play_time: u64,
}

impl FarmStats {
    pub fn record_harvest(&mut self, coins: u64, xp: u64) {
        self.total_harvests = self.total_harvests.saturating_add(1);
        self.coins_earned = self.coins_earned.saturating_add(coins);
        self.xp_gained = self.xp_gained.saturating_add(xp);
    }

    pub fn record_planting(&mut self, count: u64) {
        self.total_planted = self.total_planted.saturating_add(count);
    }

    pub fn add_play_time(&mut self, seconds: u64) {
        self.play_time = self.play_time.saturating_add(seconds);
    }
}

/// Category of a market listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Plant,
    Pet,
    Tool,
    Decoration,
}

/// Listing on the player market. Lives only for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketItem {
    pub id: String,
    pub item_id: String,
    #[serde(rename = "itemType")]
    pub item_kind: ItemKind,
    pub seller: String,
    pub price: u64,
    pub quantity: u32,
    pub listed_at: DateTime<Utc>,
}

/// Notification as stored, after the store assigned its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub payload: Value,
}

/// Notification content before an identifier is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub kind: String,
    pub message: String,
    pub payload: Value,
}

impl NotificationDraft {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            payload: Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub(crate) fn into_notification(self, id: String) -> Notification {
        Notification {
            id,
            kind: self.kind,
            message: self.message,
            payload: self.payload,
        }
    }
}

/// Earned achievement. The payload shape is owned by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

/// Pending trade between players. The payload shape is owned by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOffer {
    pub id: String,
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn quest(requirements: &[(&str, u64)], progress: &[(&str, u64)]) -> Quest {
        Quest {
            id: "q1".to_string(),
            title: "Green Thumb".to_string(),
            description: "Plant and water".to_string(),
            kind: QuestKind::Daily,
            requirements: requirements
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            rewards: BTreeMap::from([("coins".to_string(), 500)]),
            progress: progress.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            completed: false,
            expires_at: None,
        }
    }

    #[test]
    fn progress_ratio_caps_each_metric() {
        let q = quest(&[("plant", 10), ("water", 10)], &[("plant", 25), ("water", 5)]);
        assert!((q.progress_ratio() - 0.75).abs() < f64::EPSILON);
        assert_eq!(q.progress_label(), "15/20");
    }

    #[test]
    fn progress_ratio_without_requirements_follows_flag() {
        let mut q = quest(&[], &[]);
        assert_eq!(q.progress_ratio(), 0.0);
        q.completed = true;
        assert_eq!(q.progress_ratio(), 1.0);
    }

    #[test]
    fn expiry_is_inclusive() {
        let now = Utc::now();
        let mut q = quest(&[("plant", 1)], &[]);
        assert!(!q.is_expired(now));
        q.expires_at = Some(now);
        assert!(q.is_expired(now));
        q.expires_at = Some(now + Duration::hours(1));
        assert!(!q.is_expired(now));
    }

    #[test]
    fn farm_stats_only_grow() {
        let mut stats = FarmStats::default();
        stats.record_harvest(120, 40);
        stats.record_harvest(80, 10);
        stats.record_planting(3);
        stats.add_play_time(90);
        assert_eq!(stats.total_harvests, 2);
        assert_eq!(stats.coins_earned, 200);
        assert_eq!(stats.xp_gained, 50);
        assert_eq!(stats.total_planted, 3);
        assert_eq!(stats.play_time, 90);

        stats.coins_earned = u64::MAX - 1;
        stats.record_harvest(10, 0);
        assert_eq!(stats.coins_earned, u64::MAX);
    }
}
