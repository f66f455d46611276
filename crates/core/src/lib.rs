#![warn(clippy::all, missing_docs)]

//! Core domain logic for the Garden Forge dashboard.
//!
//! This crate hosts the data models, the static game catalog and its
//! query layer, the session state store, configuration handling and the
//! snapshot persistence used by the terminal UI and any future frontends.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod snapshot;
pub mod store;

pub use catalog::{Catalog, Facet, PlantQuery, SortKey, CATALOG};
pub use config::AppConfig;
pub use error::SnapshotError;
pub use models::{
    FarmStats, Notification, NotificationDraft, Plant, PlayerProfile, ProfileUpdate, Quest,
    Rarity, Season,
};
pub use snapshot::{PersistedState, SnapshotManager};
pub use store::{GameState, GameStore, StoreHandle};
