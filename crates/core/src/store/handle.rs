use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{GameState, GameStore};

/// Cloneable, shared access to a [`GameStore`].
///
/// Handed to the views and to the startup task instead of a global.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    inner: Arc<RwLock<GameStore>>,
}

impl StoreHandle {
    /// Wrap `store` for sharing.
    pub fn new(store: GameStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Borrow the store for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, GameStore> {
        self.inner.read()
    }

    /// Borrow the store for mutation.
    pub fn write(&self) -> RwLockWriteGuard<'_, GameStore> {
        self.inner.write()
    }

    /// Run `action` against the store under a single write lock.
    pub fn update<R>(&self, action: impl FnOnce(&mut GameStore) -> R) -> R {
        let mut store = self.inner.write();
        action(&mut store)
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> GameState {
        self.inner.read().state().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let handle = StoreHandle::new(GameStore::new());
        let other = handle.clone();

        other.update(|store| store.set_active_tab("pets"));
        assert_eq!(handle.read().state().active_tab, "pets");

        handle.write().set_loading(true);
        assert!(other.snapshot().is_loading);
    }
}
