// src/coordinator/locks.rs
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::ItemId;

pub type ItemLock = Arc<AsyncMutex<()>>;

/// One async mutex per item that currently has a submission in flight.
///
/// Waiters are served in the order they started waiting (tokio's mutex is
/// fair). Entries are dropped from the table once nobody holds or waits on
/// them.
#[derive(Debug, Default)]
pub struct ItemLocks {
    table: Mutex<HashMap<ItemId, ItemLock>>,
}

impl ItemLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Waits for exclusive access to `item_id`. Access lasts until the
    /// returned guard is dropped.
    pub async fn acquire(self: &Arc<Self>, item_id: &str) -> ItemGuard {
        let lock = self.lock_for(item_id);
        let slot = LockSlot {
            locks: self.clone(),
            item_id: item_id.to_string(),
            lock: Some(lock.clone()),
        };
        let guard = lock.lock_owned().await;
        ItemGuard {
            _guard: guard,
            _slot: slot,
        }
    }

    /// Number of items with a held or awaited lock.
    pub fn tracked_items(&self) -> usize {
        self.table().len()
    }

    fn lock_for(&self, item_id: &str) -> ItemLock {
        self.table()
            .entry(item_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    // Nothing panics while the table is held.
    fn table(&self) -> std::sync::MutexGuard<'_, HashMap<ItemId, ItemLock>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self, item_id: &str, lock: ItemLock) {
        let mut table = self.table();
        // Slots are created and released under the table lock, so once ours
        // is gone a count of one means the table holds the only reference.
        drop(lock);
        let unused = table
            .get(item_id)
            .map_or(false, |current| Arc::strong_count(current) == 1);
        if unused {
            table.remove(item_id);
        }
    }
}

struct LockSlot {
    locks: Arc<ItemLocks>,
    item_id: ItemId,
    lock: Option<ItemLock>,
}

impl Drop for LockSlot {
    fn drop(&mut self) {
        if let Some(lock) = self.lock.take() {
            self.locks.release(&self.item_id, lock);
        }
    }
}

/// Exclusive access to one item. Field order matters: the mutex guard must
/// be released before the slot tries to prune the table.
pub struct ItemGuard {
    _guard: OwnedMutexGuard<()>,
    _slot: LockSlot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn same_item_is_exclusive() {
        let locks = ItemLocks::new_shared();
        let held = locks.acquire("lamp").await;

        assert!(timeout(Duration::from_millis(50), locks.acquire("lamp")).await.is_err());

        drop(held);
        assert!(timeout(Duration::from_millis(50), locks.acquire("lamp")).await.is_ok());
    }

    #[tokio::test]
    async fn different_items_do_not_contend() {
        let locks = ItemLocks::new_shared();
        let _lamp = locks.acquire("lamp").await;

        let chair = timeout(Duration::from_millis(50), locks.acquire("chair")).await;
        assert!(chair.is_ok());
        assert_eq!(locks.tracked_items(), 2);
    }

    #[tokio::test]
    async fn released_locks_leave_the_table() {
        let locks = ItemLocks::new_shared();
        {
            let _lamp = locks.acquire("lamp").await;
            assert_eq!(locks.tracked_items(), 1);
        }
        assert_eq!(locks.tracked_items(), 0);
    }
}
