// src/persistence/in_memory.rs
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{BidRepository, ItemSnapshot, RepositoryError};
use crate::domain::{Auctionable, BidRecord, ItemId, NewBid, Sequence};

#[derive(Debug, Clone)]
pub(crate) struct ItemEntry {
    pub(crate) auctionable: Auctionable,
    pub(crate) bids: Vec<BidRecord>,
}

/// All items and bids in a map behind an async read/write lock.
///
/// Useful for tests, and as the in-process index of the file repository.
#[derive(Debug, Default)]
pub struct InMemoryBidRepository {
    items: RwLock<HashMap<ItemId, ItemEntry>>,
}

impl InMemoryBidRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub(crate) fn check_new_auctionable(
        items: &HashMap<ItemId, ItemEntry>,
        auctionable: &Auctionable,
    ) -> Result<(), RepositoryError> {
        if items.contains_key(&auctionable.item_id) {
            return Err(RepositoryError::DuplicateAuctionable(auctionable.item_id.clone()));
        }
        Ok(())
    }

    pub(crate) fn check_append(
        items: &HashMap<ItemId, ItemEntry>,
        item_id: &str,
        sequence: Sequence,
    ) -> Result<(), RepositoryError> {
        let entry = items
            .get(item_id)
            .ok_or_else(|| RepositoryError::UnknownItem(item_id.to_string()))?;
        let expected = entry.bids.last().map_or(1, |last| last.sequence + 1);
        if sequence != expected {
            return Err(RepositoryError::SequenceConflict {
                item_id: item_id.to_string(),
                expected,
                actual: sequence,
            });
        }
        Ok(())
    }

    pub(crate) fn insert_auctionable(items: &mut HashMap<ItemId, ItemEntry>, auctionable: Auctionable) {
        items.insert(
            auctionable.item_id.clone(),
            ItemEntry {
                auctionable,
                bids: Vec::new(),
            },
        );
    }

    /// Sequence order is the caller's job, see `check_append`.
    pub(crate) fn insert_bid(items: &mut HashMap<ItemId, ItemEntry>, record: BidRecord) -> Result<(), RepositoryError> {
        let entry = items
            .get_mut(&record.item_id)
            .ok_or_else(|| RepositoryError::UnknownItem(record.item_id.clone()))?;
        entry.bids.push(record);
        Ok(())
    }

    pub(crate) fn items(&self) -> &RwLock<HashMap<ItemId, ItemEntry>> {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> &mut HashMap<ItemId, ItemEntry> {
        self.items.get_mut()
    }
}

#[async_trait]
impl BidRepository for InMemoryBidRepository {
    async fn add_auctionable(&self, auctionable: Auctionable) -> Result<(), RepositoryError> {
        let mut items = self.items.write().await;
        Self::check_new_auctionable(&items, &auctionable)?;
        Self::insert_auctionable(&mut items, auctionable);
        Ok(())
    }

    async fn find_auctionable(&self, item_id: &str) -> Result<Option<Auctionable>, RepositoryError> {
        let items = self.items.read().await;
        Ok(items.get(item_id).map(|entry| entry.auctionable.clone()))
    }

    async fn list_bids(&self, item_id: &str) -> Result<Vec<BidRecord>, RepositoryError> {
        let items = self.items.read().await;
        Ok(items.get(item_id).map(|entry| entry.bids.clone()).unwrap_or_default())
    }

    async fn load_item(&self, item_id: &str) -> Result<Option<ItemSnapshot>, RepositoryError> {
        let items = self.items.read().await;
        Ok(items.get(item_id).map(|entry| ItemSnapshot {
            auctionable: entry.auctionable.clone(),
            bids: entry.bids.clone(),
        }))
    }

    async fn append(&self, bid: NewBid) -> Result<BidRecord, RepositoryError> {
        let mut items = self.items.write().await;
        Self::check_append(&items, &bid.item_id, bid.sequence)?;
        let record = bid.into_record(Utc::now());
        Self::insert_bid(&mut items, record.clone())?;
        Ok(record)
    }
}
