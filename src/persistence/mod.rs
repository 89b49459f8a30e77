// src/persistence/mod.rs
//! Storage of auctionable items and their bids.
//!
//! The coordinator is the only writer of bids and serializes appends per
//! item, but repositories still refuse an append whose sequence does not
//! directly follow the last stored one. A second process writing to the same
//! store without going through the coordinator then fails loudly instead of
//! forking the bid history.
pub mod in_memory;
pub mod json_file;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::{Auctionable, BidRecord, ItemId, NewBid, Sequence};

pub use self::in_memory::InMemoryBidRepository;
pub use self::json_file::JsonFileBidRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed journal entry: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    #[error("Auctionable already exists: {0}")]
    DuplicateAuctionable(ItemId),

    #[error("Sequence conflict on {item_id}: expected {expected}, got {actual}")]
    SequenceConflict {
        item_id: ItemId,
        expected: Sequence,
        actual: Sequence,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// An item together with its bids, read in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSnapshot {
    pub auctionable: Auctionable,
    pub bids: Vec<BidRecord>,
}

#[async_trait]
pub trait BidRepository: Send + Sync {
    async fn add_auctionable(&self, auctionable: Auctionable) -> Result<(), RepositoryError>;

    async fn find_auctionable(&self, item_id: &str) -> Result<Option<Auctionable>, RepositoryError>;

    /// All bids on the item in sequence order; empty when there are none.
    async fn list_bids(&self, item_id: &str) -> Result<Vec<BidRecord>, RepositoryError>;

    /// `None` for unknown items. The default does two reads, so a concurrent
    /// append may land between them; stores that can answer from one read
    /// should override it.
    async fn load_item(&self, item_id: &str) -> Result<Option<ItemSnapshot>, RepositoryError> {
        let auctionable = match self.find_auctionable(item_id).await? {
            Some(auctionable) => auctionable,
            None => return Ok(None),
        };
        let bids = self.list_bids(item_id).await?;
        Ok(Some(ItemSnapshot { auctionable, bids }))
    }

    /// Durably stores the bid. Once this returns `Ok` the record is visible
    /// to every later `list_bids` for the same item.
    async fn append(&self, bid: NewBid) -> Result<BidRecord, RepositoryError>;
}

pub type SharedBidRepository = Arc<dyn BidRepository>;
