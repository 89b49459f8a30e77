// src/coordinator/mod.rs
//! Serialized bid submission.
//!
//! Deciding on a bid means reading the item's bids, validating against them
//! and appending the new one. Two submissions that interleave those steps can
//! both pass validation against the same stale highest bid, so each item gets
//! its own lock and the whole read-validate-append runs under it.
//! Submissions for different items never wait on each other.
mod listener;
mod locks;
mod queries;

use log::{debug, info, warn};
use std::sync::Arc;
use thiserror::Error;

use crate::domain::{validate_bid, AuctionableState, BidRecord, ItemId, NewBid, Rejection};
use crate::money::Amount;
use crate::persistence::{BidRepository, ItemSnapshot, RepositoryError, SharedBidRepository};

pub use self::listener::{BidListener, LogBidListener, SharedBidListener};
pub use self::locks::{ItemGuard, ItemLocks};

#[derive(Debug, Error)]
pub enum BidError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("Unknown item: {0}")]
    ItemNotFound(ItemId),

    #[error("Failed to persist bid: {0}")]
    PersistenceFailure(#[from] RepositoryError),
}

impl BidError {
    /// Stable name of the failure, for responses that need to tell them apart.
    pub fn kind(&self) -> &'static str {
        match self {
            BidError::Rejected(rejection) => rejection.kind(),
            BidError::ItemNotFound(_) => "ItemNotFound",
            BidError::PersistenceFailure(_) => "PersistenceFailure",
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            BidError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct BidCoordinator {
    repository: SharedBidRepository,
    locks: Arc<ItemLocks>,
    listener: SharedBidListener,
}

impl BidCoordinator {
    pub fn new(repository: SharedBidRepository) -> Self {
        Self::with_listener(repository, Arc::new(LogBidListener))
    }

    pub fn with_listener(repository: SharedBidRepository, listener: SharedBidListener) -> Self {
        BidCoordinator {
            repository,
            locks: ItemLocks::new_shared(),
            listener,
        }
    }

    pub fn repository(&self) -> &SharedBidRepository {
        &self.repository
    }

    pub fn locks(&self) -> &Arc<ItemLocks> {
        &self.locks
    }

    /// Places a bid of `amount` by `bidder_id` on `item_id`.
    ///
    /// Waits behind other submissions for the same item, in arrival order.
    /// Dropping the returned future while it is still waiting changes
    /// nothing. Once the item lock is taken the submission runs on its own
    /// task and finishes (committed or rejected) even if the caller is gone.
    pub async fn submit(&self, item_id: &str, bidder_id: &str, amount: Amount) -> Result<BidRecord, BidError> {
        let guard = self.locks.acquire(item_id).await;

        let repository = self.repository.clone();
        let listener = self.listener.clone();
        let item_id = item_id.to_string();
        let bidder_id = bidder_id.to_string();

        let section = tokio::spawn(async move {
            let outcome = decide_and_commit(repository.as_ref(), &item_id, &bidder_id, amount).await;
            drop(guard);

            if let Ok(record) = &outcome {
                listener.bid_accepted(record).await;
            }
            outcome
        });

        match section.await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                warn!("Bid submission task did not finish: {}", join_error);
                Err(BidError::PersistenceFailure(RepositoryError::Unavailable(
                    join_error.to_string(),
                )))
            }
        }
    }
}

/// Must only run while holding the item's lock.
async fn decide_and_commit(
    repository: &dyn BidRepository,
    item_id: &str,
    bidder_id: &str,
    amount: Amount,
) -> Result<BidRecord, BidError> {
    let ItemSnapshot { auctionable, bids } = repository
        .load_item(item_id)
        .await?
        .ok_or_else(|| BidError::ItemNotFound(item_id.to_string()))?;
    let state = AuctionableState::from_bids(&bids);

    if let Err(rejection) = validate_bid(&state, bidder_id, amount, &auctionable.config) {
        debug!("Rejected bid of {} by {} on {}: {}", amount, bidder_id, item_id, rejection);
        return Err(rejection.into());
    }

    let new_bid = NewBid {
        item_id: item_id.to_string(),
        bidder_id: bidder_id.to_string(),
        amount,
        sequence: state.next_sequence(),
    };

    match repository.append(new_bid).await {
        Ok(record) => {
            info!(
                "Accepted bid #{} of {} by {} on {}",
                record.sequence, record.amount, record.bidder_id, record.item_id
            );
            Ok(record)
        }
        Err(error) => {
            warn!("Failed to persist bid of {} by {} on {}: {}", amount, bidder_id, item_id, error);
            Err(error.into())
        }
    }
}
