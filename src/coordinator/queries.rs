// src/coordinator/queries.rs
//! Read-only views. These never take the item lock, so a query racing a
//! submission may see the item either before or after that bid.
use super::{BidCoordinator, BidError};
use crate::domain::{Auctionable, AuctionableState, BidRecord, RankedBidder};
use crate::money::Amount;
use crate::persistence::{BidRepository, ItemSnapshot};

impl BidCoordinator {
    /// The item and its bids from a single repository read.
    pub async fn snapshot(&self, item_id: &str) -> Result<ItemSnapshot, BidError> {
        self.repository
            .load_item(item_id)
            .await?
            .ok_or_else(|| BidError::ItemNotFound(item_id.to_string()))
    }

    pub async fn auctionable(&self, item_id: &str) -> Result<Auctionable, BidError> {
        self.repository
            .find_auctionable(item_id)
            .await?
            .ok_or_else(|| BidError::ItemNotFound(item_id.to_string()))
    }

    /// All bids on the item, oldest first.
    pub async fn bids(&self, item_id: &str) -> Result<Vec<BidRecord>, BidError> {
        Ok(self.snapshot(item_id).await?.bids)
    }

    pub async fn state(&self, item_id: &str) -> Result<AuctionableState, BidError> {
        let snapshot = self.snapshot(item_id).await?;
        Ok(AuctionableState::from_bids(&snapshot.bids))
    }

    pub async fn last_bid(&self, item_id: &str) -> Result<Option<BidRecord>, BidError> {
        Ok(self.state(item_id).await?.last_bid().cloned())
    }

    pub async fn last_bid_amount(&self, item_id: &str) -> Result<Option<Amount>, BidError> {
        Ok(self.state(item_id).await?.last_bid_amount())
    }

    pub async fn last_bidder(&self, item_id: &str) -> Result<Option<RankedBidder>, BidError> {
        Ok(self.state(item_id).await?.last_bidder())
    }

    /// The most recent bid. Same as [`BidCoordinator::last_bid`].
    pub async fn current_bid(&self, item_id: &str) -> Result<Option<BidRecord>, BidError> {
        self.last_bid(item_id).await
    }

    pub async fn current_bid_amount(&self, item_id: &str) -> Result<Option<Amount>, BidError> {
        self.last_bid_amount(item_id).await
    }

    pub async fn highest_bid(&self, item_id: &str) -> Result<Option<BidRecord>, BidError> {
        Ok(self.state(item_id).await?.highest_bid().cloned())
    }

    pub async fn highest_bid_amount(&self, item_id: &str) -> Result<Option<Amount>, BidError> {
        Ok(self.state(item_id).await?.highest_bid_amount())
    }

    pub async fn highest_bidder(&self, item_id: &str) -> Result<Option<RankedBidder>, BidError> {
        Ok(self.state(item_id).await?.highest_bidder())
    }

    /// `false` when nobody has bid yet.
    pub async fn is_last_bidder(&self, item_id: &str, bidder_id: &str) -> Result<bool, BidError> {
        Ok(self.state(item_id).await?.is_last_bidder(bidder_id))
    }
}
