// src/domain/bids.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::core::{BidderId, ItemId, Sequence};
use crate::money::Amount;

/// A committed bid. Never changes once the repository has acknowledged it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    #[serde(rename = "itemId")]
    pub item_id: ItemId,
    #[serde(rename = "bidderId")]
    pub bidder_id: BidderId,
    pub amount: Amount,
    pub sequence: Sequence,
    #[serde(rename = "placedAt")]
    pub placed_at: DateTime<Utc>,
}

/// A bid that passed validation and is about to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBid {
    pub item_id: ItemId,
    pub bidder_id: BidderId,
    pub amount: Amount,
    pub sequence: Sequence,
}

impl NewBid {
    pub fn into_record(self, placed_at: DateTime<Utc>) -> BidRecord {
        BidRecord {
            item_id: self.item_id,
            bidder_id: self.bidder_id,
            amount: self.amount,
            sequence: self.sequence,
            placed_at,
        }
    }
}
