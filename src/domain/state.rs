// src/domain/state.rs
use serde::Serialize;

use super::bids::BidRecord;
use super::core::BidderId;
use crate::money::Amount;

/// A bidder together with the amount of the bid that puts them in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedBidder {
    #[serde(rename = "bidderId")]
    pub bidder_id: BidderId,
    pub amount: Amount,
}

impl From<&BidRecord> for RankedBidder {
    fn from(bid: &BidRecord) -> Self {
        RankedBidder {
            bidder_id: bid.bidder_id.clone(),
            amount: bid.amount,
        }
    }
}

/// What the bids on one item currently add up to.
///
/// Derived on demand from the stored records, never persisted itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuctionableState {
    highest_bid: Option<BidRecord>,
    last_bid: Option<BidRecord>,
    bid_count: usize,
}

impl AuctionableState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Records may arrive in any order. Equal amounts keep the earlier
    /// sequence as highest.
    pub fn from_bids<'a, I>(bids: I) -> Self
    where
        I: IntoIterator<Item = &'a BidRecord>,
    {
        let mut state = AuctionableState::empty();
        for bid in bids {
            state.bid_count += 1;

            let outbids = match &state.highest_bid {
                None => true,
                Some(highest) => {
                    bid.amount > highest.amount
                        || (bid.amount == highest.amount && bid.sequence < highest.sequence)
                }
            };
            if outbids {
                state.highest_bid = Some(bid.clone());
            }

            if state.last_bid.as_ref().map_or(true, |last| bid.sequence > last.sequence) {
                state.last_bid = Some(bid.clone());
            }
        }
        state
    }

    pub fn highest_bid(&self) -> Option<&BidRecord> {
        self.highest_bid.as_ref()
    }

    pub fn highest_bid_amount(&self) -> Option<Amount> {
        self.highest_bid.as_ref().map(|bid| bid.amount)
    }

    pub fn highest_bidder(&self) -> Option<RankedBidder> {
        self.highest_bid.as_ref().map(RankedBidder::from)
    }

    pub fn last_bid(&self) -> Option<&BidRecord> {
        self.last_bid.as_ref()
    }

    pub fn last_bid_amount(&self) -> Option<Amount> {
        self.last_bid.as_ref().map(|bid| bid.amount)
    }

    pub fn last_bidder(&self) -> Option<RankedBidder> {
        self.last_bid.as_ref().map(RankedBidder::from)
    }

    pub fn is_last_bidder(&self, bidder_id: &str) -> bool {
        self.last_bid
            .as_ref()
            .map_or(false, |bid| bid.bidder_id == bidder_id)
    }

    pub fn bid_count(&self) -> usize {
        self.bid_count
    }

    pub fn next_sequence(&self) -> u64 {
        self.last_bid.as_ref().map_or(1, |bid| bid.sequence + 1)
    }
}
