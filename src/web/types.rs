use serde::{Deserialize, Serialize};

use crate::coordinator::{BidCoordinator, BidError};
use crate::domain::{Auctionable, AuctionableConfig, AuctionableState, BidRecord, ConfigError, ItemId, RankedBidder};
use crate::money::{Amount, AmountValue};

pub type AppState = BidCoordinator;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: String,
    pub message: String,
}

impl From<&BidError> for ApiError {
    fn from(error: &BidError) -> Self {
        ApiError {
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BidRequest {
    pub amount: AmountValue,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddAuctionableRequest {
    pub id: ItemId,
    pub title: String,
    #[serde(rename = "incrementFactor")]
    pub increment_factor: Option<AmountValue>,
    #[serde(rename = "successiveBiddingAllowed")]
    pub successive_bidding_allowed: Option<bool>,
}

impl AddAuctionableRequest {
    pub fn to_auctionable(&self) -> Result<Auctionable, ConfigError> {
        let defaults = AuctionableConfig::default();
        let config = AuctionableConfig::new(
            self.increment_factor.map(Amount::new).unwrap_or(defaults.increment_factor),
            self.successive_bidding_allowed
                .unwrap_or(defaults.successive_bidding_allowed),
        )?;
        Ok(Auctionable::new(self.id.clone(), self.title.clone(), config))
    }
}

#[derive(Debug, Serialize)]
pub struct AuctionableDetail {
    pub id: ItemId,
    pub title: String,
    #[serde(rename = "incrementFactor")]
    pub increment_factor: Amount,
    #[serde(rename = "successiveBiddingAllowed")]
    pub successive_bidding_allowed: bool,
    #[serde(rename = "bidCount")]
    pub bid_count: usize,
    #[serde(rename = "highestBidder")]
    pub highest_bidder: Option<RankedBidder>,
    #[serde(rename = "lastBidder")]
    pub last_bidder: Option<RankedBidder>,
    #[serde(rename = "minimumNextBid")]
    pub minimum_next_bid: Option<Amount>,
}

impl AuctionableDetail {
    pub fn new(auctionable: &Auctionable, state: &AuctionableState) -> Self {
        AuctionableDetail {
            id: auctionable.item_id.clone(),
            title: auctionable.title.clone(),
            increment_factor: auctionable.config.increment_factor,
            successive_bidding_allowed: auctionable.config.successive_bidding_allowed,
            bid_count: state.bid_count(),
            highest_bidder: state.highest_bidder(),
            last_bidder: state.last_bidder(),
            minimum_next_bid: auctionable
                .config
                .increment_policy()
                .minimum_next_bid(state.highest_bid_amount()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LastBidderResponse {
    #[serde(rename = "itemId")]
    pub item_id: ItemId,
    #[serde(rename = "bidderId")]
    pub bidder_id: String,
    #[serde(rename = "isLastBidder")]
    pub is_last_bidder: bool,
}

#[derive(Debug, Serialize)]
pub struct BidAccepted {
    pub bid: BidRecord,
}
