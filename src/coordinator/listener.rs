// src/coordinator/listener.rs
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::domain::BidRecord;

/// Told about every committed bid, after the item lock has been released.
#[async_trait]
pub trait BidListener: Send + Sync {
    async fn bid_accepted(&self, bid: &BidRecord);
}

pub type SharedBidListener = Arc<dyn BidListener>;

#[derive(Debug, Default, Clone, Copy)]
pub struct LogBidListener;

#[async_trait]
impl BidListener for LogBidListener {
    async fn bid_accepted(&self, bid: &BidRecord) {
        info!("{} is now the last bidder on {} with {}", bid.bidder_id, bid.item_id, bid.amount);
    }
}
