#![allow(dead_code)]
use async_trait::async_trait;
use auction_bids::coordinator::BidCoordinator;
use auction_bids::domain::{Auctionable, AuctionableConfig, BidRecord, NewBid};
use auction_bids::money::Amount;
use auction_bids::persistence::{BidRepository, InMemoryBidRepository, RepositoryError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
// See https://users.rust-lang.org/t/sharing-code-and-macros-in-tests-directory/3098/7

// Sample data for tests
pub fn sample_item_id() -> String {
    "painting".to_string()
}

pub fn sample_title() -> String {
    "Painting".to_string()
}

pub fn buyer_a() -> String {
    "Buyer_A".to_string()
}

pub fn buyer_b() -> String {
    "Buyer_B".to_string()
}

pub fn buyer_c() -> String {
    "Buyer_C".to_string()
}

pub fn amount(value: i64) -> Amount {
    Amount::new(value)
}

pub fn sample_auctionable(config: AuctionableConfig) -> Auctionable {
    Auctionable::new(sample_item_id(), sample_title(), config)
}

pub async fn repository_with_item(config: AuctionableConfig) -> Arc<InMemoryBidRepository> {
    let repository = InMemoryBidRepository::new_shared();
    repository
        .add_auctionable(sample_auctionable(config))
        .await
        .expect("fresh repository accepts the sample item");
    repository
}

pub async fn coordinator_with_item(config: AuctionableConfig) -> BidCoordinator {
    BidCoordinator::new(repository_with_item(config).await)
}

/// Delegates to an in-memory repository, optionally failing or stalling appends.
pub struct FlakyRepository {
    pub inner: Arc<InMemoryBidRepository>,
    failures_left: AtomicUsize,
    append_delay: Option<Duration>,
}

impl FlakyRepository {
    pub fn failing(inner: Arc<InMemoryBidRepository>, failures: usize) -> Self {
        FlakyRepository {
            inner,
            failures_left: AtomicUsize::new(failures),
            append_delay: None,
        }
    }

    pub fn slow(inner: Arc<InMemoryBidRepository>, append_delay: Duration) -> Self {
        FlakyRepository {
            inner,
            failures_left: AtomicUsize::new(0),
            append_delay: Some(append_delay),
        }
    }
}

#[async_trait]
impl BidRepository for FlakyRepository {
    async fn add_auctionable(&self, auctionable: Auctionable) -> Result<(), RepositoryError> {
        self.inner.add_auctionable(auctionable).await
    }

    async fn find_auctionable(&self, item_id: &str) -> Result<Option<Auctionable>, RepositoryError> {
        self.inner.find_auctionable(item_id).await
    }

    async fn list_bids(&self, item_id: &str) -> Result<Vec<BidRecord>, RepositoryError> {
        self.inner.list_bids(item_id).await
    }

    async fn append(&self, bid: NewBid) -> Result<BidRecord, RepositoryError> {
        if let Some(delay) = self.append_delay {
            tokio::time::sleep(delay).await;
        }
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(RepositoryError::Unavailable("disk full".to_string()));
        }
        self.inner.append(bid).await
    }
}
