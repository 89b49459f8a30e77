// src/domain/validation.rs
use super::auctionables::AuctionableConfig;
use super::core::Rejection;
use super::state::AuctionableState;
use crate::money::Amount;

/// Decides whether `bidder_id` may bid `amount` given what has been bid so far.
///
/// Rules are checked in a fixed order and the first one that fails is
/// reported:
///
/// 1. the amount must be positive;
/// 2. an amount that clears the highest bid must still reach the increment
///    floor (`highest + increment_factor`);
/// 3. the amount must be strictly higher than the highest bid;
/// 4. unless the item allows it, the last bidder may not bid again.
pub fn validate_bid(
    state: &AuctionableState,
    bidder_id: &str,
    amount: Amount,
    config: &AuctionableConfig,
) -> Result<(), Rejection> {
    if !amount.is_positive() {
        return Err(Rejection::AmountNotPositive(amount));
    }

    let highest = state.highest_bid_amount();

    if let (Some(highest), Some(minimum)) = (highest, config.increment_policy().minimum_next_bid(highest)) {
        if amount > highest && amount < minimum {
            return Err(Rejection::BelowIncrement { amount, minimum });
        }
    }

    if let Some(highest) = highest {
        if amount <= highest {
            return Err(Rejection::NotHigherThanCurrent { amount, highest });
        }
    }

    if !config.successive_bidding_allowed && state.is_last_bidder(bidder_id) {
        return Err(Rejection::SuccessiveBidNotAllowed(bidder_id.to_string()));
    }

    Ok(())
}
