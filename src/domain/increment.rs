// src/domain/increment.rs
use crate::money::Amount;

/// Maps the current highest bid to the smallest acceptable next bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncrementPolicy {
    increment_factor: Amount,
}

impl IncrementPolicy {
    pub fn new(increment_factor: Amount) -> Self {
        IncrementPolicy { increment_factor }
    }

    pub fn increment_factor(&self) -> Amount {
        self.increment_factor
    }

    /// `None` while nothing has been bid: any positive amount may open.
    pub fn minimum_next_bid(&self, highest_bid_amount: Option<Amount>) -> Option<Amount> {
        highest_bid_amount.map(|highest| highest + self.increment_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_floor_without_a_highest_bid() {
        let policy = IncrementPolicy::new(Amount::new(5));
        assert_eq!(policy.minimum_next_bid(None), None);
    }

    #[test]
    fn floor_is_highest_plus_factor() {
        let policy = IncrementPolicy::new(Amount::new(5));
        assert_eq!(policy.minimum_next_bid(Some(Amount::new(100))), Some(Amount::new(105)));

        let flat = IncrementPolicy::new(Amount::ZERO);
        assert_eq!(flat.minimum_next_bid(Some(Amount::new(100))), Some(Amount::new(100)));
    }
}
