// src/domain/core.rs
use thiserror::Error;

use crate::money::Amount;

pub type ItemId = String;
pub type BidderId = String;
pub type Sequence = u64;

/// Why a bid was turned down. Variants are listed in the order the
/// validator checks them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Bid amount must be positive, got {0}")]
    AmountNotPositive(Amount),

    #[error("Bid of {amount} is below the minimum next bid of {minimum}")]
    BelowIncrement { amount: Amount, minimum: Amount },

    #[error("Bid of {amount} must be higher than the highest bid of {highest}")]
    NotHigherThanCurrent { amount: Amount, highest: Amount },

    #[error("Bidder {0} placed the last bid and may not bid again in succession")]
    SuccessiveBidNotAllowed(BidderId),
}

impl Rejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::AmountNotPositive(_) => "AmountNotPositive",
            Rejection::BelowIncrement { .. } => "BelowIncrement",
            Rejection::NotHigherThanCurrent { .. } => "NotHigherThanCurrent",
            Rejection::SuccessiveBidNotAllowed(_) => "SuccessiveBidNotAllowed",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Increment factor must not be negative, got {0}")]
    NegativeIncrementFactor(Amount),

    #[error("Invalid setting {name}: {value}")]
    InvalidSetting { name: &'static str, value: String },
}
