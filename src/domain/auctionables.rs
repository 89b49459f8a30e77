// src/domain/auctionables.rs
use serde::{Deserialize, Serialize};

use super::core::{ConfigError, ItemId};
use super::increment::IncrementPolicy;
use crate::money::Amount;

pub const DEFAULT_INCREMENT_FACTOR: Amount = Amount::new(5);

/// Bidding rules chosen by the entity being bid on.
///
/// Deserializing goes through [`AuctionableConfig::new`], so a stored
/// negative factor is refused on load too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AuctionableConfigFields")]
pub struct AuctionableConfig {
    #[serde(rename = "incrementFactor")]
    pub increment_factor: Amount,
    #[serde(rename = "successiveBiddingAllowed")]
    pub successive_bidding_allowed: bool,
}

impl Default for AuctionableConfig {
    fn default() -> Self {
        AuctionableConfig {
            increment_factor: DEFAULT_INCREMENT_FACTOR,
            successive_bidding_allowed: false,
        }
    }
}

#[derive(Deserialize)]
struct AuctionableConfigFields {
    #[serde(rename = "incrementFactor")]
    increment_factor: Amount,
    #[serde(rename = "successiveBiddingAllowed")]
    successive_bidding_allowed: bool,
}

impl TryFrom<AuctionableConfigFields> for AuctionableConfig {
    type Error = ConfigError;

    fn try_from(fields: AuctionableConfigFields) -> Result<Self, Self::Error> {
        AuctionableConfig::new(fields.increment_factor, fields.successive_bidding_allowed)
    }
}

impl AuctionableConfig {
    pub fn new(increment_factor: Amount, successive_bidding_allowed: bool) -> Result<Self, ConfigError> {
        if increment_factor < Amount::ZERO {
            return Err(ConfigError::NegativeIncrementFactor(increment_factor));
        }
        Ok(AuctionableConfig {
            increment_factor,
            successive_bidding_allowed,
        })
    }

    pub fn increment_policy(&self) -> IncrementPolicy {
        IncrementPolicy::new(self.increment_factor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auctionable {
    #[serde(rename = "id")]
    pub item_id: ItemId,
    pub title: String,
    #[serde(flatten)]
    pub config: AuctionableConfig,
}

impl Auctionable {
    pub fn new(item_id: impl Into<ItemId>, title: impl Into<String>, config: AuctionableConfig) -> Self {
        Auctionable {
            item_id: item_id.into(),
            title: title.into(),
            config,
        }
    }
}
