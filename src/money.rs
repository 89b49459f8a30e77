// src/money.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

pub type AmountValue = i64;

/// Whole currency units. Fractional units are not represented.
///
/// The value is signed so that a caller offering a zero or negative amount
/// can be told so, instead of failing to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(AmountValue);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn new(value: AmountValue) -> Self {
        Amount(value)
    }

    pub fn value(&self) -> AmountValue {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }
}

impl From<AmountValue> for Amount {
    fn from(value: AmountValue) -> Self {
        Amount(value)
    }
}

impl Add for Amount {
    type Output = Amount;

    // Saturates: an increment floor above i64::MAX is unreachable anyway.
    fn add(self, other: Self) -> Self::Output {
        self.saturating_add(other)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<AmountValue>()
            .map(Amount)
            .map_err(|_| format!("Invalid amount value: {}", s))
    }
}
