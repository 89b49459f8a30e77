// src/domain/mod.rs
pub mod auctionables;
pub mod bids;
pub mod core;
pub mod increment;
pub mod state;
pub mod validation;

pub use self::auctionables::*;
pub use self::bids::*;
pub use self::core::*;
pub use self::increment::*;
pub use self::state::*;
pub use self::validation::*;
