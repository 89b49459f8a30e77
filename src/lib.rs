// src/lib.rs
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod money;
pub mod persistence;
pub mod web;

pub use coordinator::{BidCoordinator, BidError};
pub use domain::*;
pub use money::*;
