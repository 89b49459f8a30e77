// src/web/mod.rs
pub mod app;
pub mod types;
