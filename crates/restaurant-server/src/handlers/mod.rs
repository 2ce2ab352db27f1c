//! HTTP handlers

pub mod health;
pub mod restaurants;

pub use health::{health, info};
