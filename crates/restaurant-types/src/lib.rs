//! Restaurant Types - Pure type definitions
//!
//! This crate contains only serde data types shared by the service and
//! anything that talks to it over HTTP.

pub mod request;
pub mod restaurant;

pub use request::*;
pub use restaurant::*;
