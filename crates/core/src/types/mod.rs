//! Core types for Piyesa.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod island_group;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use island_group::{IslandGroup, roman_to_int};
pub use price::{CurrencyCode, Price};
pub use status::OrderStatus;
