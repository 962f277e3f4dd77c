//! Piyesa Core - Shared types library.
//!
//! This crate provides common types used across all Piyesa components:
//! - `storefront` - Public-facing storefront API
//! - `admin` - Internal back-office API (private network only)
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, email addresses, prices, order statuses, and
//!   the island-group classifier

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
