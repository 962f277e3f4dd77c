//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - User registration and login (Argon2id)
//! - `geocoder` - Address-search proxy to the geocoding provider

pub mod auth;
pub mod geocoder;
