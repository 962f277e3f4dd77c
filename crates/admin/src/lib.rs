//! Piyesa Admin library.
//!
//! Back-office API for the parts store: geography reference data,
//! fitment catalog, product management, the supply and sales stock
//! ledgers, and order administration.
//!
//! # Security
//!
//! This crate has write access to all reference data and order state.
//! The binary binds to loopback; deploy it behind the private network
//! only, never on a public interface.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod params;
pub mod routes;
pub mod state;
