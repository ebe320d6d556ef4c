//! services/api/src/lib.rs
//!
//! The HTTP surface of the ideaboard: storage adapters, configuration,
//! error mapping and the axum router.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
