//! Persistence layer for the EcoRewards backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations, including the transactional write paths
//!   that keep the points ledger and user balances consistent

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
