//! Domain layer for the EcoRewards backend.
//!
//! This crate contains:
//! - Domain models (User, Container, Material, Delivery, LedgerEntry, ...)
//! - Business logic services (points computation, geo distance)

pub mod models;
pub mod services;
