//! HTTP route handlers.

pub mod auth;
pub mod classify;
pub mod containers;
pub mod dashboard;
pub mod deliveries;
pub mod events;
pub mod health;
pub mod materials;
pub mod profile;
pub mod rewards;
pub mod users;
