//! Shared utilities and common types for the EcoRewards backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT token generation and validation
//! - Password hashing with Argon2id
//! - Session token generation and hashing
//! - Common validation logic

pub mod jwt;
pub mod password;
pub mod token;
pub mod validation;
