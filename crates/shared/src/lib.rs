//! Shared types, errors, and configuration for Kasira.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error taxonomy
//! - Core configuration (tolerance, well-known account codes, health checks)

pub mod config;
pub mod error;
pub mod types;

pub use config::CoreConfig;
pub use error::{AppError, AppResult};
