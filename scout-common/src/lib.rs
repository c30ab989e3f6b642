//! # Scoutline Common Library
//!
//! Shared code for the Scoutline recruiting service including:
//! - Database models and schema initialization
//! - Event types (ScoutEvent enum) and EventBus
//! - API authentication helpers
//! - Configuration loading
//! - Combine scoring, improvement, and adult-height prediction calculators
//! - Position benchmark and division reference tables

pub mod api;
pub mod benchmarks;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod events;
pub mod growth;
pub mod scoring;
pub mod sse;
pub mod units;

pub use error::{Error, Result};
pub use growth::Sex;
