//! HTTP API handlers

pub mod athletes;
pub mod auth_middleware;
pub mod checklist;
pub mod colleges;
pub mod health;
pub mod height;
pub mod injuries;
pub mod metrics;
pub mod parents;
pub mod social;
pub mod sse;
