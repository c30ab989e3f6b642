//! Per-entity database operations

pub mod athletes;
pub mod checklist;
pub mod colleges;
pub mod injuries;
pub mod metrics;
pub mod parents;
pub mod posts;
pub mod predictions;
