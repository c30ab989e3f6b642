//! Database access shared across Scoutline crates

pub mod init;
pub mod models;

pub use init::{create_tables, init_database, init_memory_database};
