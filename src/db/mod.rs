//! Database module for SQLite operations.
//!
//! This module provides:
//! - Database initialization, schema and seed data
//! - SQLite pragma configuration
//! - The todo repository

pub mod migrations;
pub mod repo;

pub use migrations::{init_db, init_memory_db};
pub use repo::Repository;
