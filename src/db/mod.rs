//! Database layer: SQLite schema for persisted fight records.

pub mod schema;
