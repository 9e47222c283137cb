//! Storage layer for the hub
//!
//! SQLite holds the content records, vocabulary tables, and the FTS index.

pub mod migrations;
pub mod sqlite;

pub use sqlite::Database;
