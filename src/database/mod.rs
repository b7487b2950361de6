//! # Database Module
//!
//! PostgreSQL access for the booking data model: pool management and the
//! schema the models read and write.

pub mod connection;
pub mod schema;

pub use connection::DatabaseManager;
