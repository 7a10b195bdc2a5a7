//! # portal-database
//!
//! Document store access for Lecture Portal: the PostgreSQL connection pool,
//! the migration runner, and one repository trait per collection with a
//! PostgreSQL implementation and an in-memory implementation.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::Store;
