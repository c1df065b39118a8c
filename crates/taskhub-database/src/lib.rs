//! # taskhub-database
//!
//! Store traits for every TaskHub entity, with a PostgreSQL implementation
//! for deployments and a `DashMap`-backed implementation for single-process
//! runs and tests. [`Database`] bundles one implementation of each store,
//! selected by `database.provider`.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod provider;
pub mod store;

pub use connection::DatabasePool;
pub use provider::Database;
pub use store::{JobStore, TaskLogStore, TaskStore, UserStore};
