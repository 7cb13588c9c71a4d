//! # photobackup-database
//!
//! SQLite connection management, embedded migrations, and the repository
//! implementations behind the contracts in `photobackup_entity::repository`.
//!
//! Every write goes through the [`invalidation::InvalidationTracker`], which
//! is what makes the `observe_*` queries re-run.

pub mod connection;
pub mod invalidation;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use invalidation::{InvalidationTracker, Table};
