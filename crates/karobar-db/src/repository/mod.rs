//! # Repository Module
//!
//! Repository implementations for database access.
//!
//! Each repository owns the SQL for one collection. Reads go through the
//! pool; writes that must be atomic with the ledger lifecycle take an
//! explicit `&mut SqliteConnection` so the lifecycle manager can run them
//! inside its transaction.

pub mod employee;
pub mod ledger;
pub mod product;
pub mod receivable;
pub mod reward;
