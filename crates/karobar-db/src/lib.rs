//! # karobar-db: Persistence and Lifecycle Layer for Karobar
//!
//! This crate provides database access for the Karobar ledger tracker.
//! It uses SQLite for local storage with sqlx for async operations, and
//! hosts the ledger lifecycle manager that keeps stock, ledger entries
//! and receivables reconciled.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Karobar Data Flow                            │
//! │                                                                     │
//! │  Entry form (create / edit / delete)                                │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                   karobar-db (THIS CRATE)                   │   │
//! │  │                                                             │   │
//! │  │   ┌───────────────────┐      ┌──────────────────────────┐  │   │
//! │  │   │  LedgerService    │─────►│  Repositories            │  │   │
//! │  │   │  one transaction: │      │  product / employee /    │  │   │
//! │  │   │  revert old stock │      │  reward / ledger /       │  │   │
//! │  │   │  apply new stock  │      │  receivable              │  │   │
//! │  │   │  replace entry    │      └──────────────────────────┘  │   │
//! │  │   │  regen postings   │      ┌──────────────────────────┐  │   │
//! │  │   └───────────────────┘      │  Database (pool.rs)      │  │   │
//! │  │            │                 │  Migrations (embedded)   │  │   │
//! │  │            ▼                 └──────────────────────────┘  │   │
//! │  │     karobar-core (pure derivation, no I/O)                 │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database (karobar.db)                                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, ledger, etc.)
//! - [`ledger_service`] - Create/edit/delete orchestration for ledger entries
//! - [`sms`] - Outbound SMS notifications (above the reconciliation flow)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use karobar_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/karobar.db")).await?;
//! db.run_migrations().await?;
//!
//! let entry = db.ledger_service().create_entry(draft).await?;
//! let balance = db.receivables().employee_balance(&employee_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger_service;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod sms;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use ledger_service::LedgerService;
pub use pool::{Database, DbConfig};
pub use sms::{HttpSmsGateway, NoopSmsGateway, SmsConfig, SmsGateway, SmsOutcome};

// Repository re-exports for convenience
pub use repository::employee::EmployeeRepository;
pub use repository::ledger::{LedgerRepository, LedgerSummary};
pub use repository::product::ProductRepository;
pub use repository::receivable::ReceivableRepository;
pub use repository::reward::RewardRepository;
