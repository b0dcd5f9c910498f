//! # karobar-core: Pure Business Logic for Karobar
//!
//! This crate is the heart of the ledger tracker. It contains the entire
//! ledger-entry reconciliation logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    Karobar Architecture                          │
//! │                                                                  │
//! │  ┌────────────────────────────────────────────────────────────┐ │
//! │  │            Presentation (forms, statements, dashboards)    │ │
//! │  │      renders figures derived here - never recomputes       │ │
//! │  └───────────────────────────┬────────────────────────────────┘ │
//! │                              │                                   │
//! │  ┌───────────────────────────▼────────────────────────────────┐ │
//! │  │               ★ karobar-core (THIS CRATE) ★                │ │
//! │  │                                                            │ │
//! │  │  ┌───────┐ ┌───────┐ ┌─────────┐ ┌───────┐ ┌────────────┐ │ │
//! │  │  │ money │ │ units │ │ finance │ │ stock │ │ receivable │ │ │
//! │  │  └───────┘ └───────┘ └─────────┘ └───────┘ └────────────┘ │ │
//! │  │                                                            │ │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │ │
//! │  └───────────────────────────┬────────────────────────────────┘ │
//! │                              │                                   │
//! │  ┌───────────────────────────▼────────────────────────────────┐ │
//! │  │              karobar-db (persistence + lifecycle)          │ │
//! │  └────────────────────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, LedgerEntry, ReceivableTransaction, ...)
//! - [`money`] - Integer-paisa Money type (no floating-point amounts)
//! - [`units`] - Stocking-unit / sub-unit conversion resolver
//! - [`finance`] - Gross/net sale, due, commission and profit derivation
//! - [`stock`] - Signed stock deltas (revert-then-apply reconciliation)
//! - [`receivable`] - Derived receivable postings and balance aggregation
//! - [`validation`] - Entry validation (blocks submission, no partial writes)
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same entry in, same figures out - safe for previews
//! 2. **No I/O**: database access lives in karobar-db only
//! 3. **Integer money**: paisa (i64), one rounding point per extended amount
//! 4. **Tolerant lookups**: a deleted product/reward degrades to a zero
//!    contribution, never a failure of the containing entry

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod finance;
pub mod money;
pub mod receivable;
pub mod stock;
pub mod types;
pub mod units;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError, ValidationResult};
pub use money::Money;
pub use receivable::{derived_postings, employee_balance, DerivedPosting};
pub use stock::{apply_deltas, stock_deltas, DeltaDirection, StockDelta};
pub use types::*;
