//! # Domain Types
//!
//! Core domain types for the ledger tracker.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Domain Types                             │
//! │                                                                 │
//! │  ┌───────────────┐  ┌──────────────────┐  ┌──────────────────┐ │
//! │  │    Product    │  │   LedgerEntry    │  │ ReceivableTxn    │ │
//! │  │  ───────────  │  │  ──────────────  │  │  ──────────────  │ │
//! │  │  id (UUID)    │  │  id (UUID)       │  │  id (UUID)       │ │
//! │  │  stocking/sub │  │  items[]         │  │  ledger_id (FK)  │ │
//! │  │  unit labels  │  │  damaged[]       │  │  origin          │ │
//! │  │  stock qty    │  │  rewards[]       │  │  due | payment   │ │
//! │  └───────────────┘  │  totals          │  └──────────────────┘ │
//! │                     └──────────────────┘                       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cached Names
//! Line items and receivable notes carry a *snapshot* of the referenced
//! product/reward name. A product may be deleted after an entry is posted;
//! the entry must still render (the deleted reference then contributes zero
//! cost and zero profit, see [`crate::units`]).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Sale Unit
// =============================================================================

/// Which of a product's two units a line item is denominated in.
///
/// A product's running stock is kept in its *stocking* unit (e.g. "Box").
/// It may define an optional finer *sub* unit (e.g. "Piece") related by a
/// fixed conversion factor (sub-units per one stocking unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum SaleUnit {
    /// The unit the product's stock quantity is denominated in.
    Stocking,
    /// The optional finer-grained unit (conversion_factor sub-units per
    /// stocking unit).
    Sub,
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// `stock_quantity` is denominated in stocking units and may be fractional:
/// selling 6 pieces out of a 12-piece box leaves a 0.5-box remainder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Supplier / manufacturer name.
    pub company: String,

    /// Purchase cost of one *stocking* unit.
    pub purchase_price: Money,

    /// Label of the stocking unit (e.g. "Box", "Carton").
    pub stocking_unit: String,

    /// Label of the optional sub-unit (e.g. "Piece").
    pub sub_unit: Option<String>,

    /// Sub-units per one stocking unit. Only meaningful when > 0.
    pub conversion_factor: f64,

    /// Current stock, in stocking units.
    pub stock_quantity: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Ledger Line Items
// =============================================================================

/// One sold product line on a ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerLineItem {
    /// Referenced product. The product may be deleted later; `product_name`
    /// is the display snapshot.
    pub product_id: String,
    pub product_name: String,

    /// Unit this line is counted and priced in.
    pub unit: SaleUnit,

    /// Selling price per one `unit`.
    pub price_per_unit: Money,

    /// Quantity counted before returns.
    pub summary_quantity: f64,

    /// Quantity returned unsold.
    pub quantity_returned: f64,
}

impl LedgerLineItem {
    /// Net quantity actually sold. Invariant: >= 0 (enforced by validation).
    #[inline]
    pub fn quantity_sold(&self) -> f64 {
        self.summary_quantity - self.quantity_returned
    }

    /// Revenue for this line: quantity_sold x price_per_unit.
    #[inline]
    pub fn total_price(&self) -> Money {
        self.price_per_unit.multiply_quantity(self.quantity_sold())
    }
}

/// One damaged-goods line on a ledger entry.
///
/// Reduces stock and gross sale (priced at purchase-price basis), but
/// contributes no revenue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamagedLineItem {
    pub product_id: String,
    pub product_name: String,
    pub unit: SaleUnit,

    /// Purchase-price basis per one `unit`.
    pub price_per_unit: Money,

    pub quantity: f64,
}

impl DamagedLineItem {
    /// Write-off value for this line: quantity x price_per_unit.
    #[inline]
    pub fn total_price(&self) -> Money {
        self.price_per_unit.multiply_quantity(self.quantity)
    }
}

/// One promotional-reward giveaway line on a ledger entry.
///
/// Rewards never touch product stock and are *not* subtracted from the net
/// sale; their value is tracked for reporting only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardLineItem {
    /// Referenced reward catalog entry.
    pub reward_id: String,
    pub reward_name: String,

    /// Links the giveaway to the product sale that earned it, for profit
    /// attribution in reports.
    pub main_product_id: Option<String>,

    /// Free-text unit label (rewards have no stock to convert).
    pub unit: String,

    /// Selling-price valuation per unit.
    pub price_per_unit: Money,

    /// Purchase-price basis override for ad-hoc custom rewards. When absent
    /// the matching catalog entry's purchase price is used.
    pub purchase_price_override: Option<Money>,

    pub quantity_sold: f64,
}

impl RewardLineItem {
    /// Valuation of this giveaway: quantity_sold x price_per_unit.
    #[inline]
    pub fn total_price(&self) -> Money {
        self.price_per_unit.multiply_quantity(self.quantity_sold)
    }
}

// =============================================================================
// Ledger Entry
// =============================================================================

/// Derived financial totals persisted with a ledger entry.
///
/// ## Invariants
/// - `total_sale == gross_sale - total_damaged`
/// - `amount_due == total_sale - amount_paid - commission`
/// - `total_reward_value` is reporting-only and never enters `amount_due`
///
/// The presentation layer renders these figures as-is and must not
/// recompute them with divergent formulas.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LedgerTotals {
    pub gross_sale: Money,
    pub total_damaged: Money,
    pub total_sale: Money,
    pub total_reward_value: Money,
    pub amount_due: Money,
}

/// Candidate ledger entry, as submitted by the entry form.
///
/// Everything needed to derive totals and postings, minus identity and
/// timestamps. An edit always submits a *full* replacement draft; partial
/// field patches do not exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerDraft {
    pub date: NaiveDate,
    pub market: String,
    pub salesperson_id: String,
    pub items: Vec<LedgerLineItem>,
    pub damaged_items: Vec<DamagedLineItem>,
    pub reward_items: Vec<RewardLineItem>,
    pub amount_paid: Money,
    /// Employee who carries the unpaid remainder.
    pub due_assigned_to: String,
    pub commission: Money,
    /// Employee who earned the commission.
    pub commission_assigned_to: String,
}

/// One recorded sales/delivery event for a salesperson at a market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub date: NaiveDate,
    pub market: String,
    pub salesperson_id: String,
    pub items: Vec<LedgerLineItem>,
    pub damaged_items: Vec<DamagedLineItem>,
    pub reward_items: Vec<RewardLineItem>,
    pub amount_paid: Money,
    pub due_assigned_to: String,
    pub commission: Money,
    pub commission_assigned_to: String,
    /// Derived snapshot, always produced by [`crate::finance::derive_totals`].
    pub totals: LedgerTotals,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Copies the editable fields of this entry back into a draft, for
    /// edit flows that start from the stored state.
    pub fn to_draft(&self) -> LedgerDraft {
        LedgerDraft {
            date: self.date,
            market: self.market.clone(),
            salesperson_id: self.salesperson_id.clone(),
            items: self.items.clone(),
            damaged_items: self.damaged_items.clone(),
            reward_items: self.reward_items.clone(),
            amount_paid: self.amount_paid,
            due_assigned_to: self.due_assigned_to.clone(),
            commission: self.commission,
            commission_assigned_to: self.commission_assigned_to.clone(),
        }
    }
}

// =============================================================================
// Receivables
// =============================================================================

/// Direction of a receivable transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum ReceivableType {
    /// Amount owed by the employee (adds to their balance).
    Due,
    /// Amount settled by the employee (subtracts from their balance).
    Payment,
}

/// Where a receivable transaction came from.
///
/// Ledger-derived postings are fully replaced (delete-then-recreate) on
/// every edit of their ledger entry; manual ones are never touched by the
/// reconciliation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ReceivableOrigin {
    /// Entered by hand in the receivables screen.
    Manual,
    /// The ledger entry's unpaid-remainder posting (at most one per entry).
    LedgerDue,
    /// The ledger entry's commission posting (at most one per entry).
    LedgerCommission,
}

/// A record of an amount owed by (due) or settled by (payment) an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivableTransaction {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Set when this posting was generated from a ledger entry.
    pub ledger_id: Option<String>,

    pub origin: ReceivableOrigin,
    pub employee_id: String,
    pub date: NaiveDate,
    pub txn_type: ReceivableType,
    pub amount: Money,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Employees & Rewards (read-only collaborator data)
// =============================================================================

/// An employee (salesperson, helper, driver).
///
/// Managed elsewhere in the application; the reconciliation core only reads
/// employees to attribute dues and commissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub daily_salary: Money,
    pub created_at: DateTime<Utc>,
}

/// A promotional-reward catalog entry (id -> purchase-price basis).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    pub name: String,
    /// Purchase-price basis used for reward profit when a line has no
    /// override.
    pub purchase_price: Money,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Catalog Lookups
// =============================================================================

/// In-memory product catalog keyed by product id.
///
/// Line items resolve their product through this map; a missing key is the
/// tolerated dead-reference case and contributes zero everywhere.
pub type ProductCatalog = std::collections::HashMap<String, Product>;

/// In-memory reward catalog keyed by reward id.
pub type RewardCatalog = std::collections::HashMap<String, Reward>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(summary: f64, returned: f64, price: i64) -> LedgerLineItem {
        LedgerLineItem {
            product_id: "p1".to_string(),
            product_name: "Soap".to_string(),
            unit: SaleUnit::Stocking,
            price_per_unit: Money::from_paisa(price),
            summary_quantity: summary,
            quantity_returned: returned,
        }
    }

    #[test]
    fn test_quantity_sold_subtracts_returns() {
        let item = line(10.0, 3.0, 1500);
        assert_eq!(item.quantity_sold(), 7.0);
        assert_eq!(item.total_price().paisa(), 10_500);
    }

    #[test]
    fn test_damaged_total_price() {
        let item = DamagedLineItem {
            product_id: "p1".to_string(),
            product_name: "Soap".to_string(),
            unit: SaleUnit::Sub,
            price_per_unit: Money::from_paisa(1000),
            quantity: 2.0,
        };
        assert_eq!(item.total_price().paisa(), 2000);
    }

    #[test]
    fn test_reward_total_price() {
        let item = RewardLineItem {
            reward_id: "r1".to_string(),
            reward_name: "Mug".to_string(),
            main_product_id: None,
            unit: "Piece".to_string(),
            price_per_unit: Money::from_paisa(250),
            purchase_price_override: None,
            quantity_sold: 4.0,
        };
        assert_eq!(item.total_price().paisa(), 1000);
    }

    #[test]
    fn test_entry_round_trips_through_draft() {
        let entry = LedgerEntry {
            id: "e1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            market: "Saddar".to_string(),
            salesperson_id: "emp1".to_string(),
            items: vec![line(2.0, 0.0, 1500)],
            damaged_items: vec![],
            reward_items: vec![],
            amount_paid: Money::from_paisa(3000),
            due_assigned_to: "emp1".to_string(),
            commission: Money::zero(),
            commission_assigned_to: "emp1".to_string(),
            totals: LedgerTotals::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let draft = entry.to_draft();
        assert_eq!(draft.market, "Saddar");
        assert_eq!(draft.items.len(), 1);
    }
}
