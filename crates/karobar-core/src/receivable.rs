//! # Receivable Derivation & Balance Aggregation
//!
//! Regeneration of the 0-2 ledger-tagged receivable postings for an entry,
//! and the per-employee balance fold.
//!
//! ## Regeneration contract
//! On every create/edit of a ledger entry, the persistence layer deletes
//! every receivable tagged with that ledger id and re-inserts exactly what
//! [`derived_postings`] returns. Because this function is deterministic in
//! the entry, regeneration is idempotent: same entry, same posting set,
//! never duplicates.
//!
//! A negative amount due (overpayment) produces *no* posting; the credit is
//! left for manual reconciliation rather than auto-generating a payment
//! record.

use chrono::NaiveDate;

use crate::money::Money;
use crate::types::{
    LedgerDraft, LedgerTotals, ReceivableOrigin, ReceivableTransaction, ReceivableType,
};

// =============================================================================
// Derived Postings
// =============================================================================

/// A ledger-derived receivable posting, before persistence assigns it an id.
///
/// The structured `origin` discriminator replaces the historical practice of
/// encoding provenance in a string-prefixed identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedPosting {
    pub origin: ReceivableOrigin,
    pub employee_id: String,
    pub date: NaiveDate,
    pub amount: Money,
}

/// The receivable postings a ledger entry should currently have.
///
/// - amount_due > 0: one due-type posting for `due_assigned_to`
/// - commission > 0: one due-type posting for `commission_assigned_to`
/// - anything <= 0 produces nothing
pub fn derived_postings(draft: &LedgerDraft, totals: &LedgerTotals) -> Vec<DerivedPosting> {
    let mut postings = Vec::with_capacity(2);

    if totals.amount_due.is_positive() {
        postings.push(DerivedPosting {
            origin: ReceivableOrigin::LedgerDue,
            employee_id: draft.due_assigned_to.clone(),
            date: draft.date,
            amount: totals.amount_due,
        });
    }

    if draft.commission.is_positive() {
        postings.push(DerivedPosting {
            origin: ReceivableOrigin::LedgerCommission,
            employee_id: draft.commission_assigned_to.clone(),
            date: draft.date,
            amount: draft.commission,
        });
    }

    postings
}

// =============================================================================
// Balance Aggregation
// =============================================================================

/// Signed contribution of one receivable to its employee's balance.
#[inline]
pub fn signed_amount(txn: &ReceivableTransaction) -> Money {
    match txn.txn_type {
        ReceivableType::Due => txn.amount,
        ReceivableType::Payment => -txn.amount,
    }
}

/// Running balance for one employee: dues add, payments subtract.
///
/// An O(n) fold over all receivables, recomputed on each read. The SQL
/// aggregate in `karobar-db` must yield the identical value.
pub fn employee_balance(employee_id: &str, receivables: &[ReceivableTransaction]) -> Money {
    receivables
        .iter()
        .filter(|t| t.employee_id == employee_id)
        .map(signed_amount)
        .sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::derive_totals;
    use crate::types::{LedgerLineItem, SaleUnit};
    use chrono::Utc;

    fn draft_with(amount_paid: i64, commission: i64, gross: i64) -> LedgerDraft {
        LedgerDraft {
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            market: "Saddar".to_string(),
            salesperson_id: "emp-sales".to_string(),
            items: vec![LedgerLineItem {
                product_id: "p1".to_string(),
                product_name: "Biscuits".to_string(),
                unit: SaleUnit::Stocking,
                price_per_unit: Money::from_paisa(gross),
                summary_quantity: 1.0,
                quantity_returned: 0.0,
            }],
            damaged_items: vec![],
            reward_items: vec![],
            amount_paid: Money::from_paisa(amount_paid),
            due_assigned_to: "emp-due".to_string(),
            commission: Money::from_paisa(commission),
            commission_assigned_to: "emp-comm".to_string(),
        }
    }

    fn txn(employee: &str, txn_type: ReceivableType, amount: i64) -> ReceivableTransaction {
        ReceivableTransaction {
            id: uuid::Uuid::new_v4().to_string(),
            ledger_id: None,
            origin: ReceivableOrigin::Manual,
            employee_id: employee.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            txn_type,
            amount: Money::from_paisa(amount),
            note: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_scenario_b_two_postings() {
        // due 130.00 for emp-due, commission 20.00 for emp-comm
        let draft = draft_with(30_000, 2000, 45_000);
        let totals = derive_totals(&draft);
        let postings = derived_postings(&draft, &totals);

        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].origin, ReceivableOrigin::LedgerDue);
        assert_eq!(postings[0].employee_id, "emp-due");
        assert_eq!(postings[0].amount.paisa(), 13_000);
        assert_eq!(postings[1].origin, ReceivableOrigin::LedgerCommission);
        assert_eq!(postings[1].employee_id, "emp-comm");
        assert_eq!(postings[1].amount.paisa(), 2000);
    }

    #[test]
    fn test_scenario_c_zero_due_drops_posting() {
        // Fully paid: commission posting survives alone
        let draft = draft_with(43_000, 2000, 45_000);
        let totals = derive_totals(&draft);
        assert!(totals.amount_due.is_zero());

        let postings = derived_postings(&draft, &totals);
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].origin, ReceivableOrigin::LedgerCommission);
        assert_eq!(postings[0].amount.paisa(), 2000);
    }

    #[test]
    fn test_overpayment_generates_no_payment_record() {
        let draft = draft_with(50_000, 0, 45_000);
        let totals = derive_totals(&draft);
        assert!(totals.amount_due.is_negative());
        assert!(derived_postings(&draft, &totals).is_empty());
    }

    #[test]
    fn test_regeneration_is_deterministic() {
        let draft = draft_with(30_000, 2000, 45_000);
        let totals = derive_totals(&draft);
        assert_eq!(
            derived_postings(&draft, &totals),
            derived_postings(&draft, &totals)
        );
    }

    #[test]
    fn test_employee_balance_fold() {
        let txns = vec![
            txn("emp1", ReceivableType::Due, 13_000),
            txn("emp1", ReceivableType::Payment, 5000),
            txn("emp2", ReceivableType::Due, 700),
            txn("emp1", ReceivableType::Due, 2000),
        ];

        assert_eq!(employee_balance("emp1", &txns).paisa(), 10_000);
        assert_eq!(employee_balance("emp2", &txns).paisa(), 700);
        assert_eq!(employee_balance("emp3", &txns).paisa(), 0);
    }

    #[test]
    fn test_payments_can_drive_balance_negative() {
        let txns = vec![
            txn("emp1", ReceivableType::Due, 1000),
            txn("emp1", ReceivableType::Payment, 2500),
        ];
        assert_eq!(employee_balance("emp1", &txns).paisa(), -1500);
    }
}
