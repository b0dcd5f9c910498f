//! # Stock Reconciliation
//!
//! Signed stock deltas implied by a ledger entry's sold and damaged lines.
//!
//! ## Revert-then-apply
//! Editing an entry from OLD to NEW is expressed as two delta passes over
//! the same catalog snapshot:
//! ```text
//! 1. Revert every delta implied by OLD.items + OLD.damaged_items
//! 2. Commit every delta implied by NEW.items + NEW.damaged_items
//! ```
//! Creation is the special case with no OLD pass; deletion the one with no
//! NEW pass. Both passes must land inside a single durable transaction
//! (see `karobar-db`'s lifecycle manager) so a crash between them cannot
//! leave stock permanently out of sync with the ledger.
//!
//! Quantities here are in *stocking units* (sub-unit lines are converted
//! through the product's conversion factor). A line referencing a deleted
//! product converts to a zero delta and is dropped.

use std::collections::HashMap;

use crate::types::{DamagedLineItem, LedgerLineItem, ProductCatalog};
use crate::units;

// =============================================================================
// Delta Types
// =============================================================================

/// Which phase of the revert-then-apply sequence a delta pass belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaDirection {
    /// Add stock back (undoing a previously committed entry).
    Revert,
    /// Subtract stock (committing an entry).
    Commit,
}

impl DeltaDirection {
    /// Sign applied to converted quantities: reverting adds stock back,
    /// committing subtracts it.
    #[inline]
    fn sign(self) -> f64 {
        match self {
            DeltaDirection::Revert => 1.0,
            DeltaDirection::Commit => -1.0,
        }
    }
}

/// A net change to one product's stock, in stocking units.
#[derive(Debug, Clone, PartialEq)]
pub struct StockDelta {
    pub product_id: String,
    /// Positive adds stock back, negative subtracts.
    pub change: f64,
}

// =============================================================================
// Delta Computation
// =============================================================================

/// Computes the merged stock deltas implied by one entry's sold and damaged
/// lines, one delta per referenced (and still existing) product.
///
/// Sold lines move stock by their *net* sold quantity (after returns);
/// damaged lines by their full quantity. Both reduce stock on commit and
/// restore it on revert.
pub fn stock_deltas(
    items: &[LedgerLineItem],
    damaged_items: &[DamagedLineItem],
    direction: DeltaDirection,
    catalog: &ProductCatalog,
) -> Vec<StockDelta> {
    let mut merged: HashMap<String, f64> = HashMap::new();
    let sign = direction.sign();

    for item in items {
        let product = catalog.get(&item.product_id);
        if product.is_none() {
            continue;
        }
        let qty = units::to_stocking_units(item.quantity_sold(), item.unit, product);
        *merged.entry(item.product_id.clone()).or_insert(0.0) += sign * qty;
    }

    for item in damaged_items {
        let product = catalog.get(&item.product_id);
        if product.is_none() {
            continue;
        }
        let qty = units::to_stocking_units(item.quantity, item.unit, product);
        *merged.entry(item.product_id.clone()).or_insert(0.0) += sign * qty;
    }

    let mut deltas: Vec<StockDelta> = merged
        .into_iter()
        .map(|(product_id, change)| StockDelta { product_id, change })
        .collect();
    // Stable order for deterministic application and logging
    deltas.sort_by(|a, b| a.product_id.cmp(&b.product_id));
    deltas
}

/// Folds deltas into an in-memory catalog.
///
/// The persistence layer applies deltas with SQL updates; this fold exists
/// for previews and for asserting the conservation and edit-equivalence
/// properties in tests. Deltas for unknown products are ignored.
pub fn apply_deltas(catalog: &mut ProductCatalog, deltas: &[StockDelta]) {
    for delta in deltas {
        if let Some(product) = catalog.get_mut(&delta.product_id) {
            product.stock_quantity += delta.change;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{Product, SaleUnit};
    use chrono::Utc;

    fn product(id: &str, factor: f64, stock: f64) -> Product {
        Product {
            id: id.to_string(),
            name: "Biscuits".to_string(),
            company: "LU".to_string(),
            purchase_price: Money::from_paisa(12_000),
            stocking_unit: "Box".to_string(),
            sub_unit: Some("Piece".to_string()),
            conversion_factor: factor,
            stock_quantity: stock,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn catalog(products: Vec<Product>) -> ProductCatalog {
        products.into_iter().map(|p| (p.id.clone(), p)).collect()
    }

    fn sold(product_id: &str, unit: SaleUnit, qty: f64, returned: f64) -> LedgerLineItem {
        LedgerLineItem {
            product_id: product_id.to_string(),
            product_name: "Biscuits".to_string(),
            unit,
            price_per_unit: Money::from_paisa(1500),
            summary_quantity: qty,
            quantity_returned: returned,
        }
    }

    fn damaged(product_id: &str, unit: SaleUnit, qty: f64) -> DamagedLineItem {
        DamagedLineItem {
            product_id: product_id.to_string(),
            product_name: "Biscuits".to_string(),
            unit,
            price_per_unit: Money::from_paisa(1000),
            quantity: qty,
        }
    }

    #[test]
    fn test_scenario_a_commit_delta() {
        // 2 Box + 6 Piece (factor 12) -> -(2 + 0.5) = -2.5 boxes
        let cat = catalog(vec![product("p1", 12.0, 10.0)]);
        let deltas = stock_deltas(
            &[
                sold("p1", SaleUnit::Stocking, 2.0, 0.0),
                sold("p1", SaleUnit::Sub, 6.0, 0.0),
            ],
            &[],
            DeltaDirection::Commit,
            &cat,
        );

        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].product_id, "p1");
        assert!((deltas[0].change - (-2.5)).abs() < 1e-9);

        let mut cat = cat;
        apply_deltas(&mut cat, &deltas);
        assert!((cat["p1"].stock_quantity - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_returns_reduce_sold_delta() {
        // Counted 5, returned 2 -> only 3 leave stock
        let cat = catalog(vec![product("p1", 12.0, 10.0)]);
        let deltas = stock_deltas(
            &[sold("p1", SaleUnit::Stocking, 5.0, 2.0)],
            &[],
            DeltaDirection::Commit,
            &cat,
        );
        assert!((deltas[0].change - (-3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_damaged_lines_reduce_stock() {
        let cat = catalog(vec![product("p1", 12.0, 10.0)]);
        let deltas = stock_deltas(
            &[],
            &[damaged("p1", SaleUnit::Sub, 6.0)],
            DeltaDirection::Commit,
            &cat,
        );
        assert!((deltas[0].change - (-0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_revert_is_mirror_of_commit() {
        let cat = catalog(vec![product("p1", 12.0, 10.0), product("p2", 6.0, 4.0)]);
        let items = [
            sold("p1", SaleUnit::Stocking, 2.0, 0.0),
            sold("p2", SaleUnit::Sub, 3.0, 1.0),
        ];
        let dmg = [damaged("p1", SaleUnit::Sub, 12.0)];

        let commit = stock_deltas(&items, &dmg, DeltaDirection::Commit, &cat);
        let revert = stock_deltas(&items, &dmg, DeltaDirection::Revert, &cat);

        assert_eq!(commit.len(), revert.len());
        for (c, r) in commit.iter().zip(revert.iter()) {
            assert_eq!(c.product_id, r.product_id);
            assert!((c.change + r.change).abs() < 1e-9);
        }
    }

    #[test]
    fn test_stock_conservation_create_then_revert() {
        let mut cat = catalog(vec![product("p1", 12.0, 10.0), product("p2", 7.0, 3.25)]);
        let before = cat.clone();
        let items = [
            sold("p1", SaleUnit::Sub, 5.0, 0.0),
            sold("p2", SaleUnit::Stocking, 1.0, 0.0),
        ];
        let dmg = [damaged("p2", SaleUnit::Sub, 2.0)];

        let commit = stock_deltas(&items, &dmg, DeltaDirection::Commit, &cat);
        apply_deltas(&mut cat, &commit);
        let revert = stock_deltas(&items, &dmg, DeltaDirection::Revert, &cat);
        apply_deltas(&mut cat, &revert);

        for (id, p) in &before {
            assert!(
                (cat[id].stock_quantity - p.stock_quantity).abs() < 1e-9,
                "stock drifted for {id}"
            );
        }
    }

    #[test]
    fn test_edit_equivalence() {
        // S0 -> create E1 -> edit E1->E2 must equal S0 -> create E2
        let s0 = catalog(vec![product("p1", 12.0, 10.0)]);

        let e1_items = [sold("p1", SaleUnit::Stocking, 2.0, 0.0)];
        let e2_items = [sold("p1", SaleUnit::Sub, 9.0, 0.0)];

        // Path 1: create E1, then revert E1 + commit E2
        let mut edited = s0.clone();
        apply_deltas(
            &mut edited,
            &stock_deltas(&e1_items, &[], DeltaDirection::Commit, &s0),
        );
        let snapshot = edited.clone();
        apply_deltas(
            &mut edited,
            &stock_deltas(&e1_items, &[], DeltaDirection::Revert, &snapshot),
        );
        apply_deltas(
            &mut edited,
            &stock_deltas(&e2_items, &[], DeltaDirection::Commit, &snapshot),
        );

        // Path 2: create E2 fresh from S0
        let mut fresh = s0.clone();
        apply_deltas(
            &mut fresh,
            &stock_deltas(&e2_items, &[], DeltaDirection::Commit, &s0),
        );

        assert!((edited["p1"].stock_quantity - fresh["p1"].stock_quantity).abs() < 1e-9);
    }

    #[test]
    fn test_missing_product_contributes_no_delta() {
        let cat = catalog(vec![product("p1", 12.0, 10.0)]);
        let deltas = stock_deltas(
            &[
                sold("ghost", SaleUnit::Stocking, 4.0, 0.0),
                sold("p1", SaleUnit::Stocking, 1.0, 0.0),
            ],
            &[],
            DeltaDirection::Commit,
            &cat,
        );
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].product_id, "p1");
    }
}
