//! # Financial Derivation
//!
//! Pure, side-effect-free derivation of a ledger entry's figures from its
//! line items. Safe to invoke repeatedly for live previews while the entry
//! form is still open.
//!
//! ## Derivation
//! ```text
//! gross_sale   = Σ items.total_price
//! total_damaged= Σ damaged_items.total_price
//! total_sale   = gross_sale - total_damaged
//! amount_due   = total_sale - amount_paid - commission
//! ```
//!
//! Reward valuations are totalled for reporting only; they are *not*
//! subtracted from the net sale, and the due calculation never sees them.
//! `amount_due` may be negative (overpayment); that credit is left for
//! manual reconciliation and never auto-generates a payment record.

use crate::money::Money;
use crate::types::{
    DamagedLineItem, LedgerDraft, LedgerLineItem, LedgerTotals, ProductCatalog, RewardCatalog,
    RewardLineItem,
};
use crate::units;

/// Derives the persisted totals snapshot for a candidate entry.
pub fn derive_totals(draft: &LedgerDraft) -> LedgerTotals {
    let gross_sale: Money = draft.items.iter().map(LedgerLineItem::total_price).sum();
    let total_damaged: Money = draft
        .damaged_items
        .iter()
        .map(DamagedLineItem::total_price)
        .sum();
    let total_reward_value: Money = draft
        .reward_items
        .iter()
        .map(RewardLineItem::total_price)
        .sum();

    let total_sale = gross_sale - total_damaged;
    let amount_due = total_sale - draft.amount_paid - draft.commission;

    LedgerTotals {
        gross_sale,
        total_damaged,
        total_sale,
        total_reward_value,
        amount_due,
    }
}

// =============================================================================
// Profit (reporting only, independent of the due/payment flow)
// =============================================================================

/// Profit on one sold line: revenue minus cost of the quantity sold.
///
/// The cost extension is computed at exact fractional-paisa precision and
/// rounded once. A line whose product was deleted resolves to a zero-profit
/// contribution (not "revenue minus zero cost"); reports display the cached
/// name with a placeholder marker.
pub fn item_profit(item: &LedgerLineItem, catalog: &ProductCatalog) -> Money {
    let Some(product) = catalog.get(&item.product_id) else {
        return Money::zero();
    };
    let cost = Money::from_paisa_f64(
        units::cost_per_unit_paisa(Some(product), item.unit) * item.quantity_sold(),
    );
    item.total_price() - cost
}

/// Profit on one reward giveaway line.
///
/// Purchase-price basis resolution order:
/// 1. the line's own override (ad-hoc custom rewards),
/// 2. the matching catalog entry's purchase price.
///
/// When neither resolves (dead reference, no override) the whole line
/// contributes zero profit.
pub fn reward_profit(item: &RewardLineItem, rewards: &RewardCatalog) -> Money {
    let basis = item
        .purchase_price_override
        .or_else(|| rewards.get(&item.reward_id).map(|r| r.purchase_price));

    match basis {
        Some(basis) => item.total_price() - basis.multiply_quantity(item.quantity_sold),
        None => Money::zero(),
    }
}

/// Total profit of an entry: sold-line profits plus reward profits.
pub fn entry_profit(
    draft: &LedgerDraft,
    catalog: &ProductCatalog,
    rewards: &RewardCatalog,
) -> Money {
    let items: Money = draft.items.iter().map(|i| item_profit(i, catalog)).sum();
    let reward: Money = draft
        .reward_items
        .iter()
        .map(|r| reward_profit(r, rewards))
        .sum();
    items + reward
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaleUnit;
    use chrono::{NaiveDate, Utc};

    fn product(id: &str, purchase_paisa: i64, factor: f64) -> crate::types::Product {
        crate::types::Product {
            id: id.to_string(),
            name: "Biscuits".to_string(),
            company: "LU".to_string(),
            purchase_price: Money::from_paisa(purchase_paisa),
            stocking_unit: "Box".to_string(),
            sub_unit: Some("Piece".to_string()),
            conversion_factor: factor,
            stock_quantity: 10.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sold(product_id: &str, unit: SaleUnit, price: i64, qty: f64) -> LedgerLineItem {
        LedgerLineItem {
            product_id: product_id.to_string(),
            product_name: "Biscuits".to_string(),
            unit,
            price_per_unit: Money::from_paisa(price),
            summary_quantity: qty,
            quantity_returned: 0.0,
        }
    }

    fn draft(items: Vec<LedgerLineItem>, damaged: Vec<DamagedLineItem>) -> LedgerDraft {
        LedgerDraft {
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            market: "Saddar".to_string(),
            salesperson_id: "emp1".to_string(),
            items,
            damaged_items: damaged,
            reward_items: vec![],
            amount_paid: Money::zero(),
            due_assigned_to: "emp1".to_string(),
            commission: Money::zero(),
            commission_assigned_to: "emp1".to_string(),
        }
    }

    #[test]
    fn test_scenario_a_gross_sale() {
        // 2 Box at Rs 15.00 + 6 Piece at Rs 1.50 = Rs 39.00
        let d = draft(
            vec![
                sold("p1", SaleUnit::Stocking, 1500, 2.0),
                sold("p1", SaleUnit::Sub, 150, 6.0),
            ],
            vec![],
        );
        let totals = derive_totals(&d);
        assert_eq!(totals.gross_sale.paisa(), 3900);
        assert_eq!(totals.total_sale.paisa(), 3900);
        assert_eq!(totals.amount_due.paisa(), 3900);
    }

    #[test]
    fn test_scenario_b_amount_due() {
        // gross 500.00, damaged 50.00, paid 300.00, commission 20.00 -> due 130.00
        let mut d = draft(
            vec![sold("p1", SaleUnit::Stocking, 50_000, 1.0)],
            vec![DamagedLineItem {
                product_id: "p1".to_string(),
                product_name: "Biscuits".to_string(),
                unit: SaleUnit::Stocking,
                price_per_unit: Money::from_paisa(5000),
                quantity: 1.0,
            }],
        );
        d.amount_paid = Money::from_paisa(30_000);
        d.commission = Money::from_paisa(2000);

        let totals = derive_totals(&d);
        assert_eq!(totals.gross_sale.paisa(), 50_000);
        assert_eq!(totals.total_damaged.paisa(), 5000);
        assert_eq!(totals.total_sale.paisa(), 45_000);
        assert_eq!(totals.amount_due.paisa(), 13_000);
    }

    #[test]
    fn test_totals_invariants_hold() {
        let mut d = draft(
            vec![
                sold("p1", SaleUnit::Stocking, 1234, 3.0),
                sold("p2", SaleUnit::Sub, 77, 11.0),
            ],
            vec![DamagedLineItem {
                product_id: "p2".to_string(),
                product_name: "Soap".to_string(),
                unit: SaleUnit::Sub,
                price_per_unit: Money::from_paisa(60),
                quantity: 4.0,
            }],
        );
        d.amount_paid = Money::from_paisa(999);
        d.commission = Money::from_paisa(150);

        let t = derive_totals(&d);
        assert_eq!(t.total_sale, t.gross_sale - t.total_damaged);
        assert_eq!(t.amount_due, t.total_sale - d.amount_paid - d.commission);
    }

    #[test]
    fn test_amount_due_may_be_negative() {
        let mut d = draft(vec![sold("p1", SaleUnit::Stocking, 1000, 1.0)], vec![]);
        d.amount_paid = Money::from_paisa(1500);
        assert_eq!(derive_totals(&d).amount_due.paisa(), -500);
    }

    #[test]
    fn test_rewards_tracked_but_not_subtracted() {
        let mut d = draft(vec![sold("p1", SaleUnit::Stocking, 1000, 2.0)], vec![]);
        d.reward_items.push(RewardLineItem {
            reward_id: "r1".to_string(),
            reward_name: "Mug".to_string(),
            main_product_id: Some("p1".to_string()),
            unit: "Piece".to_string(),
            price_per_unit: Money::from_paisa(500),
            purchase_price_override: None,
            quantity_sold: 1.0,
        });

        let t = derive_totals(&d);
        assert_eq!(t.total_reward_value.paisa(), 500);
        // Net sale and due ignore the giveaway entirely
        assert_eq!(t.total_sale.paisa(), 2000);
        assert_eq!(t.amount_due.paisa(), 2000);
    }

    #[test]
    fn test_item_profit_sub_unit_cost() {
        // Sold 6 pieces at Rs 1.50; cost is Rs 12.00 / 12 = Rs 1.00 per
        // piece -> profit 6 x 0.50 = Rs 3.00
        let mut catalog = ProductCatalog::new();
        catalog.insert("p1".to_string(), product("p1", 1200, 12.0));

        let item = sold("p1", SaleUnit::Sub, 150, 6.0);
        assert_eq!(item_profit(&item, &catalog).paisa(), 300);
    }

    #[test]
    fn test_item_profit_missing_product_is_zero() {
        let catalog = ProductCatalog::new();
        let item = sold("ghost", SaleUnit::Stocking, 1500, 2.0);
        assert_eq!(item_profit(&item, &catalog).paisa(), 0);
    }

    #[test]
    fn test_reward_profit_resolution_order() {
        let mut rewards = RewardCatalog::new();
        rewards.insert(
            "r1".to_string(),
            crate::types::Reward {
                id: "r1".to_string(),
                name: "Mug".to_string(),
                purchase_price: Money::from_paisa(300),
                created_at: Utc::now(),
            },
        );

        let mut item = RewardLineItem {
            reward_id: "r1".to_string(),
            reward_name: "Mug".to_string(),
            main_product_id: None,
            unit: "Piece".to_string(),
            price_per_unit: Money::from_paisa(500),
            purchase_price_override: None,
            quantity_sold: 2.0,
        };

        // Catalog basis: (500 - 300) x 2
        assert_eq!(reward_profit(&item, &rewards).paisa(), 400);

        // Override wins over the catalog
        item.purchase_price_override = Some(Money::from_paisa(450));
        assert_eq!(reward_profit(&item, &rewards).paisa(), 100);

        // Dead reference and no override: whole line contributes zero
        item.purchase_price_override = None;
        item.reward_id = "ghost".to_string();
        assert_eq!(reward_profit(&item, &rewards).paisa(), 0);
    }
}
