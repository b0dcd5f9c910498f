//! # Validation Module
//!
//! Ledger-entry validation, run before any persistence.
//!
//! A validation failure is surfaced immediately, blocks submission, and
//! guarantees no partial write: stock, ledger and receivables are only
//! touched by entries that passed every check here.
//!
//! Dead references (a line pointing at a deleted product or reward) are
//! *not* validation failures; they degrade to zero contributions downstream.

use crate::error::{ValidationError, ValidationResult};
use crate::types::LedgerDraft;

/// Validates a candidate ledger entry.
///
/// ## Rules
/// - market and salesperson must be selected
/// - at least one line item across sold/damaged/reward lines
/// - due and commission assignees must be selected
/// - quantities and prices must not be negative
/// - per sold line, quantity_returned <= summary_quantity
///   (quantity_sold stays >= 0)
pub fn validate_entry(draft: &LedgerDraft) -> ValidationResult<()> {
    require(&draft.market, "market")?;
    require(&draft.salesperson_id, "salesperson")?;
    require(&draft.due_assigned_to, "due assignee")?;
    require(&draft.commission_assigned_to, "commission assignee")?;

    if draft.items.is_empty() && draft.damaged_items.is_empty() && draft.reward_items.is_empty() {
        return Err(ValidationError::NoLineItems);
    }

    if draft.amount_paid.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "amount paid".to_string(),
        });
    }
    if draft.commission.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "commission".to_string(),
        });
    }

    for item in &draft.items {
        non_negative(item.summary_quantity, "counted quantity")?;
        non_negative(item.quantity_returned, "returned quantity")?;
        if item.price_per_unit.is_negative() {
            return Err(ValidationError::MustBeNonNegative {
                field: format!("price for {}", item.product_name),
            });
        }
        if item.quantity_returned > item.summary_quantity {
            return Err(ValidationError::ReturnedExceedsCounted {
                product: item.product_name.clone(),
                counted: item.summary_quantity,
                returned: item.quantity_returned,
            });
        }
    }

    for item in &draft.damaged_items {
        non_negative(item.quantity, "damaged quantity")?;
        if item.price_per_unit.is_negative() {
            return Err(ValidationError::MustBeNonNegative {
                field: format!("price for {}", item.product_name),
            });
        }
    }

    for item in &draft.reward_items {
        non_negative(item.quantity_sold, "reward quantity")?;
        if item.price_per_unit.is_negative() {
            return Err(ValidationError::MustBeNonNegative {
                field: format!("price for {}", item.reward_name),
            });
        }
    }

    Ok(())
}

fn require(value: &str, field: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn non_negative(value: f64, field: &str) -> ValidationResult<()> {
    if value < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a UUID string format.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{LedgerLineItem, SaleUnit};
    use chrono::NaiveDate;

    fn valid_draft() -> LedgerDraft {
        LedgerDraft {
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            market: "Saddar".to_string(),
            salesperson_id: "emp1".to_string(),
            items: vec![LedgerLineItem {
                product_id: "p1".to_string(),
                product_name: "Biscuits".to_string(),
                unit: SaleUnit::Stocking,
                price_per_unit: Money::from_paisa(1500),
                summary_quantity: 2.0,
                quantity_returned: 0.0,
            }],
            damaged_items: vec![],
            reward_items: vec![],
            amount_paid: Money::from_paisa(3000),
            due_assigned_to: "emp1".to_string(),
            commission: Money::zero(),
            commission_assigned_to: "emp1".to_string(),
        }
    }

    #[test]
    fn test_valid_entry_passes() {
        assert!(validate_entry(&valid_draft()).is_ok());
    }

    #[test]
    fn test_missing_market_rejected() {
        let mut d = valid_draft();
        d.market = "  ".to_string();
        assert!(matches!(
            validate_entry(&d),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_missing_salesperson_rejected() {
        let mut d = valid_draft();
        d.salesperson_id = String::new();
        assert!(validate_entry(&d).is_err());
    }

    #[test]
    fn test_zero_line_items_rejected() {
        let mut d = valid_draft();
        d.items.clear();
        assert!(matches!(
            validate_entry(&d),
            Err(ValidationError::NoLineItems)
        ));
    }

    #[test]
    fn test_returns_exceeding_counted_rejected() {
        let mut d = valid_draft();
        d.items[0].summary_quantity = 2.0;
        d.items[0].quantity_returned = 3.0;
        assert!(matches!(
            validate_entry(&d),
            Err(ValidationError::ReturnedExceedsCounted { .. })
        ));
    }

    #[test]
    fn test_negative_amount_paid_rejected() {
        let mut d = valid_draft();
        d.amount_paid = Money::from_paisa(-100);
        assert!(matches!(
            validate_entry(&d),
            Err(ValidationError::MustBeNonNegative { .. })
        ));
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
