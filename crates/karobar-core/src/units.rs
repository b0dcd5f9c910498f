//! # Unit Conversion Resolver
//!
//! Pure lookups converting between a product's stocking unit and its
//! optional sub-unit, for cost and quantity purposes.
//!
//! ## Tolerated absence
//! Every resolver takes `Option<&Product>`. A line item may reference a
//! product that was deleted after the entry was posted; that reference
//! resolves to a zero contribution instead of failing the containing
//! computation. The cached `product_name` on the line item keeps the entry
//! renderable.
//!
//! ## Invalid conversion factors
//! A conversion factor <= 0 makes the sub-unit meaningless; cost and
//! quantity in that unit resolve to zero rather than raising. This mirrors
//! the historical behavior of the data set and is deliberate.

use crate::money::Money;
use crate::types::{Product, SaleUnit};

/// Purchase cost of one `unit` of `product`, rounded to the paisa.
///
/// - Stocking unit: the product's purchase price as stored.
/// - Sub unit: purchase price / conversion factor.
/// - Missing product or factor <= 0: zero.
pub fn cost_per_unit(product: Option<&Product>, unit: SaleUnit) -> Money {
    Money::from_paisa_f64(cost_per_unit_paisa(product, unit))
}

/// Exact (fractional-paisa) cost of one `unit`, for extending by a
/// quantity before rounding once.
pub(crate) fn cost_per_unit_paisa(product: Option<&Product>, unit: SaleUnit) -> f64 {
    let Some(product) = product else {
        return 0.0;
    };

    match unit {
        SaleUnit::Stocking => product.purchase_price.paisa() as f64,
        SaleUnit::Sub => {
            if product.conversion_factor > 0.0 {
                product.purchase_price.paisa() as f64 / product.conversion_factor
            } else {
                0.0
            }
        }
    }
}

/// Converts a quantity counted in `unit` into stocking units.
///
/// Identity for the stocking unit; divided by the conversion factor for the
/// sub unit (zero when the factor is invalid). Missing product converts to
/// zero, so the caller's stock arithmetic is a no-op for dead references.
pub fn to_stocking_units(quantity: f64, unit: SaleUnit, product: Option<&Product>) -> f64 {
    let Some(product) = product else {
        return 0.0;
    };

    match unit {
        SaleUnit::Stocking => quantity,
        SaleUnit::Sub => {
            if product.conversion_factor > 0.0 {
                quantity / product.conversion_factor
            } else {
                0.0
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn boxed_product(factor: f64) -> Product {
        Product {
            id: "p1".to_string(),
            name: "Biscuits".to_string(),
            company: "LU".to_string(),
            purchase_price: Money::from_paisa(12_000), // Rs 120.00 per box
            stocking_unit: "Box".to_string(),
            sub_unit: Some("Piece".to_string()),
            conversion_factor: factor,
            stock_quantity: 10.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_cost_per_stocking_unit() {
        let p = boxed_product(12.0);
        assert_eq!(cost_per_unit(Some(&p), SaleUnit::Stocking).paisa(), 12_000);
    }

    #[test]
    fn test_cost_per_sub_unit_divides_by_factor() {
        let p = boxed_product(12.0);
        assert_eq!(cost_per_unit(Some(&p), SaleUnit::Sub).paisa(), 1000);
    }

    #[test]
    fn test_invalid_factor_resolves_to_zero() {
        let p = boxed_product(0.0);
        assert_eq!(cost_per_unit(Some(&p), SaleUnit::Sub).paisa(), 0);
        assert_eq!(to_stocking_units(6.0, SaleUnit::Sub, Some(&p)), 0.0);
    }

    #[test]
    fn test_missing_product_resolves_to_zero() {
        assert_eq!(cost_per_unit(None, SaleUnit::Stocking).paisa(), 0);
        assert_eq!(to_stocking_units(5.0, SaleUnit::Stocking, None), 0.0);
    }

    #[test]
    fn test_to_stocking_units() {
        let p = boxed_product(12.0);
        assert_eq!(to_stocking_units(2.0, SaleUnit::Stocking, Some(&p)), 2.0);
        assert_eq!(to_stocking_units(6.0, SaleUnit::Sub, Some(&p)), 0.5);
    }
}
