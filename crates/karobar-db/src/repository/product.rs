//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! `stock_quantity` is the denormalized running stock counter. Only the
//! ledger lifecycle manager mutates it, through [`adjust_stock`] on its own
//! transaction connection; nothing else in the application writes that
//! column.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use karobar_core::{Money, Product, ProductCatalog};

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    company: String,
    purchase_price_paisa: i64,
    stocking_unit: String,
    sub_unit: Option<String>,
    conversion_factor: f64,
    stock_quantity: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            company: row.company,
            purchase_price: Money::from_paisa(row.purchase_price_paisa),
            stocking_unit: row.stocking_unit,
            sub_unit: row.sub_unit,
            conversion_factor: row.conversion_factor,
            stock_quantity: row.stock_quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str = "id, name, company, purchase_price_paisa, stocking_unit, \
     sub_unit, conversion_factor, stock_quantity, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, company, purchase_price_paisa, stocking_unit,
                sub_unit, conversion_factor, stock_quantity, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.company)
        .bind(product.purchase_price.paisa())
        .bind(&product.stocking_unit)
        .bind(&product.sub_unit)
        .bind(product.conversion_factor)
        .bind(product.stock_quantity)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Lists all products, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM products ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Deletes a product.
    ///
    /// Posted ledger entries keep their cached product name and render
    /// normally afterwards; the dead reference contributes zero cost and
    /// zero stock movement from then on.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

// =============================================================================
// Transaction-scope helpers (used by the ledger lifecycle manager)
// =============================================================================

/// Loads the referenced products into an in-memory catalog.
///
/// Ids that no longer exist are simply absent from the returned map - the
/// tolerated dead-reference case.
pub async fn fetch_catalog(
    conn: &mut SqliteConnection,
    product_ids: &[String],
) -> DbResult<ProductCatalog> {
    let mut catalog = ProductCatalog::new();

    for id in product_ids {
        if catalog.contains_key(id) {
            continue;
        }
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(row) = row {
            catalog.insert(row.id.clone(), Product::from(row));
        }
    }

    Ok(catalog)
}

/// Applies one signed stock change (in stocking units) to a product.
///
/// A vanished product makes this a no-op, matching the zero delta the
/// reconciliation computed for it.
pub async fn adjust_stock(
    conn: &mut SqliteConnection,
    product_id: &str,
    change: f64,
    now: DateTime<Utc>,
) -> DbResult<()> {
    debug!(product_id = %product_id, change = %change, "Adjusting stock");

    sqlx::query(
        r#"
        UPDATE products SET
            stock_quantity = stock_quantity + ?2,
            updated_at = ?3
        WHERE id = ?1
        "#,
    )
    .bind(product_id)
    .bind(change)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(())
}
