//! # Ledger Repository
//!
//! Row mapping and persistence for ledger entries and their line items.
//!
//! Reads are served from the pool. All *mutations* take an explicit
//! transaction connection and are only ever called by the lifecycle
//! manager: an entry is never inserted or deleted outside the transaction
//! that also reconciles stock and receivables.
//!
//! An entry is stored as one `ledger_entries` row plus child rows in
//! `ledger_items`, `ledger_damaged_items` and `ledger_reward_items`
//! (`ON DELETE CASCADE`). Edits are full replacement: delete the old rows,
//! insert the new ones.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use karobar_core::{
    DamagedLineItem, LedgerEntry, LedgerLineItem, LedgerTotals, Money, RewardLineItem, SaleUnit,
};

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct EntryRow {
    id: String,
    entry_date: NaiveDate,
    market: String,
    salesperson_id: String,
    amount_paid_paisa: i64,
    commission_paisa: i64,
    due_assigned_to: String,
    commission_assigned_to: String,
    gross_sale_paisa: i64,
    total_damaged_paisa: i64,
    total_sale_paisa: i64,
    total_reward_paisa: i64,
    amount_due_paisa: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    product_id: String,
    product_name: String,
    unit: SaleUnit,
    price_per_unit_paisa: i64,
    summary_quantity: f64,
    quantity_returned: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct DamagedRow {
    product_id: String,
    product_name: String,
    unit: SaleUnit,
    price_per_unit_paisa: i64,
    quantity: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct RewardRow {
    reward_id: String,
    reward_name: String,
    main_product_id: Option<String>,
    unit: String,
    price_per_unit_paisa: i64,
    purchase_price_override_paisa: Option<i64>,
    quantity_sold: f64,
}

const ENTRY_COLUMNS: &str = "id, entry_date, market, salesperson_id, amount_paid_paisa, \
     commission_paisa, due_assigned_to, commission_assigned_to, gross_sale_paisa, \
     total_damaged_paisa, total_sale_paisa, total_reward_paisa, amount_due_paisa, \
     created_at, updated_at";

fn assemble(
    row: EntryRow,
    items: Vec<ItemRow>,
    damaged: Vec<DamagedRow>,
    rewards: Vec<RewardRow>,
) -> LedgerEntry {
    LedgerEntry {
        id: row.id,
        date: row.entry_date,
        market: row.market,
        salesperson_id: row.salesperson_id,
        items: items
            .into_iter()
            .map(|r| LedgerLineItem {
                product_id: r.product_id,
                product_name: r.product_name,
                unit: r.unit,
                price_per_unit: Money::from_paisa(r.price_per_unit_paisa),
                summary_quantity: r.summary_quantity,
                quantity_returned: r.quantity_returned,
            })
            .collect(),
        damaged_items: damaged
            .into_iter()
            .map(|r| DamagedLineItem {
                product_id: r.product_id,
                product_name: r.product_name,
                unit: r.unit,
                price_per_unit: Money::from_paisa(r.price_per_unit_paisa),
                quantity: r.quantity,
            })
            .collect(),
        reward_items: rewards
            .into_iter()
            .map(|r| RewardLineItem {
                reward_id: r.reward_id,
                reward_name: r.reward_name,
                main_product_id: r.main_product_id,
                unit: r.unit,
                price_per_unit: Money::from_paisa(r.price_per_unit_paisa),
                purchase_price_override: r.purchase_price_override_paisa.map(Money::from_paisa),
                quantity_sold: r.quantity_sold,
            })
            .collect(),
        amount_paid: Money::from_paisa(row.amount_paid_paisa),
        due_assigned_to: row.due_assigned_to,
        commission: Money::from_paisa(row.commission_paisa),
        commission_assigned_to: row.commission_assigned_to,
        totals: LedgerTotals {
            gross_sale: Money::from_paisa(row.gross_sale_paisa),
            total_damaged: Money::from_paisa(row.total_damaged_paisa),
            total_sale: Money::from_paisa(row.total_sale_paisa),
            total_reward_value: Money::from_paisa(row.total_reward_paisa),
            amount_due: Money::from_paisa(row.amount_due_paisa),
        },
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

// =============================================================================
// Repository (reads)
// =============================================================================

/// Listing row for the ledger screens (no line items attached).
#[derive(Debug, Clone)]
pub struct LedgerSummary {
    pub id: String,
    pub date: NaiveDate,
    pub market: String,
    pub salesperson_id: String,
    pub totals: LedgerTotals,
}

/// Repository for ledger reads.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Loads a full entry (with all line items) by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<LedgerEntry>> {
        let mut conn = self.pool.acquire().await?;
        fetch_entry(&mut conn, id).await
    }

    /// Lists entries for one date, newest first.
    pub async fn list_by_date(&self, date: NaiveDate) -> DbResult<Vec<LedgerSummary>> {
        let rows: Vec<EntryRow> = sqlx::query_as(&format!(
            "SELECT {ENTRY_COLUMNS} FROM ledger_entries \
             WHERE entry_date = ?1 ORDER BY created_at DESC"
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(summary_from).collect())
    }

    /// Lists all entries, newest first.
    pub async fn list(&self) -> DbResult<Vec<LedgerSummary>> {
        let rows: Vec<EntryRow> = sqlx::query_as(&format!(
            "SELECT {ENTRY_COLUMNS} FROM ledger_entries \
             ORDER BY entry_date DESC, created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(summary_from).collect())
    }
}

fn summary_from(row: EntryRow) -> LedgerSummary {
    LedgerSummary {
        totals: LedgerTotals {
            gross_sale: Money::from_paisa(row.gross_sale_paisa),
            total_damaged: Money::from_paisa(row.total_damaged_paisa),
            total_sale: Money::from_paisa(row.total_sale_paisa),
            total_reward_value: Money::from_paisa(row.total_reward_paisa),
            amount_due: Money::from_paisa(row.amount_due_paisa),
        },
        id: row.id,
        date: row.entry_date,
        market: row.market,
        salesperson_id: row.salesperson_id,
    }
}

// =============================================================================
// Transaction-scope operations (used by the ledger lifecycle manager)
// =============================================================================

/// Loads a full entry inside a transaction.
pub async fn fetch_entry(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<LedgerEntry>> {
    let row: Option<EntryRow> = sqlx::query_as(&format!(
        "SELECT {ENTRY_COLUMNS} FROM ledger_entries WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let items: Vec<ItemRow> = sqlx::query_as(
        "SELECT product_id, product_name, unit, price_per_unit_paisa, \
         summary_quantity, quantity_returned \
         FROM ledger_items WHERE ledger_id = ?1 ORDER BY position",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    let damaged: Vec<DamagedRow> = sqlx::query_as(
        "SELECT product_id, product_name, unit, price_per_unit_paisa, quantity \
         FROM ledger_damaged_items WHERE ledger_id = ?1 ORDER BY position",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    let rewards: Vec<RewardRow> = sqlx::query_as(
        "SELECT reward_id, reward_name, main_product_id, unit, price_per_unit_paisa, \
         purchase_price_override_paisa, quantity_sold \
         FROM ledger_reward_items WHERE ledger_id = ?1 ORDER BY position",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(assemble(row, items, damaged, rewards)))
}

/// Inserts an entry and all its child rows.
pub async fn insert_entry(conn: &mut SqliteConnection, entry: &LedgerEntry) -> DbResult<()> {
    debug!(id = %entry.id, market = %entry.market, "Inserting ledger entry");

    sqlx::query(&format!(
        "INSERT INTO ledger_entries ({ENTRY_COLUMNS}) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
    ))
    .bind(&entry.id)
    .bind(entry.date)
    .bind(&entry.market)
    .bind(&entry.salesperson_id)
    .bind(entry.amount_paid.paisa())
    .bind(entry.commission.paisa())
    .bind(&entry.due_assigned_to)
    .bind(&entry.commission_assigned_to)
    .bind(entry.totals.gross_sale.paisa())
    .bind(entry.totals.total_damaged.paisa())
    .bind(entry.totals.total_sale.paisa())
    .bind(entry.totals.total_reward_value.paisa())
    .bind(entry.totals.amount_due.paisa())
    .bind(entry.created_at)
    .bind(entry.updated_at)
    .execute(&mut *conn)
    .await?;

    for (position, item) in entry.items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO ledger_items (
                id, ledger_id, position, product_id, product_name,
                unit, price_per_unit_paisa, summary_quantity, quantity_returned
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&entry.id)
        .bind(position as i64)
        .bind(&item.product_id)
        .bind(&item.product_name)
        .bind(item.unit)
        .bind(item.price_per_unit.paisa())
        .bind(item.summary_quantity)
        .bind(item.quantity_returned)
        .execute(&mut *conn)
        .await?;
    }

    for (position, item) in entry.damaged_items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO ledger_damaged_items (
                id, ledger_id, position, product_id, product_name,
                unit, price_per_unit_paisa, quantity
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&entry.id)
        .bind(position as i64)
        .bind(&item.product_id)
        .bind(&item.product_name)
        .bind(item.unit)
        .bind(item.price_per_unit.paisa())
        .bind(item.quantity)
        .execute(&mut *conn)
        .await?;
    }

    for (position, item) in entry.reward_items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO ledger_reward_items (
                id, ledger_id, position, reward_id, reward_name, main_product_id,
                unit, price_per_unit_paisa, purchase_price_override_paisa, quantity_sold
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&entry.id)
        .bind(position as i64)
        .bind(&item.reward_id)
        .bind(&item.reward_name)
        .bind(&item.main_product_id)
        .bind(&item.unit)
        .bind(item.price_per_unit.paisa())
        .bind(item.purchase_price_override.map(|m| m.paisa()))
        .bind(item.quantity_sold)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Deletes an entry; child line items cascade.
pub async fn delete_entry(conn: &mut SqliteConnection, id: &str) -> DbResult<()> {
    let result = sqlx::query("DELETE FROM ledger_entries WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Ledger entry", id));
    }

    Ok(())
}
