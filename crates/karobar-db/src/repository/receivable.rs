//! # Receivable Repository
//!
//! Database operations for employee receivable transactions.
//!
//! Two kinds of rows live in the same table, told apart by `origin`:
//!
//! - **manual** rows entered in the receivables screen (dues handed over,
//!   payments collected). Never touched by the reconciliation engine.
//! - **ledger-derived** rows (`ledger_due` / `ledger_commission`), wholly
//!   owned by the lifecycle manager: deleted and recreated on every edit of
//!   their ledger entry. Partial unique indexes keep each entry at no more
//!   than one of each.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use karobar_core::{
    DerivedPosting, Money, ReceivableOrigin, ReceivableTransaction, ReceivableType,
};

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ReceivableRow {
    id: String,
    ledger_id: Option<String>,
    origin: ReceivableOrigin,
    employee_id: String,
    txn_date: NaiveDate,
    txn_type: ReceivableType,
    amount_paisa: i64,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ReceivableRow> for ReceivableTransaction {
    fn from(row: ReceivableRow) -> Self {
        ReceivableTransaction {
            id: row.id,
            ledger_id: row.ledger_id,
            origin: row.origin,
            employee_id: row.employee_id,
            date: row.txn_date,
            txn_type: row.txn_type,
            amount: Money::from_paisa(row.amount_paisa),
            note: row.note,
            created_at: row.created_at,
        }
    }
}

const COLUMNS: &str =
    "id, ledger_id, origin, employee_id, txn_date, txn_type, amount_paisa, note, created_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for receivable database operations.
#[derive(Debug, Clone)]
pub struct ReceivableRepository {
    pool: SqlitePool,
}

impl ReceivableRepository {
    /// Creates a new ReceivableRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReceivableRepository { pool }
    }

    /// Inserts a manually entered receivable (due handed over or payment
    /// collected).
    pub async fn insert_manual(&self, txn: &ReceivableTransaction) -> DbResult<()> {
        debug!(id = %txn.id, employee = %txn.employee_id, "Inserting manual receivable");

        sqlx::query(&format!(
            "INSERT INTO receivable_transactions ({COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ))
        .bind(&txn.id)
        .bind(&txn.ledger_id)
        .bind(txn.origin)
        .bind(&txn.employee_id)
        .bind(txn.date)
        .bind(txn.txn_type)
        .bind(txn.amount.paisa())
        .bind(&txn.note)
        .bind(txn.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All receivables for one employee, oldest first (statement order).
    pub async fn list_by_employee(&self, employee_id: &str) -> DbResult<Vec<ReceivableTransaction>> {
        let rows: Vec<ReceivableRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM receivable_transactions \
             WHERE employee_id = ?1 ORDER BY txn_date, created_at"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReceivableTransaction::from).collect())
    }

    /// The 0-2 derived postings currently attached to a ledger entry.
    pub async fn list_for_ledger(&self, ledger_id: &str) -> DbResult<Vec<ReceivableTransaction>> {
        let rows: Vec<ReceivableRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM receivable_transactions \
             WHERE ledger_id = ?1 AND origin != 'manual' ORDER BY origin"
        ))
        .bind(ledger_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReceivableTransaction::from).collect())
    }

    /// Running balance for one employee: dues add, payments subtract.
    ///
    /// Must agree with `karobar_core::employee_balance` folding the same
    /// rows.
    pub async fn employee_balance(&self, employee_id: &str) -> DbResult<Money> {
        let paisa: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT SUM(CASE txn_type WHEN 'due' THEN amount_paisa ELSE -amount_paisa END)
            FROM receivable_transactions
            WHERE employee_id = ?1
            "#,
        )
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_paisa(paisa.unwrap_or(0)))
    }
}

// =============================================================================
// Transaction-scope operations (used by the ledger lifecycle manager)
// =============================================================================

/// Removes every ledger-derived posting for an entry.
///
/// First half of the delete-then-recreate regeneration contract. Manual
/// rows that happen to reference the entry in their note are untouched.
pub async fn delete_ledger_postings(conn: &mut SqliteConnection, ledger_id: &str) -> DbResult<()> {
    sqlx::query(
        "DELETE FROM receivable_transactions WHERE ledger_id = ?1 AND origin != 'manual'",
    )
    .bind(ledger_id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Materializes one derived posting as a due-type receivable row.
pub async fn insert_posting(
    conn: &mut SqliteConnection,
    ledger_id: &str,
    posting: &DerivedPosting,
    now: DateTime<Utc>,
) -> DbResult<()> {
    debug!(
        ledger_id = %ledger_id,
        employee = %posting.employee_id,
        amount = %posting.amount,
        "Inserting derived receivable posting"
    );

    sqlx::query(&format!(
        "INSERT INTO receivable_transactions ({COLUMNS}) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(ledger_id)
    .bind(posting.origin)
    .bind(&posting.employee_id)
    .bind(posting.date)
    .bind(ReceivableType::Due)
    .bind(posting.amount.paisa())
    .bind(Option::<String>::None)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(())
}
