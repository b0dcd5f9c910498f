//! # Ledger Lifecycle Manager
//!
//! Orchestrates every create, edit and delete of a ledger entry.
//!
//! ## One transaction per user action
//! ```text
//! begin transaction
//!   1. validate the draft (failure = rollback, nothing persisted)
//!   2. load the referenced products (old + new references)
//!   3. revert stock deltas implied by the OLD entry   (edit/delete)
//!   4. commit stock deltas implied by the NEW draft   (create/edit)
//!   5. replace the entry rows with the new aggregate
//!   6. delete + recreate the entry's derived receivable postings
//! commit
//! ```
//!
//! The historical implementation performed these writes back-to-back with
//! no commit boundary, so a crash between the stock write and the ledger
//! write left the stock counter permanently out of sync. Wrapping the whole
//! sequence in one SQLite transaction closes that gap; it is *not* a
//! concurrency mechanism (a single active writer is still assumed).
//!
//! Deletion is the "no new draft" special case and is exactly symmetric
//! with editing the entry down to nothing: both revert the old deltas and
//! leave no postings behind.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{ledger, product, receivable};
use karobar_core::{
    derived_postings, finance, stock_deltas, validation, DamagedLineItem, DeltaDirection,
    LedgerDraft, LedgerEntry, LedgerLineItem, Money, StockDelta,
};

/// Service coordinating stock, ledger and receivable writes.
#[derive(Debug, Clone)]
pub struct LedgerService {
    pool: SqlitePool,
}

impl LedgerService {
    /// Creates a new LedgerService.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerService { pool }
    }

    /// Creates a new ledger entry.
    ///
    /// Derives totals, subtracts the implied stock, persists the entry and
    /// its 0-2 receivable postings, all atomically.
    pub async fn create_entry(&self, draft: LedgerDraft) -> DbResult<LedgerEntry> {
        validation::validate_entry(&draft)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let now = Utc::now();
        let catalog =
            product::fetch_catalog(&mut tx, &referenced_products(&draft.items, &draft.damaged_items))
                .await?;

        let deltas = stock_deltas(
            &draft.items,
            &draft.damaged_items,
            DeltaDirection::Commit,
            &catalog,
        );
        apply_to_stock(&mut tx, &deltas, now).await?;

        let totals = finance::derive_totals(&draft);
        let entry = LedgerEntry {
            id: Uuid::new_v4().to_string(),
            date: draft.date,
            market: draft.market.clone(),
            salesperson_id: draft.salesperson_id.clone(),
            items: draft.items.clone(),
            damaged_items: draft.damaged_items.clone(),
            reward_items: draft.reward_items.clone(),
            amount_paid: draft.amount_paid,
            due_assigned_to: draft.due_assigned_to.clone(),
            commission: draft.commission,
            commission_assigned_to: draft.commission_assigned_to.clone(),
            totals,
            created_at: now,
            updated_at: now,
        };

        ledger::insert_entry(&mut tx, &entry).await?;

        for posting in derived_postings(&draft, &totals) {
            receivable::insert_posting(&mut tx, &entry.id, &posting, now).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            id = %entry.id,
            market = %entry.market,
            total_sale = %totals.total_sale,
            amount_due = %totals.amount_due,
            "Ledger entry created"
        );

        Ok(entry)
    }

    /// Replaces an existing ledger entry with a new draft.
    ///
    /// The OLD entry's deltas are captured from the stored rows *before*
    /// any mutation of this transition, reverted, and the NEW draft's
    /// deltas committed against the same catalog snapshot. Receivable
    /// postings are regenerated from scratch; running the same edit twice
    /// therefore leaves an identical posting set.
    pub async fn update_entry(&self, id: &str, draft: LedgerDraft) -> DbResult<LedgerEntry> {
        validation::validate_entry(&draft)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let old = ledger::fetch_entry(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Ledger entry", id))?;

        let now = Utc::now();

        let mut ids = referenced_products(&old.items, &old.damaged_items);
        ids.extend(referenced_products(&draft.items, &draft.damaged_items));
        let catalog = product::fetch_catalog(&mut tx, &ids).await?;

        let mut deltas = stock_deltas(
            &old.items,
            &old.damaged_items,
            DeltaDirection::Revert,
            &catalog,
        );
        deltas.extend(stock_deltas(
            &draft.items,
            &draft.damaged_items,
            DeltaDirection::Commit,
            &catalog,
        ));
        apply_to_stock(&mut tx, &deltas, now).await?;

        receivable::delete_ledger_postings(&mut tx, id).await?;
        ledger::delete_entry(&mut tx, id).await?;

        let totals = finance::derive_totals(&draft);
        let entry = LedgerEntry {
            id: old.id.clone(),
            date: draft.date,
            market: draft.market.clone(),
            salesperson_id: draft.salesperson_id.clone(),
            items: draft.items.clone(),
            damaged_items: draft.damaged_items.clone(),
            reward_items: draft.reward_items.clone(),
            amount_paid: draft.amount_paid,
            due_assigned_to: draft.due_assigned_to.clone(),
            commission: draft.commission,
            commission_assigned_to: draft.commission_assigned_to.clone(),
            totals,
            created_at: old.created_at,
            updated_at: now,
        };

        ledger::insert_entry(&mut tx, &entry).await?;

        for posting in derived_postings(&draft, &totals) {
            receivable::insert_posting(&mut tx, &entry.id, &posting, now).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            id = %entry.id,
            total_sale = %totals.total_sale,
            amount_due = %totals.amount_due,
            "Ledger entry updated"
        );

        Ok(entry)
    }

    /// Deletes a ledger entry, adding its stock back and removing its
    /// derived postings.
    pub async fn delete_entry(&self, id: &str) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let old = ledger::fetch_entry(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Ledger entry", id))?;

        let now = Utc::now();
        let catalog =
            product::fetch_catalog(&mut tx, &referenced_products(&old.items, &old.damaged_items))
                .await?;

        let deltas = stock_deltas(
            &old.items,
            &old.damaged_items,
            DeltaDirection::Revert,
            &catalog,
        );
        apply_to_stock(&mut tx, &deltas, now).await?;

        receivable::delete_ledger_postings(&mut tx, id).await?;
        ledger::delete_entry(&mut tx, id).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %id, "Ledger entry deleted");

        Ok(())
    }

    /// Total profit of one entry (sold lines + rewards), for reports.
    ///
    /// Lines whose product or reward has since been deleted contribute
    /// zero.
    pub async fn entry_profit(&self, id: &str) -> DbResult<Money> {
        let mut conn = self.pool.acquire().await?;

        let entry = ledger::fetch_entry(&mut conn, id)
            .await?
            .ok_or_else(|| DbError::not_found("Ledger entry", id))?;

        let catalog =
            product::fetch_catalog(&mut conn, &referenced_products(&entry.items, &entry.damaged_items))
                .await?;
        drop(conn);

        let rewards = crate::repository::reward::RewardRepository::new(self.pool.clone())
            .catalog()
            .await?;

        Ok(finance::entry_profit(&entry.to_draft(), &catalog, &rewards))
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Product ids referenced by an entry's stock-moving lines (sold and
/// damaged; rewards never touch stock).
fn referenced_products(items: &[LedgerLineItem], damaged: &[DamagedLineItem]) -> Vec<String> {
    let mut ids: Vec<String> = items
        .iter()
        .map(|i| i.product_id.clone())
        .chain(damaged.iter().map(|d| d.product_id.clone()))
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

async fn apply_to_stock(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    deltas: &[StockDelta],
    now: chrono::DateTime<Utc>,
) -> DbResult<()> {
    for delta in deltas {
        debug!(product_id = %delta.product_id, change = %delta.change, "Applying stock delta");
        product::adjust_stock(tx, &delta.product_id, delta.change, now).await?;
    }
    Ok(())
}

// =============================================================================
// Integration Tests
// =============================================================================
