//! # Reward Catalog Repository
//!
//! Read side of the promotional-reward catalog: reward id to purchase-price
//! basis. Reward profit falls back to this basis when a line item has no
//! override of its own.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::DbResult;
use karobar_core::{Money, Reward, RewardCatalog};

#[derive(Debug, sqlx::FromRow)]
struct RewardRow {
    id: String,
    name: String,
    purchase_price_paisa: i64,
    created_at: DateTime<Utc>,
}

impl From<RewardRow> for Reward {
    fn from(row: RewardRow) -> Self {
        Reward {
            id: row.id,
            name: row.name,
            purchase_price: Money::from_paisa(row.purchase_price_paisa),
            created_at: row.created_at,
        }
    }
}

/// Repository for reward-catalog database operations.
#[derive(Debug, Clone)]
pub struct RewardRepository {
    pool: SqlitePool,
}

impl RewardRepository {
    /// Creates a new RewardRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RewardRepository { pool }
    }

    /// Inserts a catalog entry (setup / seeding).
    pub async fn insert(&self, reward: &Reward) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO rewards (id, name, purchase_price_paisa, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&reward.id)
        .bind(&reward.name)
        .bind(reward.purchase_price.paisa())
        .bind(reward.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a reward by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Reward>> {
        let row: Option<RewardRow> = sqlx::query_as(
            "SELECT id, name, purchase_price_paisa, created_at FROM rewards WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Reward::from))
    }

    /// Loads the whole catalog as an in-memory lookup map.
    pub async fn catalog(&self) -> DbResult<RewardCatalog> {
        let rows: Vec<RewardRow> =
            sqlx::query_as("SELECT id, name, purchase_price_paisa, created_at FROM rewards")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.id.clone(), Reward::from(row)))
            .collect())
    }
}
