//! Merchant margin persistence, unique on `(merchant, ticker, side)`.

use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::models::{MerchantMargin, MerchantMarginFilter, UpsertMerchantMarginRequest};
use crate::utils::response::AppError;

#[derive(Clone)]
pub struct MerchantMarginRepository {
    pool: PgPool,
}

impl MerchantMarginRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upserts the full document keyed by its own id, resolving that id from
    /// the `(merchant, ticker, side)` unique key first if the caller didn't
    /// supply one — mirroring the Go repository's two-step resolve-then-set.
    pub async fn upsert(&self, req: &UpsertMerchantMarginRequest) -> Result<MerchantMargin, AppError> {
        let id = match req.id {
            Some(id) => id,
            None => {
                let existing: Option<(Uuid,)> = sqlx::query_as(
                    "SELECT id FROM merchant_margins WHERE merchant = $1 AND ticker = $2 AND side = $3",
                )
                .bind(req.merchant)
                .bind(&req.ticker)
                .bind(req.side)
                .fetch_optional(&self.pool)
                .await?;

                existing.map(|(id,)| id).unwrap_or_else(Uuid::new_v4)
            }
        };

        let margin = sqlx::query_as::<_, MerchantMargin>(
            r#"
            INSERT INTO merchant_margins (id, merchant, ticker, side, name, margin)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (merchant, ticker, side) DO UPDATE SET
                name = EXCLUDED.name,
                margin = EXCLUDED.margin,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(req.merchant)
        .bind(&req.ticker)
        .bind(req.side)
        .bind(&req.name)
        .bind(req.margin)
        .fetch_one(&self.pool)
        .await?;

        Ok(margin)
    }

    pub async fn get(&self, id: Uuid) -> Result<MerchantMargin, AppError> {
        sqlx::query_as::<_, MerchantMargin>("SELECT * FROM merchant_margins WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("merchant margin {id} not found")))
    }

    pub async fn search(&self, filter: &MerchantMarginFilter) -> Result<Vec<MerchantMargin>, AppError> {
        let mut qb = QueryBuilder::new("SELECT * FROM merchant_margins WHERE 1 = 1");

        if let Some(merchant) = filter.merchant {
            qb.push(" AND merchant = ").push_bind(merchant);
        }
        if let Some(side) = filter.side {
            qb.push(" AND side = ").push_bind(side);
        }
        if let Some(ticker) = &filter.ticker {
            qb.push(" AND ticker = ").push_bind(ticker.clone());
        }
        if let Some(name) = &filter.name {
            qb.push(" AND name = ").push_bind(name.clone());
        }

        qb.push(" ORDER BY ticker, side");

        let rows = qb.build_query_as::<MerchantMargin>().fetch_all(&self.pool).await?;
        Ok(rows)
    }
}
