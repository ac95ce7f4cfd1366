//! Currency order persistence. `owner_name` filtering is resolved to an
//! `owner_id` by the caller (via the Member service) before reaching this
//! layer — the database holds no member identity beyond the owner UUID.

use sqlx::{PgPool, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::models::{CurrencyOrder, CurrencyOrderFilter, CurrencyOrderSide, CurrencyOrderStatus};
use crate::utils::response::AppError;

#[derive(Clone)]
pub struct CurrencyOrderRepository {
    pool: PgPool,
}

impl CurrencyOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        owner: Uuid,
        merchant: Option<Uuid>,
        ticker: &str,
        side: CurrencyOrderSide,
        client_id: &str,
        created_at_nanos: i64,
        expired_time: i64,
        payment_detail: Option<serde_json::Value>,
    ) -> Result<CurrencyOrder, AppError> {
        let id = Uuid::new_v4();

        let order = sqlx::query_as::<_, CurrencyOrder>(
            r#"
            INSERT INTO currency_orders (
                id, owner, merchant, ticker, side, status, created_at_nanos,
                updated_at_nanos, expired_time, client_id, payment_detail
            )
            VALUES ($1, $2, $3, $4, $5, 'initiated', $6, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(merchant)
        .bind(ticker)
        .bind(side)
        .bind(created_at_nanos)
        .bind(expired_time)
        .bind(client_id)
        .bind(payment_detail)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn get(&self, id: Uuid) -> Result<CurrencyOrder, AppError> {
        sqlx::query_as::<_, CurrencyOrder>("SELECT * FROM currency_orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("currency order {id} not found")))
    }

    pub async fn search(&self, filter: &CurrencyOrderFilter) -> Result<Vec<CurrencyOrder>, AppError> {
        let mut qb = QueryBuilder::new("SELECT * FROM currency_orders WHERE 1 = 1");

        if let Some(merchant) = filter.merchant {
            qb.push(" AND merchant = ").push_bind(merchant);
        }
        if let Some(owner_id) = filter.owner_id {
            qb.push(" AND owner = ").push_bind(owner_id);
        }
        if !filter.status.is_empty() {
            qb.push(" AND status = ANY(").push_bind(filter.status.clone()).push(")");
        }
        if let Some(side) = filter.side {
            qb.push(" AND side = ").push_bind(side);
        }
        if let Some(ticker) = &filter.ticker {
            qb.push(" AND ticker = ").push_bind(ticker.clone());
        }
        if filter.from_time > 0 {
            qb.push(" AND created_at_nanos >= ").push_bind(filter.from_time);
        }
        if filter.to_time > 0 {
            qb.push(" AND created_at_nanos <= ").push_bind(filter.to_time);
        }

        qb.push(" ORDER BY created_at_nanos DESC");

        let page_size = filter.page_size.clamp(1, 200);
        let page_idx = filter.page_idx.max(0);
        qb.push(" LIMIT ").push_bind(page_size);
        qb.push(" OFFSET ").push_bind(page_idx * page_size);

        let rows = qb.build_query_as::<CurrencyOrder>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        status: Option<CurrencyOrderStatus>,
        memo: Option<&str>,
        pay_fund_detail: Option<serde_json::Value>,
        currency_quote: Option<serde_json::Value>,
        updated_at_nanos: i64,
    ) -> Result<CurrencyOrder, AppError> {
        let order = sqlx::query_as::<_, CurrencyOrder>(
            r#"
            UPDATE currency_orders SET
                status = COALESCE($2, status),
                memo = COALESCE($3, memo),
                pay_fund_detail = COALESCE($4, pay_fund_detail),
                currency_quote = COALESCE($5, currency_quote),
                updated_at_nanos = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(memo)
        .bind(pay_fund_detail)
        .bind(currency_quote)
        .bind(updated_at_nanos)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("currency order {id} not found")))?;

        Ok(order)
    }

    /// Bulk-expires INITIATED/OPEN orders whose `expired_time` has passed.
    /// Logs matched/modified counts, matching the Go repository's behavior.
    pub async fn expire_due(&self, now_nanos: i64) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE currency_orders SET
                status = 'expired',
                updated_at_nanos = $1,
                updated_at = now()
            WHERE expired_time <= $1 AND status IN ('initiated', 'open')
            "#,
        )
        .bind(now_nanos)
        .execute(&self.pool)
        .await?;

        info!(modified = result.rows_affected(), "expired due currency orders");
        Ok(result.rows_affected())
    }
}
