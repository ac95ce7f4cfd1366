//! SDCE reference quote persistence — one row per ticker, upserted whole.

use sqlx::PgPool;

use crate::models::{CreateSdceQuoteRequest, SdceQuote};
use crate::utils::response::AppError;

#[derive(Clone)]
pub struct SdceQuoteRepository {
    pool: PgPool,
}

impl SdceQuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, req: &CreateSdceQuoteRequest) -> Result<SdceQuote, AppError> {
        let unit_price_json = req
            .buy_unit_price
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| AppError::internal(e.to_string()))?;
        let sell_unit_price_json = req
            .sell_unit_price
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| AppError::internal(e.to_string()))?;

        let quote = sqlx::query_as::<_, SdceQuote>(
            r#"
            INSERT INTO sdce_quotes (ticker, unit_price, sell_unit_price)
            VALUES ($1, $2, $3)
            ON CONFLICT (ticker) DO UPDATE SET
                unit_price = COALESCE(EXCLUDED.unit_price, sdce_quotes.unit_price),
                sell_unit_price = COALESCE(EXCLUDED.sell_unit_price, sdce_quotes.sell_unit_price),
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(&req.ticker)
        .bind(unit_price_json)
        .bind(sell_unit_price_json)
        .fetch_one(&self.pool)
        .await?;

        Ok(quote)
    }

    pub async fn get(&self, ticker: &str) -> Result<SdceQuote, AppError> {
        sqlx::query_as::<_, SdceQuote>("SELECT * FROM sdce_quotes WHERE ticker = $1")
            .bind(ticker)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("sdce quote for {ticker} not found")))
    }

    pub async fn list(&self) -> Result<Vec<SdceQuote>, AppError> {
        let rows = sqlx::query_as::<_, SdceQuote>("SELECT * FROM sdce_quotes ORDER BY ticker")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

