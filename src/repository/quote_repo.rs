//! Quote persistence. Search builds its filter dynamically the way the
//! original Mongo repository did, translated to a parameterized SQL builder.

use rust_decimal::Decimal;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::models::{OrderEvent, OrderSide, Quote, QuoteFilter, QuoteStatus};
use crate::utils::response::AppError;

/// The `action` dimension of the residual volume/value/fee bookkeeping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookkeepingAction {
    Create,
    Cancel,
    Expire,
    Complete,
}

#[derive(Clone)]
pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        owner: Uuid,
        instrument: &crate::models::Instrument,
        side: OrderSide,
        quote_type: crate::models::QuoteType,
        price: Decimal,
        volume: &str,
        value: &str,
        min_value: &str,
        max_value: &str,
        locked_fee: &str,
        volume_to_fill: &str,
        accepted_payment_methods: &[String],
        expire_by: i64,
        owner_otc_detail: Option<serde_json::Value>,
        event: OrderEvent,
    ) -> Result<Quote, AppError> {
        let id = Uuid::new_v4();
        let instrument_json = serde_json::to_value(instrument).map_err(|e| AppError::internal(e.to_string()))?;
        let methods_json = serde_json::to_value(accepted_payment_methods).map_err(|e| AppError::internal(e.to_string()))?;
        let events_json = serde_json::to_value([event]).map_err(|e| AppError::internal(e.to_string()))?;

        let quote = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes (
                id, owner, instrument, side, quote_type, price, volume, value,
                min_value, max_value, locked_fee, processed_volume, processing_volume,
                volume_to_fill, status, owner_otc_detail, accepted_payment_methods, expire_by, events
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, '0', '0', $12, 'on', $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(instrument_json)
        .bind(side)
        .bind(quote_type)
        .bind(price)
        .bind(volume)
        .bind(value)
        .bind(min_value)
        .bind(max_value)
        .bind(locked_fee)
        .bind(volume_to_fill)
        .bind(owner_otc_detail)
        .bind(methods_json)
        .bind(expire_by)
        .bind(events_json)
        .fetch_one(&self.pool)
        .await?;

        Ok(quote)
    }

    pub async fn get(&self, id: Uuid) -> Result<Quote, AppError> {
        sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("quote {id} not found")))
    }

    pub async fn search(&self, filter: &QuoteFilter) -> Result<Vec<Quote>, AppError> {
        let mut qb = QueryBuilder::new("SELECT * FROM quotes WHERE 1 = 1");

        if let Some(owner) = filter.owner {
            qb.push(" AND owner = ").push_bind(owner);
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(side) = filter.side {
            qb.push(" AND side = ").push_bind(side);
        }
        if let Some(base) = &filter.base_currency {
            qb.push(" AND instrument -> 'base' ->> 'symbol' = ").push_bind(base.clone());
        }
        if let Some(quote) = &filter.quote_currency {
            qb.push(" AND instrument -> 'quote' ->> 'symbol' = ").push_bind(quote.clone());
        }

        qb.push(" ORDER BY created_at DESC");

        let page_size = filter.page_size.clamp(1, 200);
        let page_idx = filter.page_idx.max(0);
        qb.push(" LIMIT ").push_bind(page_size);
        qb.push(" OFFSET ").push_bind(page_idx * page_size);

        let rows = qb.build_query_as::<Quote>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Updates mutable fields and appends an event in one write, mirroring
    /// how the Go repository treated each quote update as append-only.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_terms(
        &self,
        id: Uuid,
        price: Option<Decimal>,
        volume: Option<&str>,
        value: Option<&str>,
        accepted_payment_methods: Option<&[String]>,
        event: OrderEvent,
    ) -> Result<Quote, AppError> {
        let event_json = serde_json::to_value(event).map_err(|e| AppError::internal(e.to_string()))?;
        let methods_json = match accepted_payment_methods {
            Some(m) => Some(serde_json::to_value(m).map_err(|e| AppError::internal(e.to_string()))?),
            None => None,
        };

        let quote = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes SET
                price = COALESCE($2, price),
                volume = COALESCE($3, volume),
                value = COALESCE($4, value),
                accepted_payment_methods = COALESCE($5, accepted_payment_methods),
                events = events || jsonb_build_array($6::jsonb),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(price)
        .bind(volume)
        .bind(value)
        .bind(methods_json)
        .bind(event_json)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("quote {id} not found")))?;

        Ok(quote)
    }

    /// Applies the residual volume/value/fee bookkeeping table for one order
    /// transition. `order_volume`/`order_value`/`order_fee` are the order's
    /// own amounts (not deltas against something else); signs are baked into
    /// the per-action SQL to match the CREATE/CANCEL/EXPIRE/COMPLETE table.
    pub async fn apply_bookkeeping(
        &self,
        id: Uuid,
        action: BookkeepingAction,
        order_volume: &str,
        order_value: &str,
        order_fee: &str,
        event: Option<OrderEvent>,
    ) -> Result<Quote, AppError> {
        let event_json = event
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| AppError::internal(e.to_string()))?;

        // lockedFee only exists on ASK quotes (§4.2); a BID quote's
        // locked_fee stays at its "0" starting value regardless of the
        // order's own fee, so the delta is gated on side here rather than
        // trusted to always be zero at the call site.
        let query = match action {
            BookkeepingAction::Create => {
                r#"
                UPDATE quotes SET
                    volume = (volume::numeric - $2::numeric)::text,
                    value = (value::numeric - $3::numeric)::text,
                    processing_volume = (processing_volume::numeric + $2::numeric)::text,
                    locked_fee = CASE WHEN side = 'ask' THEN (locked_fee::numeric - $4::numeric)::text ELSE locked_fee END,
                    events = CASE WHEN $5::jsonb IS NULL THEN events ELSE events || jsonb_build_array($5::jsonb) END,
                    updated_at = now()
                WHERE id = $1
                RETURNING *
                "#
            }
            BookkeepingAction::Cancel | BookkeepingAction::Expire => {
                r#"
                UPDATE quotes SET
                    volume = (volume::numeric + $2::numeric)::text,
                    value = (value::numeric + $3::numeric)::text,
                    processing_volume = (processing_volume::numeric - $2::numeric)::text,
                    locked_fee = CASE WHEN side = 'ask' THEN (locked_fee::numeric + $4::numeric)::text ELSE locked_fee END,
                    events = CASE WHEN $5::jsonb IS NULL THEN events ELSE events || jsonb_build_array($5::jsonb) END,
                    updated_at = now()
                WHERE id = $1
                RETURNING *
                "#
            }
            BookkeepingAction::Complete => {
                r#"
                UPDATE quotes SET
                    processing_volume = (processing_volume::numeric - $2::numeric)::text,
                    status = CASE WHEN (volume::numeric) = 0 THEN 'off'::quote_status ELSE status END,
                    events = CASE WHEN $5::jsonb IS NULL THEN events ELSE events || jsonb_build_array($5::jsonb) END,
                    updated_at = now()
                WHERE id = $1
                RETURNING *
                "#
            }
        };

        let quote = sqlx::query_as::<_, Quote>(query)
            .bind(id)
            .bind(order_volume)
            .bind(order_value)
            .bind(order_fee)
            .bind(event_json)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("quote {id} not found")))?;

        Ok(quote)
    }

    pub async fn update_status(&self, id: Uuid, status: QuoteStatus, event: OrderEvent) -> Result<Quote, AppError> {
        let event_json = serde_json::to_value(event).map_err(|e| AppError::internal(e.to_string()))?;

        let quote = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes SET
                status = $2,
                events = events || jsonb_build_array($3::jsonb),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(event_json)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("quote {id} not found")))?;

        Ok(quote)
    }
}
