//! OTC order persistence. Status transitions are validated by
//! [`crate::services::order_engine`] before reaching this layer; the
//! repository itself just writes, matching the status and time fields.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::models::{OrderEvent, OrderFilter, OrderSide, OtcOrder, OtcOrderStatus};
use crate::utils::response::AppError;

#[derive(Clone)]
pub struct OtcOrderRepository {
    pool: PgPool,
}

impl OtcOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        member_id: Uuid,
        quote_owner: Uuid,
        quote_id: Uuid,
        side: OrderSide,
        instrument: &crate::models::Instrument,
        price: Decimal,
        volume: &str,
        value: &str,
        fee: &str,
        expired_time: i64,
    ) -> Result<OtcOrder, AppError> {
        let id = Uuid::new_v4();
        let instrument_json = serde_json::to_value(instrument).map_err(|e| AppError::internal(e.to_string()))?;
        let event = OrderEvent::create(Some(price), "0", volume, "0", value);
        let events_json = serde_json::to_value([event]).map_err(|e| AppError::internal(e.to_string()))?;

        let order = sqlx::query_as::<_, OtcOrder>(
            r#"
            INSERT INTO otc_orders (
                id, member_id, quote_owner, quote_id, side, instrument, price,
                volume, value, fee, status, time, expired_time, events
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'unpaid', $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(member_id)
        .bind(quote_owner)
        .bind(quote_id)
        .bind(side)
        .bind(instrument_json)
        .bind(price)
        .bind(volume)
        .bind(value)
        .bind(fee)
        .bind(Utc::now().timestamp_nanos_opt().unwrap_or_default())
        .bind(expired_time)
        .bind(events_json)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn get(&self, id: Uuid) -> Result<OtcOrder, AppError> {
        sqlx::query_as::<_, OtcOrder>("SELECT * FROM otc_orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("otc order {id} not found")))
    }

    /// Mirrors the Go repository's `$or` on member/quote-owner: either party
    /// to the trade can see it.
    pub async fn search(&self, filter: &OrderFilter) -> Result<Vec<OtcOrder>, AppError> {
        let mut qb = QueryBuilder::new("SELECT * FROM otc_orders WHERE 1 = 1");

        if let Some(member_id) = filter.member_id {
            qb.push(" AND (member_id = ").push_bind(member_id).push(" OR quote_owner = ").push_bind(member_id).push(")");
        }
        if !filter.status.is_empty() {
            qb.push(" AND status = ANY(").push_bind(filter.status.clone()).push(")");
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

        qb.push(" ORDER BY time DESC");

        let page_size = filter.page_size.clamp(1, 200);
        let page_idx = filter.page_idx.max(0);
        qb.push(" LIMIT ").push_bind(page_size);
        qb.push(" OFFSET ").push_bind(page_idx * page_size);

        let rows = qb.build_query_as::<OtcOrder>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Finds UNPAID orders whose `expired_time` has passed, for the expiry
    /// worker to re-drive through [`crate::services::order_engine::update_order`].
    pub async fn search_expired(&self, now_nanos: i64) -> Result<Vec<OtcOrder>, AppError> {
        let rows = sqlx::query_as::<_, OtcOrder>(
            "SELECT * FROM otc_orders WHERE status = 'unpaid' AND expired_time <= $1",
        )
        .bind(now_nanos)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update_status(&self, id: Uuid, status: OtcOrderStatus, event: OrderEvent) -> Result<OtcOrder, AppError> {
        let event_json = serde_json::to_value(event).map_err(|e| AppError::internal(e.to_string()))?;
        let released_time = (status == OtcOrderStatus::Completed)
            .then(|| Utc::now().timestamp_nanos_opt().unwrap_or_default());

        let order = sqlx::query_as::<_, OtcOrder>(
            r#"
            UPDATE otc_orders SET
                status = $2,
                events = events || jsonb_build_array($3::jsonb),
                released_time = COALESCE($4, released_time),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(event_json)
        .bind(released_time)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("otc order {id} not found")))?;

        Ok(order)
    }

    pub async fn update_chatroom_id(&self, id: Uuid, chatroom_id: &str) -> Result<OtcOrder, AppError> {
        let order = sqlx::query_as::<_, OtcOrder>(
            "UPDATE otc_orders SET chatroom_id = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(chatroom_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("otc order {id} not found")))?;

        Ok(order)
    }
}
