use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::instrument::Instrument;
use super::quote::{OrderEvent, OrderSide};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "otc_order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OtcOrderStatus {
    Unpaid,
    Paid,
    Appeal,
    Cancelled,
    Resolved,
    Expired,
    Completed,
}

/// A bilateral trade created by a taker against one side of a [`Quote`](super::quote::Quote).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OtcOrder {
    pub id: Uuid,
    pub member_id: Uuid,
    pub quote_owner: Uuid,
    pub quote_id: Uuid,
    /// The taker's side — opposite of the quote's side.
    pub side: OrderSide,
    #[sqlx(json)]
    pub instrument: Instrument,
    pub price: Decimal,
    pub volume: String,
    pub value: String,
    pub fee: String,
    pub status: OtcOrderStatus,
    pub time: i64,
    pub expired_time: i64,
    pub chatroom_id: Option<String>,
    #[sqlx(json)]
    pub events: Vec<OrderEvent>,
    pub released_time: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct TakeQuoteRequest {
    pub quote_id: Uuid,
    pub member_id: Uuid,
    pub volume: String,
    pub value: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub member_id: Option<Uuid>,
    pub status: Vec<OtcOrderStatus>,
    pub side: Option<OrderSide>,
    pub base_currency: Option<String>,
    pub quote_currency: Option<String>,
    pub page_idx: i64,
    pub page_size: i64,
}
