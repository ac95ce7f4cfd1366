use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use super::instrument::Instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_side", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Ask,
    Bid,
}

impl OrderSide {
    /// The side a taker acts on when taking the opposite side of a quote.
    pub fn opposite(self) -> Self {
        match self {
            OrderSide::Ask => OrderSide::Bid,
            OrderSide::Bid => OrderSide::Ask,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Ask => write!(f, "ask"),
            OrderSide::Bid => write!(f, "bid"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "quote_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QuoteType {
    Regular,
    Wholesale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "quote_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    On,
    Off,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_event_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderEventType {
    CreateOrder,
    UpdateOrder,
    CancelOrder,
}

/// An append-only record of a quote/order mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    pub id: Uuid,
    pub event_type: OrderEventType,
    pub time: i64,
    pub price: Option<Decimal>,
    pub update_from_volume: Option<String>,
    pub update_to_volume: Option<String>,
    pub update_from_value: Option<String>,
    pub update_to_value: Option<String>,
}

impl OrderEvent {
    pub fn create(price: Option<Decimal>, from_volume: &str, to_volume: &str, from_value: &str, to_value: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: OrderEventType::CreateOrder,
            time: now_nanos(),
            price,
            update_from_volume: Some(from_volume.to_string()),
            update_to_volume: Some(to_volume.to_string()),
            update_from_value: Some(from_value.to_string()),
            update_to_value: Some(to_value.to_string()),
        }
    }

    pub fn update(price: Option<Decimal>, to_volume: Option<String>, to_value: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: OrderEventType::UpdateOrder,
            time: now_nanos(),
            price,
            update_from_volume: None,
            update_to_volume: to_volume,
            update_from_value: None,
            update_to_value: to_value,
        }
    }

    pub fn cancel() -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: OrderEventType::CancelOrder,
            time: now_nanos(),
            price: None,
            update_from_volume: None,
            update_to_volume: None,
            update_from_value: None,
            update_to_value: None,
        }
    }
}

pub fn now_nanos() -> i64 {
    Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_millis() * 1_000_000)
}

/// A merchant's standing offer to trade a base/quote instrument.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quote {
    pub id: Uuid,
    pub owner: Uuid,
    #[sqlx(json)]
    pub instrument: Instrument,
    pub side: OrderSide,
    pub quote_type: QuoteType,
    pub price: Decimal,
    pub volume: String,
    pub value: String,
    pub min_value: String,
    pub max_value: String,
    pub locked_fee: String,
    pub processed_volume: String,
    pub processing_volume: String,
    pub volume_to_fill: String,
    pub status: QuoteStatus,
    #[sqlx(json)]
    pub owner_otc_detail: Option<serde_json::Value>,
    #[sqlx(json)]
    pub accepted_payment_methods: Vec<String>,
    pub expire_by: i64,
    #[sqlx(json)]
    pub events: Vec<OrderEvent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuoteRequest {
    pub owner: Uuid,
    pub instrument: Instrument,
    pub side: OrderSide,
    pub quote_type: QuoteType,
    /// For REGULAR quotes, the fixed price; for WHOLESALE, omitted (derived from value/volume).
    pub price: Option<Decimal>,
    pub volume: String,
    pub value: Option<String>,
    pub accepted_payment_methods: Vec<String>,
    pub expire_by: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuoteFields {
    pub price: Option<Decimal>,
    pub volume: Option<String>,
    pub value: Option<String>,
    pub accepted_payment_methods: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteFilter {
    pub owner: Option<Uuid>,
    pub status: Option<QuoteStatus>,
    pub side: Option<OrderSide>,
    pub base_currency: Option<String>,
    pub quote_currency: Option<String>,
    pub page_idx: i64,
    pub page_size: i64,
}
