use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::quote::OrderSide;

/// A per-merchant, per-ticker, per-side margin rate, unique on
/// `(merchant, ticker, side)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MerchantMargin {
    pub id: Uuid,
    pub merchant: Uuid,
    pub ticker: String,
    pub side: OrderSide,
    pub name: String,
    pub margin: rust_decimal::Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertMerchantMarginRequest {
    pub id: Option<Uuid>,
    pub merchant: Uuid,
    pub ticker: String,
    pub side: OrderSide,
    pub name: String,
    pub margin: rust_decimal::Decimal,
}

#[derive(Debug, Default, Deserialize)]
pub struct MerchantMarginFilter {
    pub merchant: Option<Uuid>,
    pub side: Option<OrderSide>,
    pub ticker: Option<String>,
    pub name: Option<String>,
}
