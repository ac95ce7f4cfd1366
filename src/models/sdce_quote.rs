use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitPrice {
    pub price: Decimal,
    pub currency: Option<String>,
    pub updated_at: i64,
}

/// A single-row-per-ticker upsertable reference buy/sell price, sourced from
/// the SDCE reference feed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SdceQuote {
    pub ticker: String,
    #[sqlx(json)]
    pub unit_price: Option<UnitPrice>,
    #[sqlx(json)]
    pub sell_unit_price: Option<UnitPrice>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSdceQuoteRequest {
    pub ticker: String,
    pub buy_unit_price: Option<UnitPrice>,
    pub sell_unit_price: Option<UnitPrice>,
}
