use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "currency_order_side", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CurrencyOrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "currency_order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CurrencyOrderStatus {
    Initiated,
    Open,
    Review,
    Reviewed,
    Paid,
    Completed,
    Settled,
    Expired,
    Rejected,
}

/// A one-sided fiat deposit/withdrawal request with its own approval lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CurrencyOrder {
    pub id: Uuid,
    pub owner: Uuid,
    pub merchant: Option<Uuid>,
    pub ticker: String,
    pub side: CurrencyOrderSide,
    pub status: CurrencyOrderStatus,
    pub created_at_nanos: i64,
    pub updated_at_nanos: i64,
    pub expired_time: i64,
    pub memo: Option<String>,
    pub client_id: String,
    #[sqlx(json)]
    pub payment_detail: Option<serde_json::Value>,
    #[sqlx(json)]
    pub pay_fund_detail: Option<serde_json::Value>,
    #[sqlx(json)]
    pub currency_quote: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCurrencyOrderRequest {
    pub owner: Uuid,
    pub ticker: String,
    pub side: CurrencyOrderSide,
    pub client_id: String,
    pub created_at: i64,
    pub payment_detail: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CurrencyOrderFilter {
    pub merchant: Option<Uuid>,
    pub owner_name: Option<String>,
    pub status: Vec<CurrencyOrderStatus>,
    pub side: Option<CurrencyOrderSide>,
    pub ticker: Option<String>,
    pub owner_id: Option<Uuid>,
    pub from_time: i64,
    pub to_time: i64,
    pub page_idx: i64,
    pub page_size: i64,
}
