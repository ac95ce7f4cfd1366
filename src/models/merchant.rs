use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered OTC merchant, unique on `name` and `client_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Merchant {
    pub id: Uuid,
    pub name: String,
    pub client_id: String,
    pub admin_client_id: Option<String>,
    pub contact_person: Option<Uuid>,
    /// Seconds a currency order stays live before expiring; `-1` means
    /// effectively never (resolved to a year-2199 sentinel).
    pub order_live_time: i64,
    #[sqlx(json)]
    pub info: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// [`Merchant`] with `info` stripped, returned by list/search endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct MerchantSummary {
    pub id: Uuid,
    pub name: String,
    pub client_id: String,
    pub admin_client_id: Option<String>,
    pub contact_person: Option<Uuid>,
    pub order_live_time: i64,
}

impl From<Merchant> for MerchantSummary {
    fn from(m: Merchant) -> Self {
        Self {
            id: m.id,
            name: m.name,
            client_id: m.client_id,
            admin_client_id: m.admin_client_id,
            contact_person: m.contact_person,
            order_live_time: m.order_live_time,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateMerchantRequest {
    pub name: String,
    pub client_id: String,
    pub admin_client_id: Option<String>,
    pub contact_person: Option<Uuid>,
    pub order_live_time: i64,
    pub info: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMerchantFields {
    pub admin_client_id: Option<String>,
    pub contact_person: Option<Uuid>,
    pub order_live_time: Option<i64>,
    pub info: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MerchantFilter {
    pub contact_person: Option<Uuid>,
    pub client_id: Option<String>,
    pub name: Option<String>,
    pub admin_client_id: Option<String>,
}
