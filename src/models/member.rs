use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result code returned by the Member service's `DoLockBalance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockBalanceResult {
    LockSuccessful,
    LockInsufficientBalance,
    LockInvalidSource,
    LockAccountNotFound,
    LockUnsuccessfulRollBack,
    InvalidLockMoneyResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivitySource {
    Order,
}

/// An account the Member service holds for one member/currency pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDefined {
    pub id: Uuid,
    pub member_id: Uuid,
    pub currency_id: Uuid,
}

/// Member-level metadata relevant to OTC trading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDefined {
    pub id: Uuid,
    pub otc_fee_rate: Option<rust_decimal::Decimal>,
    pub otc_details: Option<serde_json::Value>,
}
