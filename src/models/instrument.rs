use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tradeable asset leg referenced by an [`Instrument`]. Persisted as JSONB
/// (embedded in the quote/order row) rather than a relational composite type,
/// since it is only ever read/written whole alongside its parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyRef {
    pub id: Uuid,
    pub symbol: String,
    /// Number of decimal places of this asset's smallest unit.
    pub decimal: u32,
    pub currency_type: CurrencyType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "currency_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CurrencyType {
    Crypto,
    Fiat,
}

impl CurrencyRef {
    pub fn is_external(&self, external_symbols: &[String]) -> bool {
        self.currency_type == CurrencyType::Fiat
            && external_symbols.iter().any(|s| s.eq_ignore_ascii_case(&self.symbol))
    }
}

/// A base/quote trading pair, e.g. `BTC/USD`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    pub code: String,
    pub name: String,
    pub base: CurrencyRef,
    pub quote: CurrencyRef,
}
