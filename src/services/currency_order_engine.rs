//! One-sided fiat currency-order state machine, and the merchant-policy
//! lookup that derives a fresh order's `expired_time`.

use uuid::Uuid;

use crate::models::{
    CreateCurrencyOrderRequest, CurrencyOrder, CurrencyOrderFilter, CurrencyOrderStatus, MerchantFilter,
};
use crate::repository::{CurrencyOrderRepository, MerchantRepository};
use crate::services::state_machine::TransitionTable;
use crate::utils::response::{AppError, ErrorKind};

/// `order_live_time == -1` resolves to this far-future sentinel instead of
/// an unbounded expiry, so the expiry sweep's comparison always has a value
/// to compare against.
fn year_2199_nanos() -> i64 {
    // 2199-01-01T00:00:00Z, precomputed so this function stays free of the
    // forbidden wall-clock primitives.
    7_258_118_400_000_000_000
}

const DEFAULT_LIVE_TIME_SECS: i64 = 1800;

pub struct CurrencyOrderEngine {
    repo: CurrencyOrderRepository,
    merchants: MerchantRepository,
    transitions: TransitionTable<CurrencyOrderStatus>,
}

impl CurrencyOrderEngine {
    pub fn new(repo: CurrencyOrderRepository, merchants: MerchantRepository) -> Self {
        use CurrencyOrderStatus::*;

        // REJECTED has no incoming edge in the documented table; see
        // DESIGN.md for why a merchant-initiated reject from any
        // non-terminal review state is wired in here rather than left
        // unreachable.
        let edges = [
            (Initiated, Open),
            (Initiated, Paid),
            (Open, Review),
            (Open, Paid),
            (Review, Reviewed),
            (Review, Paid),
            (Reviewed, Paid),
            (Paid, Completed),
            (Completed, Settled),
            (Initiated, Rejected),
            (Open, Rejected),
            (Review, Rejected),
            (Reviewed, Rejected),
        ];

        Self { repo, merchants, transitions: TransitionTable::new(&edges) }
    }

    pub async fn create_order(&self, req: CreateCurrencyOrderRequest) -> Result<CurrencyOrder, AppError> {
        let matches = self
            .merchants
            .search(&MerchantFilter { client_id: Some(req.client_id.clone()), ..Default::default() })
            .await?;

        let (merchant_id, expired_time) = match matches.as_slice() {
            [merchant] => {
                let expired_time = match merchant.order_live_time {
                    -1 => year_2199_nanos(),
                    0 => {
                        return Err(AppError::internal(format!(
                            "merchant {} has order_live_time misconfigured to 0",
                            merchant.id
                        )))
                    }
                    secs => req.created_at + secs.saturating_mul(1_000_000_000),
                };
                (Some(merchant.id), expired_time)
            }
            _ => (None, req.created_at + DEFAULT_LIVE_TIME_SECS * 1_000_000_000),
        };

        self.repo
            .create(
                req.owner,
                merchant_id,
                &req.ticker,
                req.side,
                &req.client_id,
                req.created_at,
                expired_time,
                req.payment_detail,
            )
            .await
    }

    pub async fn get_order(&self, id: Uuid) -> Result<CurrencyOrder, AppError> {
        self.repo.get(id).await
    }

    pub async fn list_orders(&self, filter: CurrencyOrderFilter) -> Result<Vec<CurrencyOrder>, AppError> {
        self.repo.search(&filter).await
    }

    pub async fn update_order(
        &self,
        id: Uuid,
        target: CurrencyOrderStatus,
        memo: Option<String>,
        pay_fund_detail: Option<serde_json::Value>,
        currency_quote: Option<serde_json::Value>,
        now_nanos: i64,
    ) -> Result<CurrencyOrder, AppError> {
        let order = self.repo.get(id).await?;
        if !self.transitions.allows(order.status, target) {
            return Err(AppError::new(
                ErrorKind::PermissionDenied,
                format!("{:?} -> {target:?} is not an allowed transition", order.status),
            ));
        }

        let memo = if order.status == CurrencyOrderStatus::Initiated && target == CurrencyOrderStatus::Open {
            Some(memo.unwrap_or_else(|| format!("otc-{now_nanos}")))
        } else {
            memo
        };

        self.repo
            .update(id, Some(target), memo.as_deref(), pay_fund_detail, currency_quote, now_nanos)
            .await
    }

    /// Called by the expiry worker on its tick; mirrors `QuoteRepository`'s
    /// bulk write path rather than driving each order through `update_order`,
    /// since an INITIATED/OPEN currency order has no escrowed balance to
    /// release on expiry.
    pub async fn expire_due(&self, now_nanos: i64) -> Result<u64, AppError> {
        self.repo.expire_due(now_nanos).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_rejects_completed_to_paid() {
        let table = TransitionTable::new(&[
            (CurrencyOrderStatus::Initiated, CurrencyOrderStatus::Open),
            (CurrencyOrderStatus::Paid, CurrencyOrderStatus::Completed),
            (CurrencyOrderStatus::Completed, CurrencyOrderStatus::Settled),
        ]);

        assert!(table.allows(CurrencyOrderStatus::Paid, CurrencyOrderStatus::Completed));
        assert!(!table.allows(CurrencyOrderStatus::Completed, CurrencyOrderStatus::Paid));
        assert!(!table.allows(CurrencyOrderStatus::Settled, CurrencyOrderStatus::Paid));
    }
}
