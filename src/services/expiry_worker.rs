//! Background sweep: fires every minute, expires due currency orders in
//! bulk, then re-drives each overdue OTC order through the order engine so
//! its balance-release side effects actually run.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::models::OtcOrderStatus;
use crate::services::currency_order_engine::CurrencyOrderEngine;
use crate::services::order_engine::OrderEngine;

pub struct ExpiryWorker {
    currency_orders: Arc<CurrencyOrderEngine>,
    orders: Arc<OrderEngine>,
    interval: Duration,
}

impl ExpiryWorker {
    pub fn new(currency_orders: Arc<CurrencyOrderEngine>, orders: Arc<OrderEngine>, interval_secs: u64) -> Self {
        Self { currency_orders, orders, interval: Duration::from_secs(interval_secs) }
    }

    /// Runs until `shutdown` fires, letting an in-flight tick finish before
    /// exiting the loop.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("expiry worker shutting down");
                        break;
                    }
                }
            }
        }
    }

    async fn tick(&self) {
        let now = crate::models::now_nanos();

        match self.currency_orders.expire_due(now).await {
            Ok(count) if count > 0 => info!(count, "expired due currency orders"),
            Ok(_) => {}
            Err(err) => warn!(%err, "currency order expiry sweep failed"),
        }

        let expired = match self.orders.list_expired_unpaid(now).await {
            Ok(orders) => orders,
            Err(err) => {
                warn!(%err, "failed to query otc orders for expiry sweep");
                return;
            }
        };

        for order in expired {
            if let Err(err) = self.orders.update_order(order.id, OtcOrderStatus::Expired).await {
                error!(order_id = %order.id, %err, "failed to expire overdue otc order");
            }
        }
    }
}
