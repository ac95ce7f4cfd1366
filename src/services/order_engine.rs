//! OTC order state machine: taking a quote, and the bilateral balance/pending
//! coordination at every subsequent status transition.
//!
//! The allowed edges are a [`TransitionTable`] built once from the static
//! list in the spec rather than a chain of `if`/`match` arms at each call
//! site; [`OrderEngine::update_order`] looks up the edge and dispatches to
//! the one private method that knows that transition's side effects.

use std::sync::Arc;

use num_bigint::BigInt;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::bigmath;
use crate::config::AppConfig;
use crate::models::{
    AccountDefined, OrderEvent, OrderFilter, OrderSide, OtcOrder, OtcOrderStatus, Quote,
    QuoteStatus, TakeQuoteRequest,
};
use crate::repository::quote_repo::BookkeepingAction;
use crate::repository::OtcOrderRepository;
use crate::services::account_client::AccountClient;
use crate::services::quote_engine::QuoteEngine;
use crate::services::state_machine::TransitionTable;
use crate::utils::response::{AppError, ErrorKind};

pub struct OrderEngine {
    repo: OtcOrderRepository,
    quote_engine: Arc<QuoteEngine>,
    account_client: Arc<AccountClient>,
    config: AppConfig,
    transitions: TransitionTable<OtcOrderStatus>,
}

impl OrderEngine {
    pub fn new(
        repo: OtcOrderRepository,
        quote_engine: Arc<QuoteEngine>,
        account_client: Arc<AccountClient>,
        config: AppConfig,
    ) -> Self {
        use OtcOrderStatus::*;

        let mut edges = vec![
            (Unpaid, Paid),
            (Unpaid, Cancelled),
            (Unpaid, Appeal),
            (Unpaid, Expired),
            (Paid, Completed),
            (Paid, Unpaid),
            (Paid, Appeal),
            (Paid, Cancelled),
            (Appeal, Resolved),
            (Appeal, Cancelled),
        ];
        // Open Question (see DESIGN.md): the source's table additionally
        // allows COMPLETED -> APPEAL/CANCELLED. Gated behind config since
        // whether post-completion appeal is a real product feature is
        // unconfirmed; the self-loop COMPLETED -> COMPLETED is dropped even
        // when the flag is set, since nothing in the spec explains it.
        if config.allow_post_completion_appeal {
            edges.push((Completed, Appeal));
            edges.push((Completed, Cancelled));
        }

        Self {
            repo,
            quote_engine,
            account_client,
            config,
            transitions: TransitionTable::new(&edges),
        }
    }

    pub async fn get_order(&self, id: Uuid) -> Result<OtcOrder, AppError> {
        self.repo.get(id).await
    }

    pub async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<OtcOrder>, AppError> {
        self.repo.search(&filter).await
    }

    /// Unpaid orders whose `expired_time` has passed, for the expiry worker.
    pub async fn list_expired_unpaid(&self, now_nanos: i64) -> Result<Vec<OtcOrder>, AppError> {
        self.repo.search_expired(now_nanos).await
    }

    pub async fn update_room_id(&self, id: Uuid, chatroom_id: &str) -> Result<OtcOrder, AppError> {
        self.repo.update_chatroom_id(id, chatroom_id).await
    }

    /// Taker BIDs an ASK quote (taker buys the base asset).
    pub async fn buy_quote(&self, req: TakeQuoteRequest) -> Result<OtcOrder, AppError> {
        self.take_quote(req, OrderSide::Ask).await
    }

    /// Taker ASKs a BID quote (taker sells the base asset).
    pub async fn sell_quote(&self, req: TakeQuoteRequest) -> Result<OtcOrder, AppError> {
        self.take_quote(req, OrderSide::Bid).await
    }

    async fn take_quote(&self, req: TakeQuoteRequest, expected_quote_side: OrderSide) -> Result<OtcOrder, AppError> {
        let quote = self.quote_engine.repo().get(req.quote_id).await?;
        if quote.side != expected_quote_side {
            return Err(AppError::invalid_argument("quote side does not match the requested take direction"));
        }
        if quote.status != QuoteStatus::On {
            return Err(AppError::new(ErrorKind::FailedPrecondition, "quote is not open"));
        }
        if quote.expire_by <= 0 {
            return Err(AppError::internal("quote has no expiry policy configured"));
        }

        let order_volume = bigmath::parse_amount(&req.volume)?;
        let order_value = bigmath::parse_amount(&req.value)?;
        let q_volume = bigmath::parse_amount(&quote.volume)?;
        let q_value = bigmath::parse_amount(&quote.value)?;
        let q_min_value = bigmath::parse_amount(&quote.min_value)?;
        let q_max_value = bigmath::parse_amount(&quote.max_value)?;

        if order_volume > q_volume {
            return Err(AppError::new(ErrorKind::FailedPrecondition, "order volume exceeds quote residual volume"));
        }
        if order_value > q_value || order_value < q_min_value || order_value > q_max_value {
            return Err(AppError::new(ErrorKind::FailedPrecondition, "order value outside quote's value window"));
        }

        let derived_price = bigmath::derive_price(
            &order_value,
            &order_volume,
            quote.instrument.base.decimal,
            quote.instrument.quote.decimal,
        );
        if !bigmath::prices_match(derived_price, quote.price, quote.instrument.base.decimal, quote.instrument.quote.decimal) {
            return Err(AppError::new(ErrorKind::FailedPrecondition, "derived price does not match the quote's price"));
        }

        let member = self.account_client.find_member(req.member_id).await?;
        let rate = member.otc_fee_rate.unwrap_or_else(|| {
            Decimal::new(self.config.default_fee_rate_numer, 0) / Decimal::new(self.config.default_fee_rate_denom, 0)
        });
        let (rate_numer, rate_denom) = bigmath::rate_as_fraction(rate);

        // The fee rule follows the QUOTE's side (mirrors quote creation),
        // not the taker's own order side: consuming an ASK quote (BuyQuote)
        // grosses up and clamps to the quote's remaining locked_fee when the
        // order drains it; consuming a BID quote (SellQuote) is a flat fee.
        let fee = match expected_quote_side {
            OrderSide::Ask => {
                let (_, fee) = bigmath::gross_up_fee(&order_volume, rate_numer, rate_denom);
                if order_volume == q_volume {
                    bigmath::parse_amount(&quote.locked_fee)?
                } else {
                    fee
                }
            }
            OrderSide::Bid => bigmath::flat_fee(&order_volume, rate_numer, rate_denom),
        };

        let taker_side = expected_quote_side.opposite();
        let expired_time = crate::models::now_nanos() + quote.expire_by.saturating_mul(1_000_000_000);
        let activity_id = Uuid::new_v4();

        match taker_side {
            OrderSide::Bid => {
                // Buy: taker locks the fiat/quote leg (unless external), then
                // reserves a pending hold on their own base account.
                if !quote.instrument.quote.is_external(&self.config.external_currencies) {
                    self.account_client
                        .lock_account_balance(req.member_id, quote.instrument.quote.id, &order_value, activity_id)
                        .await?;
                }
                let taker_base_account = self.account_client.find_account(req.member_id, quote.instrument.base.id).await?;
                self.account_client
                    .add_pending(taker_base_account.id, Uuid::new_v4(), &order_volume)
                    .await?;
            }
            OrderSide::Ask => {
                // Sell: taker always locks their own base (crypto) balance;
                // the pending hold lands on the quote owner's base account,
                // since the owner is the one buying the coin.
                self.account_client
                    .lock_account_balance(req.member_id, quote.instrument.base.id, &order_volume, activity_id)
                    .await?;
                let owner_base_account = self.account_client.find_account(quote.owner, quote.instrument.base.id).await?;
                self.account_client
                    .add_pending(owner_base_account.id, Uuid::new_v4(), &order_volume)
                    .await?;
            }
        }

        self.quote_engine
            .apply_bookkeeping(quote.id, BookkeepingAction::Create, &order_volume, &order_value, &fee, None)
            .await?;

        self.repo
            .create(
                req.member_id,
                quote.owner,
                quote.id,
                taker_side,
                &quote.instrument,
                quote.price,
                &req.volume,
                &req.value,
                &bigmath::to_amount_string(&fee),
                expired_time,
            )
            .await
    }

    /// `UpdateOrder`: advances `id` to `target`, validating the edge against
    /// the transition table and running that transition's balance
    /// side-effects strictly before the status write.
    pub async fn update_order(&self, id: Uuid, target: OtcOrderStatus) -> Result<OtcOrder, AppError> {
        let order = self.repo.get(id).await?;
        if !self.transitions.allows(order.status, target) {
            return Err(AppError::new(ErrorKind::PermissionDenied, format!("{:?} -> {target:?} is not an allowed transition", order.status)));
        }

        let quote = self.quote_engine.repo().get(order.quote_id).await?;

        match (order.status, target) {
            (OtcOrderStatus::Unpaid, OtcOrderStatus::Paid) => self.pay_order(&order, &quote).await,
            (OtcOrderStatus::Paid, OtcOrderStatus::Unpaid) => self.refund_order(&order, &quote).await,
            (OtcOrderStatus::Paid, OtcOrderStatus::Completed) => self.release_coin(&order, &quote).await,
            (OtcOrderStatus::Unpaid, OtcOrderStatus::Expired) => self.expire_order(&order, &quote, OtcOrderStatus::Expired).await,
            (OtcOrderStatus::Unpaid, OtcOrderStatus::Cancelled) => self.expire_order(&order, &quote, OtcOrderStatus::Cancelled).await,
            (OtcOrderStatus::Paid, OtcOrderStatus::Cancelled) => self.cancel_paid_order(&order, &quote).await,
            // any -> APPEAL, APPEAL -> RESOLVED/CANCELLED, and the
            // config-gated COMPLETED -> APPEAL/CANCELLED edges: status
            // change and event append only, no balance movement.
            _ => {
                let event = OrderEvent::update(None, None, None);
                self.repo.update_status(id, target, event).await
            }
        }
    }

    /// `CancelOrder`: the dedicated RPC for an unpaid taker backing out,
    /// distinct from `UpdateOrder` even though it reaches the same terminal
    /// status — it always runs the unlock-in-place + CANCEL bookkeeping path
    /// and is only valid from UNPAID.
    pub async fn cancel_order(&self, id: Uuid) -> Result<OtcOrder, AppError> {
        let order = self.repo.get(id).await?;
        if order.status != OtcOrderStatus::Unpaid {
            return Err(AppError::new(ErrorKind::PermissionDenied, "only an unpaid order can be cancelled directly"));
        }
        let quote = self.quote_engine.repo().get(order.quote_id).await?;
        self.expire_order(&order, &quote, OtcOrderStatus::Cancelled).await
    }

    /// `payOrder` (UNPAID -> PAID): release the taker's locked quote-currency
    /// to the quote owner's account (ASK order: owner -> taker; BID order:
    /// taker -> owner). No-op when the quote currency is external.
    async fn pay_order(&self, order: &OtcOrder, quote: &Quote) -> Result<OtcOrder, AppError> {
        if !quote.instrument.quote.is_external(&self.config.external_currencies) {
            let (from, to) = self.quote_currency_parties(order, quote).await?;
            let value = bigmath::parse_amount(&order.value)?;
            self.account_client
                .release_locked_balance(Some(from.id), Some(to.id), &value, order.id, Uuid::new_v4())
                .await?;
        }

        let event = OrderEvent::update(None, None, None);
        self.repo.update_status(order.id, OtcOrderStatus::Paid, event).await
    }

    /// `refundOrder` (PAID -> UNPAID): reverses `pay_order`'s settlement.
    /// The account service has no "move locked balance back" primitive, so
    /// this is simulated as Lock(to, 0->value) -> Release(to->from, value)
    /// -> Lock(from, 0->value), all three under one activity id.
    async fn refund_order(&self, order: &OtcOrder, quote: &Quote) -> Result<OtcOrder, AppError> {
        if !quote.instrument.quote.is_external(&self.config.external_currencies) {
            let (from, to) = self.quote_currency_parties(order, quote).await?;
            let value = bigmath::parse_amount(&order.value)?;
            let activity_id = Uuid::new_v4();

            self.account_client
                .lock_account_balance(to.member_id, quote.instrument.quote.id, &value, activity_id)
                .await?;
            self.account_client
                .release_locked_balance(Some(to.id), Some(from.id), &value, order.id, activity_id)
                .await?;
            self.account_client
                .lock_account_balance(from.member_id, quote.instrument.quote.id, &value, activity_id)
                .await?;
        }

        let event = OrderEvent::update(None, None, None);
        self.repo.update_status(order.id, OtcOrderStatus::Unpaid, event).await
    }

    /// `releaseCoin` (PAID -> COMPLETED): transfers `volume - fee` base
    /// currency from the seller's locked balance to the buyer's, burns the
    /// fee, releases the buyer-side pending hold, and applies the COMPLETE
    /// bookkeeping action to the quote.
    async fn release_coin(&self, order: &OtcOrder, quote: &Quote) -> Result<OtcOrder, AppError> {
        let volume = bigmath::parse_amount(&order.volume)?;
        let fee = bigmath::parse_amount(&order.fee)?;
        let payout = &volume - &fee;

        let (seller, buyer) = self.base_currency_parties(order, quote).await?;

        self.account_client
            .release_locked_balance(Some(seller.id), Some(buyer.id), &payout, order.id, Uuid::new_v4())
            .await?;

        if !fee.is_empty_zero() {
            self.account_client
                .release_locked_balance(Some(seller.id), None, &fee, order.id, Uuid::new_v4())
                .await?;
        }

        self.account_client.release_pending(buyer.id, order.id, &volume).await?;

        self.quote_engine
            .apply_bookkeeping(quote.id, BookkeepingAction::Complete, &volume, &bigmath::zero(), &bigmath::zero(), None)
            .await?;

        let event = OrderEvent::update(None, None, None);
        self.repo.update_status(order.id, OtcOrderStatus::Completed, event).await
    }

    /// Shared unlock-in-place path for `expireOrder` and the UNPAID branch of
    /// `DoCancelOrder`: releases whatever the taker locked at order creation
    /// back to themselves, releases the buyer-side pending hold, and applies
    /// the matching quote bookkeeping action (EXPIRE or CANCEL).
    async fn expire_order(&self, order: &OtcOrder, quote: &Quote, terminal: OtcOrderStatus) -> Result<OtcOrder, AppError> {
        let volume = bigmath::parse_amount(&order.volume)?;
        let value = bigmath::parse_amount(&order.value)?;
        let fee = bigmath::parse_amount(&order.fee)?;

        match order.side {
            OrderSide::Ask => {
                let taker_base = self.account_client.find_account(order.member_id, quote.instrument.base.id).await?;
                self.account_client
                    .release_locked_balance(Some(taker_base.id), Some(taker_base.id), &volume, order.id, Uuid::new_v4())
                    .await?;
            }
            OrderSide::Bid => {
                if !quote.instrument.quote.is_external(&self.config.external_currencies) {
                    let taker_quote = self.account_client.find_account(order.member_id, quote.instrument.quote.id).await?;
                    self.account_client
                        .release_locked_balance(Some(taker_quote.id), Some(taker_quote.id), &value, order.id, Uuid::new_v4())
                        .await?;
                }
            }
        }

        let (_, buyer) = self.base_currency_parties(order, quote).await?;
        self.account_client.release_pending(buyer.id, order.id, &volume).await?;

        let action = if terminal == OtcOrderStatus::Expired { BookkeepingAction::Expire } else { BookkeepingAction::Cancel };
        self.quote_engine.apply_bookkeeping(quote.id, action, &volume, &value, &fee, None).await?;

        let event = if terminal == OtcOrderStatus::Cancelled { OrderEvent::cancel() } else { OrderEvent::update(None, None, None) };
        self.repo.update_status(order.id, terminal, event).await
    }

    /// PAID -> CANCELLED isn't narrated step-by-step in the spec (only the
    /// UNPAID branch is); see DESIGN.md for why this composes `refund_order`'s
    /// reversal with the CANCEL bookkeeping action rather than leaving the
    /// quote-currency settlement stuck with the counterparty.
    async fn cancel_paid_order(&self, order: &OtcOrder, quote: &Quote) -> Result<OtcOrder, AppError> {
        self.refund_order(order, quote).await?;
        let refreshed = self.repo.get(order.id).await?;
        self.expire_order(&refreshed, quote, OtcOrderStatus::Cancelled).await
    }

    /// Resolves the (from, to) pair for the quote-currency settlement at
    /// `payOrder`/`refundOrder` time: ASK order pays owner -> taker, BID
    /// order pays taker -> owner.
    async fn quote_currency_parties(&self, order: &OtcOrder, quote: &Quote) -> Result<(AccountDefined, AccountDefined), AppError> {
        let taker_account = self.account_client.find_account(order.member_id, quote.instrument.quote.id).await?;
        let owner_account = self.account_client.find_account(quote.owner, quote.instrument.quote.id).await?;
        Ok(match order.side {
            OrderSide::Ask => (owner_account, taker_account),
            OrderSide::Bid => (taker_account, owner_account),
        })
    }

    /// Resolves the (seller, buyer) pair for the base-currency settlement at
    /// `releaseCoin`/expiry time. The seller is whoever locked the base
    /// currency (owner for a BID order, since they escrowed it at quote
    /// creation; taker for an ASK order, who escrowed it at order creation).
    /// The buyer is the counterparty, which is also where the pending hold
    /// was reserved at order creation.
    async fn base_currency_parties(&self, order: &OtcOrder, quote: &Quote) -> Result<(AccountDefined, AccountDefined), AppError> {
        let taker_account = self.account_client.find_account(order.member_id, quote.instrument.base.id).await?;
        let owner_account = self.account_client.find_account(quote.owner, quote.instrument.base.id).await?;
        Ok(match order.side {
            OrderSide::Bid => (owner_account, taker_account),
            OrderSide::Ask => (taker_account, owner_account),
        })
    }
}

trait IsZero {
    fn is_empty_zero(&self) -> bool;
}

impl IsZero for BigInt {
    fn is_empty_zero(&self) -> bool {
        use num_traits::Zero;
        self.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_matches_spec_edges() {
        let table = TransitionTable::new(&[
            (OtcOrderStatus::Unpaid, OtcOrderStatus::Paid),
            (OtcOrderStatus::Unpaid, OtcOrderStatus::Cancelled),
            (OtcOrderStatus::Unpaid, OtcOrderStatus::Appeal),
            (OtcOrderStatus::Unpaid, OtcOrderStatus::Expired),
            (OtcOrderStatus::Paid, OtcOrderStatus::Completed),
            (OtcOrderStatus::Paid, OtcOrderStatus::Unpaid),
            (OtcOrderStatus::Paid, OtcOrderStatus::Appeal),
            (OtcOrderStatus::Paid, OtcOrderStatus::Cancelled),
            (OtcOrderStatus::Appeal, OtcOrderStatus::Resolved),
            (OtcOrderStatus::Appeal, OtcOrderStatus::Cancelled),
        ]);

        assert!(table.allows(OtcOrderStatus::Unpaid, OtcOrderStatus::Paid));
        assert!(!table.allows(OtcOrderStatus::Completed, OtcOrderStatus::Paid));
        assert!(!table.allows(OtcOrderStatus::Cancelled, OtcOrderStatus::Unpaid));
        assert!(!table.allows(OtcOrderStatus::Resolved, OtcOrderStatus::Paid));
    }
}
