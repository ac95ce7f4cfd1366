//! Quote lifecycle: create, update, cancel, and the residual volume/value/fee
//! bookkeeping shared with the order engine.

use num_bigint::BigInt;
use num_traits::Zero;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::bigmath;
use crate::config::AppConfig;
use crate::models::{
    CreateQuoteRequest, OrderEvent, OrderSide, Quote, QuoteStatus, QuoteType, UpdateQuoteFields,
};
use crate::repository::quote_repo::BookkeepingAction;
use crate::repository::QuoteRepository;
use crate::services::account_client::AccountClient;
use crate::utils::response::{AppError, ErrorKind};

pub struct QuoteEngine {
    repo: QuoteRepository,
    account_client: Arc<AccountClient>,
    config: AppConfig,
}

impl QuoteEngine {
    pub fn new(repo: QuoteRepository, account_client: Arc<AccountClient>, config: AppConfig) -> Self {
        Self { repo, account_client, config }
    }

    pub async fn create_quote(&self, req: CreateQuoteRequest) -> Result<Quote, AppError> {
        let volume = bigmath::parse_amount(&req.volume)?;
        let base_decimal = req.instrument.base.decimal;
        let quote_decimal = req.instrument.quote.decimal;

        let (price, value) = match req.quote_type {
            QuoteType::Regular => {
                let price = req
                    .price
                    .ok_or_else(|| AppError::invalid_argument("price is required for a REGULAR quote"))?;
                let scale = price.scale();
                let value = bigmath::round_price_times_volume(
                    &bigmath::decimal_to_scaled_int(price, scale)?,
                    scale,
                    &volume,
                );
                (price, value)
            }
            QuoteType::Wholesale => {
                let value_str = req
                    .value
                    .as_deref()
                    .ok_or_else(|| AppError::invalid_argument("value is required for a WHOLESALE quote"))?;
                let value = bigmath::parse_amount(value_str)?;
                if volume.is_zero() {
                    return Err(AppError::invalid_argument("volume must be nonzero"));
                }
                let price = bigmath::derive_price(&value, &volume, base_decimal, quote_decimal);
                (price, value)
            }
        };

        let member = self.account_client.find_member(req.owner).await?;
        let rate = member.otc_fee_rate.unwrap_or_else(|| {
            Decimal::new(self.config.default_fee_rate_numer, 0) / Decimal::new(self.config.default_fee_rate_denom, 0)
        });
        let (rate_numer, rate_denom) = bigmath::rate_as_fraction(rate);

        let (min_value, max_value) = match req.quote_type {
            QuoteType::Wholesale => (value.clone(), value.clone()),
            QuoteType::Regular => (bigmath::zero(), value.clone()),
        };

        let needed_lock = match req.side {
            OrderSide::Ask => {
                let (total_volume, fee) = bigmath::gross_up_fee(&volume, rate_numer, rate_denom);
                Some((req.instrument.base.id, total_volume, fee))
            }
            OrderSide::Bid => {
                if req.instrument.quote.is_external(&self.config.external_currencies) {
                    None
                } else {
                    Some((req.instrument.quote.id, value.clone(), bigmath::zero()))
                }
            }
        };

        let locked_fee = needed_lock.as_ref().map(|(_, _, fee)| fee.clone()).unwrap_or_else(bigmath::zero);
        let volume_to_fill = match req.side {
            OrderSide::Ask => volume.clone(),
            OrderSide::Bid => value.clone(),
        };

        if let Some((currency_id, needed, _)) = &needed_lock {
            self.account_client
                .lock_account_balance(req.owner, *currency_id, needed, Uuid::new_v4())
                .await?;
        }

        // For an ASK quote the event's to_volume is the grossed-up total
        // (volume + lockedFee), matching the spec's worked example; for BID,
        // locked_fee is always zero at creation so this is plain volume.
        let event_to_volume = &volume + &locked_fee;
        let event = OrderEvent::create(
            Some(price),
            "0",
            &bigmath::to_amount_string(&event_to_volume),
            "0",
            &bigmath::to_amount_string(&value),
        );

        self.repo
            .create(
                req.owner,
                &req.instrument,
                req.side,
                req.quote_type,
                price,
                &bigmath::to_amount_string(&volume),
                &bigmath::to_amount_string(&value),
                &bigmath::to_amount_string(&min_value),
                &bigmath::to_amount_string(&max_value),
                &bigmath::to_amount_string(&locked_fee),
                &bigmath::to_amount_string(&volume_to_fill),
                &req.accepted_payment_methods,
                req.expire_by,
                member.otc_details.clone(),
                event,
            )
            .await
    }

    pub async fn update_quote(&self, id: Uuid, fields: UpdateQuoteFields) -> Result<Quote, AppError> {
        let quote = self.repo.get(id).await?;
        if quote.status != QuoteStatus::On {
            return Err(AppError::new(ErrorKind::PermissionDenied, "only ON quotes may be updated"));
        }

        if fields.price.is_none() && fields.volume.is_none() && fields.value.is_none() && fields.accepted_payment_methods.is_none() {
            return Ok(quote);
        }

        let event = OrderEvent::update(fields.price, fields.volume.clone(), fields.value.clone());

        self.repo
            .update_terms(
                id,
                fields.price,
                fields.volume.as_deref(),
                fields.value.as_deref(),
                fields.accepted_payment_methods.as_deref(),
                event,
            )
            .await
    }

    pub async fn cancel_quote(&self, id: Uuid) -> Result<Quote, AppError> {
        let quote = self.repo.get(id).await?;

        if quote.status == QuoteStatus::Closed {
            return Err(AppError::new(ErrorKind::PermissionDenied, "quote already closed"));
        }
        let processing_volume = bigmath::parse_amount(&quote.processing_volume)?;
        if !processing_volume.is_zero() {
            return Err(AppError::new(ErrorKind::PermissionDenied, "quote has orders in flight"));
        }

        let volume = bigmath::parse_amount(&quote.volume)?;
        let locked_fee = bigmath::parse_amount(&quote.locked_fee)?;
        let value = bigmath::parse_amount(&quote.value)?;

        let (currency_id, amount) = match quote.side {
            OrderSide::Ask => (quote.instrument.base.id, &volume + &locked_fee),
            OrderSide::Bid => {
                if quote.instrument.quote.is_external(&self.config.external_currencies) {
                    (quote.instrument.quote.id, bigmath::zero())
                } else {
                    (quote.instrument.quote.id, value)
                }
            }
        };

        if !amount.is_zero() || quote.side == OrderSide::Ask {
            let account = self.account_client.find_account(quote.owner, currency_id).await?;
            self.account_client
                .release_locked_balance(Some(account.id), Some(account.id), &amount, quote.id, Uuid::new_v4())
                .await?;
        }

        let event = OrderEvent::cancel();
        self.repo.update_status(id, QuoteStatus::Closed, event).await
    }

    pub async fn apply_bookkeeping(
        &self,
        quote_id: Uuid,
        action: BookkeepingAction,
        order_volume: &BigInt,
        order_value: &BigInt,
        order_fee: &BigInt,
        event: Option<OrderEvent>,
    ) -> Result<Quote, AppError> {
        self.repo
            .apply_bookkeeping(
                quote_id,
                action,
                &bigmath::to_amount_string(order_volume),
                &bigmath::to_amount_string(order_value),
                &bigmath::to_amount_string(order_fee),
                event,
            )
            .await
    }

    pub fn repo(&self) -> &QuoteRepository {
        &self.repo
    }
}
