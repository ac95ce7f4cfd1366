//! Typed client for the external Member service (account balances, pending
//! holds, member lookup) and the Trading service (instrument metadata).
//!
//! Every call carries a 5-second deadline, except resolving which account to
//! lock against, which gets a full minute — the original service gave the
//! account-search RPC far more slack than the lock/release calls themselves.

use num_bigint::BigInt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::bigmath;
use crate::models::{AccountDefined, ActivitySource, LockBalanceResult, MemberDefined};
use crate::utils::response::{AppError, ErrorKind};

const ACCOUNT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

pub struct AccountClient {
    http: Client,
    member_base_url: String,
    trading_base_url: String,
    account_search_timeout: Duration,
}

#[derive(Debug, Serialize)]
struct LockBalanceBody {
    member_id: Uuid,
    currency_id: Uuid,
    account_id: Uuid,
    from_amount: String,
    to_amount: String,
    activity_id: String,
    source: ActivitySource,
}

#[derive(Debug, Deserialize)]
struct LockBalanceResponse {
    result: LockBalanceResult,
}

#[derive(Debug, Serialize)]
struct ReleaseLockedBalanceBody {
    from: Option<Uuid>,
    to: Option<Uuid>,
    amount: String,
    order_ref: String,
    event_ref: String,
}

#[derive(Debug, Serialize)]
struct SearchAccountsBody {
    member_id: Uuid,
    currencies: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
struct SearchAccountsResponse {
    accounts: Vec<AccountDefined>,
}

#[derive(Debug, Serialize)]
struct PendingBody {
    account_id: Uuid,
    order_id: String,
    amount: String,
}

impl AccountClient {
    pub fn new(member_base_url: String, trading_base_url: String, account_search_timeout_secs: u64) -> Self {
        Self {
            http: Client::new(),
            member_base_url,
            trading_base_url,
            account_search_timeout: Duration::from_secs(account_search_timeout_secs),
        }
    }

    /// Resolves the member's account for `currency_id`. This is the one call
    /// the original service gave a full minute instead of 5 seconds.
    async fn resolve_account(&self, member_id: Uuid, currency_id: Uuid) -> Result<AccountDefined, AppError> {
        let body = SearchAccountsBody {
            member_id,
            currencies: vec![currency_id],
        };

        let resp: SearchAccountsResponse = self
            .http
            .post(format!("{}/accounts/search", self.member_base_url))
            .json(&body)
            .timeout(self.account_search_timeout)
            .send()
            .await?
            .json()
            .await?;

        resp.accounts
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found(format!("no account for member {member_id} currency {currency_id}")))
    }

    /// Locks an additional `amount` against the member's account for
    /// `currency_id`, always as a `fromAmount=0, toAmount=amount` delta.
    pub async fn lock_account_balance(
        &self,
        member_id: Uuid,
        currency_id: Uuid,
        amount: &BigInt,
        activity_id: Uuid,
    ) -> Result<(), AppError> {
        let account = self.resolve_account(member_id, currency_id).await?;

        let body = LockBalanceBody {
            member_id,
            currency_id,
            account_id: account.id,
            from_amount: "0".to_string(),
            to_amount: bigmath::to_amount_string(amount),
            activity_id: activity_id.to_string(),
            source: ActivitySource::Order,
        };

        let resp: LockBalanceResponse = self
            .http
            .post(format!("{}/accounts/lock", self.member_base_url))
            .json(&body)
            .timeout(ACCOUNT_CALL_TIMEOUT)
            .send()
            .await?
            .json()
            .await?;

        lock_result_to_outcome(resp.result)
    }

    pub async fn release_locked_balance(
        &self,
        from: Option<Uuid>,
        to: Option<Uuid>,
        amount: &BigInt,
        order_ref: Uuid,
        event_ref: Uuid,
    ) -> Result<(), AppError> {
        let body = ReleaseLockedBalanceBody {
            from,
            to,
            amount: bigmath::to_amount_string(amount),
            order_ref: order_ref.to_string(),
            event_ref: event_ref.to_string(),
        };

        self.http
            .post(format!("{}/accounts/release", self.member_base_url))
            .json(&body)
            .timeout(ACCOUNT_CALL_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    pub async fn find_account(&self, member_id: Uuid, currency_id: Uuid) -> Result<AccountDefined, AppError> {
        self.resolve_account(member_id, currency_id).await
    }

    pub async fn find_member(&self, member_id: Uuid) -> Result<MemberDefined, AppError> {
        let member: MemberDefined = self
            .http
            .get(format!("{}/members/{member_id}", self.member_base_url))
            .timeout(ACCOUNT_CALL_TIMEOUT)
            .send()
            .await?
            .json()
            .await?;
        Ok(member)
    }

    pub async fn add_pending(&self, account_id: Uuid, order_id: Uuid, amount: &BigInt) -> Result<(), AppError> {
        let body = PendingBody {
            account_id,
            order_id: order_id.to_string(),
            amount: bigmath::to_amount_string(amount),
        };

        self.http
            .post(format!("{}/accounts/pending/add", self.member_base_url))
            .json(&body)
            .timeout(ACCOUNT_CALL_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    pub async fn release_pending(&self, account_id: Uuid, order_id: Uuid, amount: &BigInt) -> Result<(), AppError> {
        let body = PendingBody {
            account_id,
            order_id: order_id.to_string(),
            amount: bigmath::to_amount_string(amount),
        };

        self.http
            .post(format!("{}/accounts/pending/release", self.member_base_url))
            .json(&body)
            .timeout(ACCOUNT_CALL_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    pub async fn find_instrument(&self, name: &str) -> Result<crate::models::Instrument, AppError> {
        let instrument: crate::models::Instrument = self
            .http
            .get(format!("{}/instruments/{name}", self.trading_base_url))
            .timeout(ACCOUNT_CALL_TIMEOUT)
            .send()
            .await?
            .json()
            .await?;
        Ok(instrument)
    }
}

fn lock_result_to_outcome(result: LockBalanceResult) -> Result<(), AppError> {
    match result {
        LockBalanceResult::LockSuccessful => Ok(()),
        LockBalanceResult::LockInsufficientBalance => {
            Err(AppError::new(ErrorKind::FailedPrecondition, "insufficient balance to lock"))
        }
        LockBalanceResult::LockInvalidSource => {
            Err(AppError::new(ErrorKind::PermissionDenied, "invalid lock source"))
        }
        LockBalanceResult::LockAccountNotFound => {
            Err(AppError::new(ErrorKind::NotFound, "account not found for lock"))
        }
        LockBalanceResult::LockUnsuccessfulRollBack | LockBalanceResult::InvalidLockMoneyResult => {
            Err(AppError::new(ErrorKind::Internal, "ambiguous lock result from account service"))
        }
    }
}
