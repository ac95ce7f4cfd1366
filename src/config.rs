//! Application configuration, loaded from the environment via [`config`] +
//! [`dotenvy`]. All tunables here are the knobs the original Go service wired
//! through flags or environment variables.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub database_url: String,

    #[serde(default = "default_member_service_url")]
    pub member_service_url: String,

    #[serde(default = "default_trading_service_url")]
    pub trading_service_url: String,

    /// General account-service call deadline (spec: 5 seconds).
    #[serde(default = "default_account_call_timeout_secs")]
    pub account_call_timeout_secs: u64,

    /// Deadline for the account-search lookup used while building a lock
    /// request, which the original service gave a full minute.
    #[serde(default = "default_account_search_timeout_secs")]
    pub account_search_timeout_secs: u64,

    /// Numerator/denominator of the default OTC fee rate (2/1000 = 0.2%),
    /// used when a member has no `otc_fee_rate` override.
    #[serde(default = "default_fee_rate_numer")]
    pub default_fee_rate_numer: i64,
    #[serde(default = "default_fee_rate_denom")]
    pub default_fee_rate_denom: i64,

    /// Currencies treated as "external" (bank-settled fiat) rather than
    /// custodied balances; configurable instead of compiled-in.
    #[serde(default = "default_external_currencies")]
    pub external_currencies: Vec<String>,

    /// Fallback currency-order live time in seconds, used when a merchant
    /// has no `order_live_time` configured (spec default: 30 minutes).
    #[serde(default = "default_currency_order_live_time_secs")]
    pub default_currency_order_live_time_secs: i64,

    /// Poll interval for the expiry worker.
    #[serde(default = "default_expiry_interval_secs")]
    pub expiry_worker_interval_secs: u64,

    /// Whether a COMPLETED otc order may still transition to APPEAL.
    /// Off by default; see the design notes for why.
    #[serde(default)]
    pub allow_post_completion_appeal: bool,
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_port() -> u16 {
    8030
}

fn default_member_service_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_trading_service_url() -> String {
    "http://localhost:8082".to_string()
}

fn default_account_call_timeout_secs() -> u64 {
    5
}

fn default_account_search_timeout_secs() -> u64 {
    60
}

fn default_fee_rate_numer() -> i64 {
    2
}

fn default_fee_rate_denom() -> i64 {
    1000
}

fn default_external_currencies() -> Vec<String> {
    vec!["cny".to_string(), "krw".to_string()]
}

fn default_currency_order_live_time_secs() -> i64 {
    30 * 60
}

fn default_expiry_interval_secs() -> u64 {
    60
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let port = std::env::var("PORT")
            .or_else(|_| std::env::var("OTC_PORT"))
            .ok();

        let mut builder = config::Config::builder()
            .add_source(config::Environment::default().try_parsing(true).list_separator(","));

        if let Some(port) = port {
            builder = builder.set_override("port", port)?;
        }

        let settings = builder.build()?;
        let cfg: AppConfig = settings.try_deserialize()?;
        Ok(cfg)
    }
}
