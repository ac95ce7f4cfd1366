use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod bigmath;
mod config;
mod db;
mod metrics;
mod models;
mod repository;
mod services;
mod utils;

use crate::config::AppConfig;
use crate::db::Database;
use crate::repository::{
    CurrencyOrderRepository, MerchantMarginRepository, MerchantRepository, OtcOrderRepository,
    QuoteRepository, SdceQuoteRepository,
};
use crate::services::{
    AccountClient, CurrencyOrderEngine, ExpiryWorker, MerchantEngine, OrderEngine, QuoteEngine,
    SdceEngine,
};

pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
    pub quote_engine: Arc<QuoteEngine>,
    pub order_engine: Arc<OrderEngine>,
    pub currency_order_engine: Arc<CurrencyOrderEngine>,
    pub merchant_engine: Arc<MerchantEngine>,
    pub sdce_engine: Arc<SdceEngine>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "otc_trading_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = AppConfig::load()?;

    tracing::info!("Starting OTC trading service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.environment);

    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connected");

    let prometheus_handle = metrics::init_metrics();

    let account_client = Arc::new(AccountClient::new(
        config.member_service_url.clone(),
        config.trading_service_url.clone(),
        config.account_search_timeout_secs,
    ));

    let quote_repo = QuoteRepository::new(db.pool.clone());
    let order_repo = OtcOrderRepository::new(db.pool.clone());
    let currency_order_repo = CurrencyOrderRepository::new(db.pool.clone());
    let merchant_repo = MerchantRepository::new(db.pool.clone());
    let margin_repo = MerchantMarginRepository::new(db.pool.clone());
    let sdce_repo = SdceQuoteRepository::new(db.pool.clone());

    let quote_engine = Arc::new(QuoteEngine::new(
        quote_repo,
        account_client.clone(),
        config.clone(),
    ));
    let order_engine = Arc::new(OrderEngine::new(
        order_repo,
        quote_engine.clone(),
        account_client.clone(),
        config.clone(),
    ));
    let currency_order_engine = Arc::new(CurrencyOrderEngine::new(
        currency_order_repo,
        merchant_repo.clone(),
    ));
    let merchant_engine = Arc::new(MerchantEngine::new(merchant_repo, margin_repo));
    let sdce_engine = Arc::new(SdceEngine::new(sdce_repo));

    tracing::info!("Engines initialized");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let expiry_worker = ExpiryWorker::new(
        currency_order_engine.clone(),
        order_engine.clone(),
        config.expiry_worker_interval_secs,
    );
    let expiry_worker_handle = tokio::spawn(expiry_worker.run(shutdown_rx));
    tracing::info!(
        "Expiry worker started (interval: {}s)",
        config.expiry_worker_interval_secs
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        quote_engine,
        order_engine,
        currency_order_engine,
        merchant_engine,
        sdce_engine,
    });

    let app = Router::new()
        .route("/health", get(health_check))
        .route(
            "/metrics",
            get(move || {
                let handle = prometheus_handle.clone();
                async move { handle.render() }
            }),
        )
        .nest("/api/v1", api::routes::create_router(state.clone()))
        .layer(axum::middleware::from_fn(api::middleware::metrics_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", config.port))?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await?;

    expiry_worker_handle.abort();

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping background workers");
    let _ = shutdown_tx.send(true);
}
