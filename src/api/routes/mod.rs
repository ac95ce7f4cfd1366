use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;

use crate::api::handlers;
use crate::AppState;

pub fn create_router(_state: Arc<AppState>) -> Router<Arc<AppState>> {
    let quote_routes = Router::new()
        .route("/quotes", post(handlers::quote::create_quote))
        .route("/quotes", get(handlers::quote::list_quote))
        .route("/quotes/:id", get(handlers::quote::get_quote_details))
        .route("/quotes/:id", put(handlers::quote::update_quote))
        .route("/quotes/:id", delete(handlers::quote::delete_quote));

    let order_routes = Router::new()
        .route("/orders/buy", post(handlers::otc_order::buy_quote))
        .route("/orders/sell", post(handlers::otc_order::sell_quote))
        .route("/orders", get(handlers::otc_order::list_order))
        .route("/orders/:id", get(handlers::otc_order::get_order))
        .route("/orders/:id", put(handlers::otc_order::update_order))
        .route("/orders/:id/cancel", post(handlers::otc_order::cancel_order))
        .route("/orders/:id/room", put(handlers::otc_order::update_room_id));

    let currency_order_routes = Router::new()
        .route("/currency-orders", post(handlers::currency_order::create_currency_order))
        .route("/currency-orders", get(handlers::currency_order::search_currency_orders))
        .route("/currency-orders/:id", get(handlers::currency_order::get_currency_order))
        .route("/currency-orders/:id", put(handlers::currency_order::update_currency_order));

    let merchant_routes = Router::new()
        .route("/merchants", post(handlers::merchant::create_merchant))
        .route("/merchants", get(handlers::merchant::search_merchants))
        .route("/merchants/info", get(handlers::merchant::search_merchants_info))
        .route("/merchants/:id", get(handlers::merchant::get_merchant))
        .route("/merchants/:id", put(handlers::merchant::update_merchant))
        .route("/merchant-margins", get(handlers::merchant_margin::search_merchant_margins))
        .route("/merchant-margins", post(handlers::merchant_margin::upsert_merchant_margin))
        .route("/merchant-margins/:id", get(handlers::merchant_margin::get_merchant_margin));

    let sdce_routes = Router::new()
        .route("/sdce-quotes", post(handlers::sdce_quote::create_sdce_quote))
        .route("/sdce-quotes/:ticker", get(handlers::sdce_quote::get_sdce_quote));

    Router::new()
        .merge(quote_routes)
        .merge(order_routes)
        .merge(currency_order_routes)
        .merge(merchant_routes)
        .merge(sdce_routes)
}
