use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{CreateCurrencyOrderRequest, CurrencyOrder, CurrencyOrderFilter, CurrencyOrderStatus};
use crate::utils::response::{ApiResponse, AppError};
use crate::AppState;

pub async fn create_currency_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCurrencyOrderRequest>,
) -> Result<Json<ApiResponse<CurrencyOrder>>, AppError> {
    let order = state.currency_order_engine.create_order(req).await?;
    Ok(Json(ApiResponse::success(order)))
}

pub async fn get_currency_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CurrencyOrder>>, AppError> {
    let order = state.currency_order_engine.get_order(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

pub async fn search_currency_orders(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<CurrencyOrderFilter>,
) -> Result<Json<ApiResponse<Vec<CurrencyOrder>>>, AppError> {
    let orders = state.currency_order_engine.list_orders(filter).await?;
    Ok(Json(ApiResponse::success(orders)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateCurrencyOrderRequest {
    pub status: CurrencyOrderStatus,
    pub memo: Option<String>,
    pub pay_fund_detail: Option<serde_json::Value>,
    pub currency_quote: Option<serde_json::Value>,
}

pub async fn update_currency_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCurrencyOrderRequest>,
) -> Result<Json<ApiResponse<CurrencyOrder>>, AppError> {
    let now = crate::models::now_nanos();
    let order = state
        .currency_order_engine
        .update_order(id, req.status, req.memo, req.pay_fund_detail, req.currency_quote, now)
        .await?;
    Ok(Json(ApiResponse::success(order)))
}
