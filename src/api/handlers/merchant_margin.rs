use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::models::{MerchantMargin, MerchantMarginFilter, UpsertMerchantMarginRequest};
use crate::utils::response::{ApiResponse, AppError};
use crate::AppState;

pub async fn get_merchant_margin(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MerchantMargin>>, AppError> {
    let margin = state.merchant_engine.get_margin(id).await?;
    Ok(Json(ApiResponse::success(margin)))
}

pub async fn upsert_merchant_margin(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpsertMerchantMarginRequest>,
) -> Result<Json<ApiResponse<MerchantMargin>>, AppError> {
    let margin = state.merchant_engine.upsert_margin(req).await?;
    Ok(Json(ApiResponse::success(margin)))
}

pub async fn search_merchant_margins(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<MerchantMarginFilter>,
) -> Result<Json<ApiResponse<Vec<MerchantMargin>>>, AppError> {
    let margins = state.merchant_engine.search_margins(filter).await?;
    Ok(Json(ApiResponse::success(margins)))
}
