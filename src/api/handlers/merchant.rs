use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::models::{CreateMerchantRequest, Merchant, MerchantFilter, MerchantSummary, UpdateMerchantFields};
use crate::utils::response::{ApiResponse, AppError};
use crate::AppState;

pub async fn create_merchant(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMerchantRequest>,
) -> Result<Json<ApiResponse<Merchant>>, AppError> {
    let merchant = state.merchant_engine.create_merchant(req).await?;
    Ok(Json(ApiResponse::success(merchant)))
}

pub async fn get_merchant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Merchant>>, AppError> {
    let merchant = state.merchant_engine.get_merchant(id).await?;
    Ok(Json(ApiResponse::success(merchant)))
}

pub async fn update_merchant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(fields): Json<UpdateMerchantFields>,
) -> Result<Json<ApiResponse<Merchant>>, AppError> {
    let merchant = state.merchant_engine.update_merchant(id, fields).await?;
    Ok(Json(ApiResponse::success(merchant)))
}

pub async fn search_merchants(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<MerchantFilter>,
) -> Result<Json<ApiResponse<Vec<MerchantSummary>>>, AppError> {
    let merchants = state.merchant_engine.search_merchants(filter).await?;
    Ok(Json(ApiResponse::success(merchants)))
}

pub async fn search_merchants_info(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<MerchantFilter>,
) -> Result<Json<ApiResponse<Vec<Merchant>>>, AppError> {
    let merchants = state.merchant_engine.search_merchants_info(filter).await?;
    Ok(Json(ApiResponse::success(merchants)))
}
