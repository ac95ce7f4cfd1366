use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::models::{CreateQuoteRequest, QuoteFilter, UpdateQuoteFields};
use crate::utils::response::{ApiResponse, AppError};
use crate::AppState;

pub async fn create_quote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateQuoteRequest>,
) -> Result<Json<ApiResponse<crate::models::Quote>>, AppError> {
    let quote = state.quote_engine.create_quote(req).await?;
    Ok(Json(ApiResponse::success(quote)))
}

pub async fn update_quote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(fields): Json<UpdateQuoteFields>,
) -> Result<Json<ApiResponse<crate::models::Quote>>, AppError> {
    let quote = state.quote_engine.update_quote(id, fields).await?;
    Ok(Json(ApiResponse::success(quote)))
}

pub async fn delete_quote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<crate::models::Quote>>, AppError> {
    let quote = state.quote_engine.cancel_quote(id).await?;
    Ok(Json(ApiResponse::success(quote)))
}

pub async fn list_quote(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<QuoteFilter>,
) -> Result<Json<ApiResponse<Vec<crate::models::Quote>>>, AppError> {
    let quotes = state.quote_engine.repo().search(&filter).await?;
    Ok(Json(ApiResponse::success(quotes)))
}

pub async fn get_quote_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<crate::models::Quote>>, AppError> {
    let quote = state.quote_engine.repo().get(id).await?;
    Ok(Json(ApiResponse::success(quote)))
}
