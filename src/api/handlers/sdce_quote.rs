use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::models::{CreateSdceQuoteRequest, SdceQuote};
use crate::utils::response::{ApiResponse, AppError};
use crate::AppState;

pub async fn create_sdce_quote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSdceQuoteRequest>,
) -> Result<Json<ApiResponse<SdceQuote>>, AppError> {
    let quote = state.sdce_engine.upsert(req).await?;
    Ok(Json(ApiResponse::success(quote)))
}

pub async fn get_sdce_quote(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> Result<Json<ApiResponse<SdceQuote>>, AppError> {
    let quote = state.sdce_engine.get(&ticker).await?;
    Ok(Json(ApiResponse::success(quote)))
}
