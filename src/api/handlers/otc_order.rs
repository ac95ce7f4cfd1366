use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{OrderFilter, OtcOrder, OtcOrderStatus, TakeQuoteRequest};
use crate::utils::response::{ApiResponse, AppError};
use crate::AppState;

pub async fn buy_quote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TakeQuoteRequest>,
) -> Result<Json<ApiResponse<OtcOrder>>, AppError> {
    let order = state.order_engine.buy_quote(req).await?;
    Ok(Json(ApiResponse::success(order)))
}

pub async fn sell_quote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TakeQuoteRequest>,
) -> Result<Json<ApiResponse<OtcOrder>>, AppError> {
    let order = state.order_engine.sell_quote(req).await?;
    Ok(Json(ApiResponse::success(order)))
}

pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OtcOrder>>, AppError> {
    let order = state.order_engine.get_order(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

pub async fn list_order(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<ApiResponse<Vec<OtcOrder>>>, AppError> {
    let orders = state.order_engine.list_orders(filter).await?;
    Ok(Json(ApiResponse::success(orders)))
}

pub async fn cancel_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OtcOrder>>, AppError> {
    let order = state.order_engine.cancel_order(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub status: OtcOrderStatus,
}

pub async fn update_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<ApiResponse<OtcOrder>>, AppError> {
    let order = state.order_engine.update_order(id, req.status).await?;
    Ok(Json(ApiResponse::success(order)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoomIdRequest {
    pub chatroom_id: String,
}

pub async fn update_room_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRoomIdRequest>,
) -> Result<Json<ApiResponse<OtcOrder>>, AppError> {
    let order = state.order_engine.update_room_id(id, &req.chatroom_id).await?;
    Ok(Json(ApiResponse::success(order)))
}
