use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::delivery_controller::DeliveryController;
use crate::dto::delivery_dto::{
    AcceptDeliveryRequest, ApiResponse, CreateDeliveryRequest, DeliveryFilters, DeliveryResponse,
    QuoteRequest, QuoteResponse, UpdateStatusRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_delivery_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_delivery))
        .route("/", get(list_deliveries))
        .route("/pending", get(list_pending))
        .route("/quote", post(quote_delivery))
        .route("/:id", get(get_delivery))
        .route("/:id/accept", post(accept_delivery))
        .route("/:id/status", put(update_delivery_status))
}

async fn create_delivery(
    State(state): State<AppState>,
    Json(request): Json<CreateDeliveryRequest>,
) -> Result<Json<ApiResponse<DeliveryResponse>>, AppError> {
    let controller = DeliveryController::new(state.pool.clone(), state.feed.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_deliveries(
    State(state): State<AppState>,
    Query(filters): Query<DeliveryFilters>,
) -> Result<Json<Vec<DeliveryResponse>>, AppError> {
    let controller = DeliveryController::new(state.pool.clone(), state.feed.clone());
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn list_pending(
    State(state): State<AppState>,
) -> Result<Json<Vec<DeliveryResponse>>, AppError> {
    let controller = DeliveryController::new(state.pool.clone(), state.feed.clone());
    let response = controller.list_pending().await?;
    Ok(Json(response))
}

async fn get_delivery(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeliveryResponse>, AppError> {
    let controller = DeliveryController::new(state.pool.clone(), state.feed.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn accept_delivery(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AcceptDeliveryRequest>,
) -> Result<Json<ApiResponse<DeliveryResponse>>, AppError> {
    let controller = DeliveryController::new(state.pool.clone(), state.feed.clone());
    let response = controller.accept(id, request).await?;
    Ok(Json(response))
}

async fn update_delivery_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<DeliveryResponse>>, AppError> {
    let controller = DeliveryController::new(state.pool.clone(), state.feed.clone());
    let response = controller.update_status(id, request).await?;
    Ok(Json(response))
}

async fn quote_delivery(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let controller = DeliveryController::new(state.pool.clone(), state.feed.clone());
    let response = controller.quote(request).await?;
    Ok(Json(response))
}
