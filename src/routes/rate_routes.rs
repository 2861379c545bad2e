use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::rate_controller::RateController;
use crate::dto::rate_dto::{ExchangeRateResponse, TripCostRequest, TripCostResponse};
use crate::models::fuel::FuelPriceBundle;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_rate_router() -> Router<AppState> {
    Router::new()
        .route("/exchange", get(get_exchange_rate))
        .route("/fuel", get(get_fuel_prices))
        .route("/fuel/trip-cost", post(estimate_trip_cost))
}

async fn get_exchange_rate(State(state): State<AppState>) -> Json<ExchangeRateResponse> {
    let controller = RateController::new(state.exchange.clone(), state.fuel.clone());
    Json(controller.exchange_rate().await)
}

async fn get_fuel_prices(State(state): State<AppState>) -> Json<FuelPriceBundle> {
    let controller = RateController::new(state.exchange.clone(), state.fuel.clone());
    Json(controller.fuel_prices().await)
}

async fn estimate_trip_cost(
    State(state): State<AppState>,
    Json(request): Json<TripCostRequest>,
) -> Result<Json<TripCostResponse>, AppError> {
    let controller = RateController::new(state.exchange.clone(), state.fuel.clone());
    let response = controller.trip_cost(request).await?;
    Ok(Json(response))
}
