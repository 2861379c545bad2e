use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::controllers::geocoding_controller::GeocodingController;
use crate::services::geocoding_service::GeocodingCandidate;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_geocoding_router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_address))
        .route("/reverse", get(reverse_geocode))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: String,
}

#[derive(Debug, Deserialize)]
struct ReverseParams {
    lat: f64,
    lon: f64,
}

async fn search_address(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<GeocodingCandidate>>, AppError> {
    let controller = GeocodingController::new(state.geocoding.clone());
    let candidates = controller.search(&params.q).await?;
    Ok(Json(candidates))
}

async fn reverse_geocode(
    State(state): State<AppState>,
    Query(params): Query<ReverseParams>,
) -> Result<Json<GeocodingCandidate>, AppError> {
    let controller = GeocodingController::new(state.geocoding.clone());
    let candidate = controller.reverse(params.lat, params.lon).await?;
    Ok(Json(candidate))
}
