use axum::{extract::Path, routing::get, Json, Router};

use crate::config::pricing::{vehicle_info, VEHICLE_CATALOG};
use crate::models::fuel::{VehicleClass, VehicleInfo};
use crate::state::AppState;

/// Catálogo estático de vehículos; no hay persistencia detrás
pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles))
        .route("/:class", get(get_vehicle))
}

async fn list_vehicles() -> Json<Vec<VehicleInfo>> {
    Json(VEHICLE_CATALOG.clone())
}

async fn get_vehicle(Path(class): Path<VehicleClass>) -> Json<VehicleInfo> {
    Json(vehicle_info(class).clone())
}
