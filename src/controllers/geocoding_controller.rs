//! Controller de geocoding

use std::sync::Arc;

use crate::services::geocoding_service::{GeocodingCandidate, GeocodingService};
use crate::utils::errors::{AppError, AppResult};

pub struct GeocodingController {
    service: Arc<GeocodingService>,
}

impl GeocodingController {
    pub fn new(service: Arc<GeocodingService>) -> Self {
        Self { service }
    }

    pub async fn search(&self, query: &str) -> AppResult<Vec<GeocodingCandidate>> {
        if query.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Query parameter 'q' is required".to_string(),
            ));
        }

        self.service
            .search_address(query)
            .await
            .map_err(|e| AppError::ExternalApi(e.to_string()))
    }

    pub async fn reverse(&self, lat: f64, lon: f64) -> AppResult<GeocodingCandidate> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(AppError::BadRequest(
                "lat/lon out of range".to_string(),
            ));
        }

        self.service
            .reverse_geocode(lat, lon)
            .await
            .map_err(|e| AppError::ExternalApi(e.to_string()))
    }
}
