//! Controller de rates
//!
//! Expone el tipo de cambio y los precios de combustible resueltos.
//! Los servicios subyacentes nunca fallan, así que los endpoints de
//! lectura tampoco; solo la estimación de trayecto valida su input.

use rust_decimal::Decimal;
use std::sync::Arc;

use crate::dto::rate_dto::{ExchangeRateResponse, TripCostRequest, TripCostResponse};
use crate::models::fuel::FuelPriceBundle;
use crate::services::exchange_rate_service::ExchangeRateService;
use crate::services::fuel_price_service::{trip_fuel_cost, FuelPriceService};
use crate::utils::errors::{AppError, AppResult};

pub struct RateController {
    exchange: Arc<ExchangeRateService>,
    fuel: Arc<FuelPriceService>,
}

impl RateController {
    pub fn new(exchange: Arc<ExchangeRateService>, fuel: Arc<FuelPriceService>) -> Self {
        Self { exchange, fuel }
    }

    pub async fn exchange_rate(&self) -> ExchangeRateResponse {
        let resolved = self.exchange.get_usd_rate().await;
        ExchangeRateResponse {
            rate: resolved.rate,
            source: resolved.source,
        }
    }

    pub async fn fuel_prices(&self) -> FuelPriceBundle {
        self.fuel.get_fuel_prices().await
    }

    /// Estimar el coste de combustible de un trayecto para un vehículo
    /// del catálogo
    pub async fn trip_cost(&self, request: TripCostRequest) -> AppResult<TripCostResponse> {
        if request.distance_km <= Decimal::ZERO {
            return Err(AppError::BadRequest(
                "distance_km must be positive".to_string(),
            ));
        }

        let bundle = self.fuel.get_fuel_prices().await;
        let mut cost = trip_fuel_cost(
            &bundle,
            request.vehicle,
            request.fuel_type,
            request.distance_km,
        )
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "No local prices available for fuel type {:?}",
                request.fuel_type
            ))
        })?;

        if request.round_trip {
            cost = cost.round_trip();
        }

        let cost_market_usd = self.exchange.convert_syp_to_usd(cost.cost_market).await;

        Ok(TripCostResponse {
            vehicle: request.vehicle,
            fuel_type: request.fuel_type,
            distance_km: request.distance_km,
            round_trip: request.round_trip,
            cost,
            cost_market_usd,
        })
    }
}
