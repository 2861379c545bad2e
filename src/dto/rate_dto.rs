//! DTOs de rates y combustible

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::fuel::{FuelType, TripFuelCost, VehicleClass};
use crate::services::exchange_rate_service::RateSource;

/// Response del tipo de cambio resuelto
#[derive(Debug, Serialize)]
pub struct ExchangeRateResponse {
    /// SYP por 1 USD
    pub rate: Decimal,
    pub source: RateSource,
}

/// Request de estimación de coste de combustible para un trayecto
#[derive(Debug, Deserialize)]
pub struct TripCostRequest {
    pub vehicle: VehicleClass,
    pub fuel_type: FuelType,
    pub distance_km: Decimal,
    #[serde(default)]
    pub round_trip: bool,
}

#[derive(Debug, Serialize)]
pub struct TripCostResponse {
    pub vehicle: VehicleClass,
    pub fuel_type: FuelType,
    pub distance_km: Decimal,
    pub round_trip: bool,
    #[serde(flatten)]
    pub cost: TripFuelCost,
    /// Coste de mercado convertido a USD con el último rate conocido,
    /// si hay alguno
    pub cost_market_usd: Option<Decimal>,
}
