//! Modelos de precios de combustible
//!
//! Este módulo contiene el bundle de precios de combustible resuelto
//! desde proveedores internacionales, la tabla local de precios
//! (subvencionado/mercado) y el catálogo de clases de vehículo.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::delivery::ParcelSize;

/// Tipo de combustible
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Diesel,
    Gasoline,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Diesel => "diesel",
            FuelType::Gasoline => "gasoline",
        }
    }
}

/// Clase de vehículo del catálogo estático
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    Car,
    SmallVan,
    MediumVan,
    LargeVan,
}

impl VehicleClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleClass::Car => "car",
            VehicleClass::SmallVan => "small_van",
            VehicleClass::MediumVan => "medium_van",
            VehicleClass::LargeVan => "large_van",
        }
    }
}

/// Entrada del catálogo de vehículos: consumo por km y capacidad de carga
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleInfo {
    pub class: VehicleClass,
    pub name: String,
    /// Litros por km
    pub gasoline_per_km: Decimal,
    /// Litros por km
    pub diesel_per_km: Decimal,
    pub payload_kg: u32,
    /// Tamaños de paquete para los que se recomienda esta clase
    pub recommended_for: Vec<ParcelSize>,
}

impl VehicleInfo {
    /// Consumo en litros/km para el tipo de combustible pedido
    pub fn consumption_per_km(&self, fuel: FuelType) -> Decimal {
        match fuel {
            FuelType::Diesel => self.diesel_per_km,
            FuelType::Gasoline => self.gasoline_per_km,
        }
    }
}

/// Precio local de un combustible: régimen dual subvencionado/mercado.
/// Ambos se mantienen en paralelo, nunca se fusionan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalFuelPrice {
    /// SYP por litro, precio subvencionado
    pub subsidized: Decimal,
    /// SYP por litro, precio de mercado
    pub market: Decimal,
}

/// Precios internacionales de referencia tal como los normalizan
/// los adaptadores de proveedor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternationalPrices {
    /// USD por barril
    pub wti_crude: Decimal,
    /// USD por barril
    pub brent_crude: Decimal,
    /// USD por galón
    pub gasoline_usd_gallon: Decimal,
    /// USD por galón
    pub diesel_usd_gallon: Decimal,
}

/// Bundle completo de precios de combustible que consume la UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelPriceBundle {
    pub international: InternationalPrices,
    /// Precio local equivalente derivado de los precios internacionales
    /// y el tipo de cambio actual (SYP por litro)
    pub international_equivalent: HashMap<FuelType, Decimal>,
    /// Precios locales reales (ground truth, no derivados)
    pub local: HashMap<FuelType, LocalFuelPrice>,
    pub vehicles: Vec<VehicleInfo>,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

impl FuelPriceBundle {
    pub fn vehicle(&self, class: VehicleClass) -> Option<&VehicleInfo> {
        self.vehicles.iter().find(|v| v.class == class)
    }
}

/// Estimación de coste de combustible para un trayecto.
/// Función pura de (bundle, vehículo, combustible, distancia).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripFuelCost {
    /// Litros necesarios para el trayecto
    pub fuel_needed: Decimal,
    pub cost_subsidized: Decimal,
    pub cost_market: Decimal,
    pub price_per_liter_subsidized: Decimal,
    pub price_per_liter_market: Decimal,
    pub consumption_per_km: Decimal,
}

impl TripFuelCost {
    /// Variante de ida y vuelta: duplica litros y costes, los precios
    /// por litro y el consumo no cambian
    pub fn round_trip(&self) -> TripFuelCost {
        let two = Decimal::from(2);
        TripFuelCost {
            fuel_needed: self.fuel_needed * two,
            cost_subsidized: self.cost_subsidized * two,
            cost_market: self.cost_market * two,
            price_per_liter_subsidized: self.price_per_liter_subsidized,
            price_per_liter_market: self.price_per_liter_market,
            consumption_per_km: self.consumption_per_km,
        }
    }
}
