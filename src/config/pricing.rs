//! Tablas de referencia de pricing y combustible
//!
//! Este módulo contiene las tablas estáticas de solo lectura que
//! alimentan el motor de precios: tabla de precios por tamaño de
//! paquete, catálogo de vehículos, precios locales de combustible
//! y los estimados internacionales de emergencia. Se cargan una vez
//! al arrancar el proceso y nunca mutan.

use lazy_static::lazy_static;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::delivery::ParcelSize;
use crate::models::fuel::{
    FuelType, InternationalPrices, LocalFuelPrice, VehicleClass, VehicleInfo,
};

/// Conversión galón → litro usada para el precio internacional equivalente
pub fn gallon_to_liters() -> Decimal {
    // 3.785
    Decimal::new(3785, 3)
}

/// Precios por tamaño de paquete
#[derive(Debug, Clone)]
pub struct SizePricing {
    /// SYP por km
    pub base_price_per_km: Decimal,
    /// Precio mínimo en SYP
    pub min_price: Decimal,
    /// Peso máximo admitido en kg
    pub max_weight_kg: Decimal,
}

/// Configuración del motor de precios.
/// El reparto 70/30 y la tabla de mínimos son configuración,
/// no lógica de negocio incrustada.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Precio plano para paquetes custom (se cotizan manualmente aparte)
    pub custom_flat_price: Decimal,
    /// Precio por defecto cuando el tamaño no tiene entrada en la tabla
    pub default_price: Decimal,
    /// Distancia asumida cuando el cliente no la proporciona (flujo sin mapa)
    pub default_distance_km: Decimal,
    /// Fracción del precio total que corresponde al conductor
    pub driver_share: Decimal,
    pub sizes: HashMap<ParcelSize, SizePricing>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        let mut sizes = HashMap::new();
        sizes.insert(
            ParcelSize::Small,
            SizePricing {
                base_price_per_km: Decimal::from(500),
                min_price: Decimal::from(2000),
                max_weight_kg: Decimal::from(1),
            },
        );
        sizes.insert(
            ParcelSize::Medium,
            SizePricing {
                base_price_per_km: Decimal::from(750),
                min_price: Decimal::from(3000),
                max_weight_kg: Decimal::from(5),
            },
        );
        sizes.insert(
            ParcelSize::Large,
            SizePricing {
                base_price_per_km: Decimal::from(1000),
                min_price: Decimal::from(5000),
                max_weight_kg: Decimal::from(15),
            },
        );
        sizes.insert(
            ParcelSize::ExtraLarge,
            SizePricing {
                base_price_per_km: Decimal::from(1500),
                min_price: Decimal::from(8000),
                max_weight_kg: Decimal::from(30),
            },
        );

        Self {
            custom_flat_price: Decimal::from(10000),
            default_price: Decimal::from(2000),
            default_distance_km: Decimal::from(5),
            driver_share: Decimal::new(70, 2), // 0.70
            sizes,
        }
    }
}

lazy_static! {
    /// Catálogo estático de clases de vehículo con consumos y capacidades
    pub static ref VEHICLE_CATALOG: Vec<VehicleInfo> = vec![
        VehicleInfo {
            class: VehicleClass::Car,
            name: "Sedan (Hyundai Accent)".to_string(),
            gasoline_per_km: Decimal::new(8, 2),  // 0.08 L/km
            diesel_per_km: Decimal::new(7, 2),    // 0.07 L/km
            payload_kg: 500,
            recommended_for: vec![ParcelSize::Small, ParcelSize::Medium],
        },
        VehicleInfo {
            class: VehicleClass::SmallVan,
            name: "Small van (Hyundai H100)".to_string(),
            gasoline_per_km: Decimal::new(11, 2), // 0.11 L/km
            diesel_per_km: Decimal::new(11, 2),   // 0.11 L/km
            payload_kg: 1000,
            recommended_for: vec![ParcelSize::Large],
        },
        VehicleInfo {
            class: VehicleClass::MediumVan,
            name: "Medium van (Kia Bongo)".to_string(),
            gasoline_per_km: Decimal::new(12, 2), // 0.12 L/km
            diesel_per_km: Decimal::new(12, 2),   // 0.12 L/km
            payload_kg: 1200,
            recommended_for: vec![ParcelSize::ExtraLarge],
        },
        VehicleInfo {
            class: VehicleClass::LargeVan,
            name: "Large van (Mercedes Sprinter)".to_string(),
            gasoline_per_km: Decimal::new(14, 2), // 0.14 L/km
            diesel_per_km: Decimal::new(13, 2),   // 0.13 L/km
            payload_kg: 1500,
            recommended_for: vec![ParcelSize::Custom],
        },
    ];

    /// Precios locales de combustible (SYP por litro).
    /// Ground truth del régimen dual subvencionado/mercado; no se derivan
    /// de los precios internacionales.
    pub static ref LOCAL_FUEL_PRICES: HashMap<FuelType, LocalFuelPrice> = {
        let mut m = HashMap::new();
        m.insert(FuelType::Diesel, LocalFuelPrice {
            subsidized: Decimal::from(1250),
            market: Decimal::from(3500),
        });
        m.insert(FuelType::Gasoline, LocalFuelPrice {
            subsidized: Decimal::from(1750),
            market: Decimal::from(4000),
        });
        m
    };
}

/// Estimado internacional usado cuando todos los proveedores fallan
pub fn fallback_international_prices() -> InternationalPrices {
    InternationalPrices {
        wti_crude: Decimal::new(7550, 2),          // 75.50 USD/barril
        brent_crude: Decimal::new(7920, 2),        // 79.20 USD/barril
        gasoline_usd_gallon: Decimal::new(345, 2), // 3.45 USD/galón
        diesel_usd_gallon: Decimal::new(385, 2),   // 3.85 USD/galón
    }
}

/// Buscar un vehículo del catálogo por clase
pub fn vehicle_info(class: VehicleClass) -> &'static VehicleInfo {
    VEHICLE_CATALOG
        .iter()
        .find(|v| v.class == class)
        .expect("vehicle catalog covers every VehicleClass variant")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_class() {
        for class in [
            VehicleClass::Car,
            VehicleClass::SmallVan,
            VehicleClass::MediumVan,
            VehicleClass::LargeVan,
        ] {
            assert_eq!(vehicle_info(class).class, class);
        }
    }

    #[test]
    fn test_local_prices_track_both_regimes() {
        for fuel in [FuelType::Diesel, FuelType::Gasoline] {
            let price = &LOCAL_FUEL_PRICES[&fuel];
            assert!(price.market > price.subsidized);
        }
    }

    #[test]
    fn test_default_pricing_reference_values() {
        let config = PricingConfig::default();
        assert_eq!(config.driver_share, Decimal::new(70, 2));
        assert_eq!(config.default_distance_km, Decimal::from(5));
        assert_eq!(
            config.sizes[&ParcelSize::Small].min_price,
            Decimal::from(2000)
        );
        assert_eq!(
            config.sizes[&ParcelSize::ExtraLarge].base_price_per_km,
            Decimal::from(1500)
        );
    }
}
