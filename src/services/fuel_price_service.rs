//! Servicio de precios de combustible
//!
//! Resuelve el bundle completo de precios de combustible: precios
//! internacionales de referencia (carrera concurrente entre
//! proveedores, gana el primero que responde), tabla local de precios
//! subvencionado/mercado, precio internacional equivalente derivado
//! del tipo de cambio, y catálogo de vehículos. Como el servicio de
//! tipo de cambio, nunca falla hacia afuera: si todo se cae,
//! sintetiza un bundle completo con los estimados hardcodeados.

use anyhow::{anyhow, Result};
use chrono::Utc;
use futures::future::select_ok;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::RateCache;
use crate::config::pricing::{
    fallback_international_prices, gallon_to_liters, LOCAL_FUEL_PRICES, VEHICLE_CATALOG,
};
use crate::models::fuel::{
    FuelPriceBundle, FuelType, InternationalPrices, TripFuelCost, VehicleClass,
};
use crate::services::exchange_rate_service::ExchangeRateService;

/// Proveedor de precios internacionales de petróleo. Cada adaptador
/// normaliza internamente el shape de su API; el contrato es solo
/// "devuelve benchmarks de crudo y precios por galón, o falla".
#[async_trait::async_trait]
pub trait OilPriceProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self) -> Result<InternationalPrices>;
}

/// Adaptador para APIs estilo oilpriceapi: objeto `data` con los
/// precios en campos con nombre
pub struct OilPriceApiProvider {
    client: reqwest::Client,
    url: String,
}

impl OilPriceApiProvider {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[derive(Debug, serde::Deserialize)]
struct OilPriceApiResponse {
    data: OilPriceApiData,
}

#[derive(Debug, serde::Deserialize)]
struct OilPriceApiData {
    wti_usd: f64,
    brent_usd: f64,
    gasoline_usd_gallon: f64,
    diesel_usd_gallon: f64,
}

#[async_trait::async_trait]
impl OilPriceProvider for OilPriceApiProvider {
    fn name(&self) -> &str {
        "oilpriceapi"
    }

    async fn fetch(&self) -> Result<InternationalPrices> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("oil price provider returned {}", response.status()));
        }

        let body: OilPriceApiResponse = response.json().await?;
        international_from_f64(
            body.data.wti_usd,
            body.data.brent_usd,
            body.data.gasoline_usd_gallon,
            body.data.diesel_usd_gallon,
        )
    }
}

/// Adaptador para APIs estilo commodities: mapa `rates` con símbolos
pub struct CommoditiesApiProvider {
    client: reqwest::Client,
    url: String,
}

impl CommoditiesApiProvider {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[derive(Debug, serde::Deserialize)]
struct CommoditiesApiResponse {
    data: CommoditiesApiData,
}

#[derive(Debug, serde::Deserialize)]
struct CommoditiesApiData {
    rates: HashMap<String, f64>,
}

#[async_trait::async_trait]
impl OilPriceProvider for CommoditiesApiProvider {
    fn name(&self) -> &str {
        "commodities-api"
    }

    async fn fetch(&self) -> Result<InternationalPrices> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("commodities provider returned {}", response.status()));
        }

        let body: CommoditiesApiResponse = response.json().await?;
        let rate = |symbol: &str| -> Result<f64> {
            body.data
                .rates
                .get(symbol)
                .copied()
                .ok_or_else(|| anyhow!("missing symbol {} in commodities payload", symbol))
        };

        international_from_f64(
            rate("WTIOIL")?,
            rate("BRENTOIL")?,
            rate("GASOLINE")?,
            rate("DIESEL")?,
        )
    }
}

fn international_from_f64(
    wti: f64,
    brent: f64,
    gasoline: f64,
    diesel: f64,
) -> Result<InternationalPrices> {
    let to_decimal = |value: f64, field: &str| -> Result<Decimal> {
        let d = Decimal::from_f64_retain(value)
            .ok_or_else(|| anyhow!("non-numeric {} in oil price payload", field))?;
        if d <= Decimal::ZERO {
            return Err(anyhow!("non-positive {} in oil price payload", field));
        }
        Ok(d)
    };

    Ok(InternationalPrices {
        wti_crude: to_decimal(wti, "wti_crude")?,
        brent_crude: to_decimal(brent, "brent_crude")?,
        gasoline_usd_gallon: to_decimal(gasoline, "gasoline_usd_gallon")?,
        diesel_usd_gallon: to_decimal(diesel, "diesel_usd_gallon")?,
    })
}

pub struct FuelPriceService {
    cache: Arc<RateCache<FuelPriceBundle>>,
    providers: Vec<Arc<dyn OilPriceProvider>>,
    exchange: Arc<ExchangeRateService>,
}

impl FuelPriceService {
    pub fn new(
        cache: Arc<RateCache<FuelPriceBundle>>,
        providers: Vec<Arc<dyn OilPriceProvider>>,
        exchange: Arc<ExchangeRateService>,
    ) -> Self {
        Self {
            cache,
            providers,
            exchange,
        }
    }

    /// Resolver el bundle de precios de combustible. Nunca devuelve error.
    pub async fn get_fuel_prices(&self) -> FuelPriceBundle {
        // 1. Cache fresco
        if let Some(bundle) = self.cache.read(false).await {
            return bundle;
        }

        // 2. Carrera concurrente entre proveedores: se usa el primero
        // que responde con éxito, el resto se descarta. Un proveedor
        // que falla no cancela la operación.
        let (international, source) = match self.race_providers().await {
            Some((name, prices)) => {
                log::info!("⛽ Precios internacionales obtenidos de {}", name);
                (prices, name)
            }
            None => {
                log::warn!("⚠️ Ningún proveedor de petróleo respondió, usando estimado fijo");
                (fallback_international_prices(), "fallback_estimate".to_string())
            }
        };

        // 3. Tipo de cambio actual (stale permitido, el resolver nunca falla)
        let rate = self.exchange.get_usd_rate().await.rate;

        // 4. Precio internacional equivalente por litro en SYP
        let liters = gallon_to_liters();
        let mut international_equivalent = HashMap::new();
        international_equivalent.insert(
            FuelType::Gasoline,
            international.gasoline_usd_gallon * liters * rate,
        );
        international_equivalent.insert(
            FuelType::Diesel,
            international.diesel_usd_gallon * liters * rate,
        );

        let bundle = FuelPriceBundle {
            international,
            international_equivalent,
            local: LOCAL_FUEL_PRICES.clone(),
            vehicles: VEHICLE_CATALOG.clone(),
            source,
            timestamp: Utc::now(),
        };

        self.cache.write(bundle.clone()).await;
        bundle
    }

    /// Lanzar todos los proveedores a la vez y quedarse con el primer
    /// éxito. Sin garantía de orden entre proveedores.
    async fn race_providers(&self) -> Option<(String, InternationalPrices)> {
        if self.providers.is_empty() {
            return None;
        }

        let futures: Vec<_> = self
            .providers
            .iter()
            .map(|provider| {
                let provider = provider.clone();
                Box::pin(async move {
                    let name = provider.name().to_string();
                    match provider.fetch().await {
                        Ok(prices) => Ok((name, prices)),
                        Err(e) => {
                            log::warn!("⚠️ Proveedor de petróleo '{}' falló: {}", name, e);
                            Err(e)
                        }
                    }
                })
            })
            .collect();

        match select_ok(futures).await {
            Ok((winner, _rest)) => Some(winner),
            Err(_) => None,
        }
    }

    /// Vaciar el cache. Solo para tests.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}

/// Coste de combustible para un trayecto de ida. Función pura, sin I/O.
///
/// Devuelve None si el bundle no tiene precios locales para el
/// combustible pedido.
pub fn trip_fuel_cost(
    bundle: &FuelPriceBundle,
    vehicle: VehicleClass,
    fuel: FuelType,
    distance_km: Decimal,
) -> Option<TripFuelCost> {
    let vehicle = bundle.vehicle(vehicle)?;
    let local = bundle.local.get(&fuel)?;

    let consumption = vehicle.consumption_per_km(fuel);
    let fuel_needed = consumption * distance_km;

    Some(TripFuelCost {
        fuel_needed,
        cost_subsidized: fuel_needed * local.subsidized,
        cost_market: fuel_needed * local.market,
        price_per_liter_subsidized: local.subsidized,
        price_per_liter_market: local.market,
        consumption_per_km: consumption,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    struct StaticProvider {
        name: &'static str,
        prices: InternationalPrices,
    }

    #[async_trait::async_trait]
    impl OilPriceProvider for StaticProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch(&self) -> Result<InternationalPrices> {
            Ok(self.prices.clone())
        }
    }

    struct FailingProvider;

    #[async_trait::async_trait]
    impl OilPriceProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch(&self) -> Result<InternationalPrices> {
            Err(anyhow!("provider down"))
        }
    }

    fn exchange_with_constant() -> Arc<ExchangeRateService> {
        Arc::new(ExchangeRateService::new(
            reqwest::Client::new(),
            Arc::new(RateCache::new("test:fuel:exchange", Duration::hours(1))),
            "http://127.0.0.1:1/primary".to_string(),
            "http://127.0.0.1:1/fallback".to_string(),
            Decimal::from(15000),
        ))
    }

    fn service(providers: Vec<Arc<dyn OilPriceProvider>>) -> FuelPriceService {
        FuelPriceService::new(
            Arc::new(RateCache::new("test:fuel_prices", Duration::hours(1))),
            providers,
            exchange_with_constant(),
        )
    }

    fn reference_bundle() -> FuelPriceBundle {
        FuelPriceBundle {
            international: fallback_international_prices(),
            international_equivalent: HashMap::new(),
            local: LOCAL_FUEL_PRICES.clone(),
            vehicles: VEHICLE_CATALOG.clone(),
            source: "test".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_trip_cost_reference_case() {
        // small_van diesel: 0.11 L/km, 10 km, subvencionado 1250 SYP/L
        let bundle = reference_bundle();
        let cost = trip_fuel_cost(
            &bundle,
            VehicleClass::SmallVan,
            FuelType::Diesel,
            Decimal::from(10),
        )
        .unwrap();

        assert_eq!(cost.fuel_needed, Decimal::new(110, 2)); // 1.1 L
        assert_eq!(cost.cost_subsidized, Decimal::new(137500, 2)); // 1375 SYP
        assert_eq!(cost.cost_market, Decimal::new(385000, 2)); // 3850 SYP
        assert_eq!(cost.consumption_per_km, Decimal::new(11, 2));
    }

    #[test]
    fn test_round_trip_doubles_fuel_and_costs_only() {
        let bundle = reference_bundle();
        let one_way = trip_fuel_cost(
            &bundle,
            VehicleClass::SmallVan,
            FuelType::Diesel,
            Decimal::from(10),
        )
        .unwrap();
        let round = one_way.round_trip();

        assert_eq!(round.fuel_needed, Decimal::new(220, 2)); // 2.2 L
        assert_eq!(round.cost_subsidized, Decimal::new(275000, 2)); // 2750 SYP
        assert_eq!(round.price_per_liter_subsidized, one_way.price_per_liter_subsidized);
        assert_eq!(round.consumption_per_km, one_way.consumption_per_km);
    }

    #[test]
    fn test_trip_cost_missing_fuel_type_is_absent() {
        let mut bundle = reference_bundle();
        bundle.local.remove(&FuelType::Gasoline);

        let cost = trip_fuel_cost(
            &bundle,
            VehicleClass::Car,
            FuelType::Gasoline,
            Decimal::from(10),
        );
        assert!(cost.is_none());
    }

    #[tokio::test]
    async fn test_never_fails_synthesizes_full_bundle() {
        let service = service(vec![Arc::new(FailingProvider)]);
        let bundle = service.get_fuel_prices().await;

        assert_eq!(bundle.source, "fallback_estimate");
        assert_eq!(bundle.international.wti_crude, Decimal::new(7550, 2));
        assert!(bundle.local.contains_key(&FuelType::Diesel));
        assert!(!bundle.vehicles.is_empty());
        // Equivalente internacional derivado con la constante 15000:
        // 3.45 * 3.785 * 15000 = 195873.75 para gasolina
        let equivalent = bundle.international_equivalent[&FuelType::Gasoline];
        assert_eq!(equivalent, Decimal::new(19587375, 2));
    }

    #[tokio::test]
    async fn test_first_successful_provider_wins_race() {
        let prices = InternationalPrices {
            wti_crude: Decimal::new(8000, 2),
            brent_crude: Decimal::new(8300, 2),
            gasoline_usd_gallon: Decimal::new(360, 2),
            diesel_usd_gallon: Decimal::new(400, 2),
        };
        let service = service(vec![
            Arc::new(FailingProvider),
            Arc::new(StaticProvider {
                name: "static",
                prices: prices.clone(),
            }),
        ]);

        let bundle = service.get_fuel_prices().await;
        assert_eq!(bundle.source, "static");
        assert_eq!(bundle.international.wti_crude, prices.wti_crude);
    }

    #[tokio::test]
    async fn test_resolved_bundle_is_cached() {
        let service = service(vec![Arc::new(FailingProvider)]);
        let first = service.get_fuel_prices().await;
        let second = service.get_fuel_prices().await;

        // La segunda lectura sale del cache: mismo timestamp
        assert_eq!(first.timestamp, second.timestamp);
    }
}
