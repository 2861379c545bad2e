//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se
//! pasa a través del router de Axum: pool de Postgres, servicios de
//! rates y geocoding, y el feed de cambios de entregas.

use reqwest::Client;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;

use crate::cache::redis_client::RedisClient;
use crate::cache::{BlobStore, RateCache};
use crate::config::environment::EnvironmentConfig;
use crate::services::delivery_feed::DeliveryFeed;
use crate::services::exchange_rate_service::ExchangeRateService;
use crate::services::fuel_price_service::{
    CommoditiesApiProvider, FuelPriceService, OilPriceApiProvider, OilPriceProvider,
};
use crate::services::geocoding_service::GeocodingService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub redis: RedisClient,
    pub http_client: Client,
    pub exchange: Arc<ExchangeRateService>,
    pub fuel: Arc<FuelPriceService>,
    pub geocoding: Arc<GeocodingService>,
    pub feed: DeliveryFeed,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        config: EnvironmentConfig,
        redis: RedisClient,
        http_client: Client,
    ) -> Self {
        let ttl = chrono::Duration::seconds(config.rate_cache_ttl_secs as i64);
        let store: Arc<dyn BlobStore + Send + Sync> = Arc::new(redis.clone());

        let exchange_cache = Arc::new(RateCache::with_store(
            &RedisClient::make_key("exchange_rate"),
            ttl,
            store.clone(),
        ));
        let exchange = Arc::new(ExchangeRateService::new(
            http_client.clone(),
            exchange_cache,
            config.exchange_primary_url.clone(),
            config.exchange_fallback_url.clone(),
            Decimal::from(config.fallback_exchange_rate),
        ));

        let fuel_cache = Arc::new(RateCache::with_store(
            &RedisClient::make_key("fuel_prices"),
            ttl,
            store,
        ));
        let providers = build_oil_providers(&http_client, &config.oil_price_urls);
        let fuel = Arc::new(FuelPriceService::new(fuel_cache, providers, exchange.clone()));

        let geocoding = Arc::new(GeocodingService::new(
            http_client.clone(),
            config.nominatim_base_url.clone(),
        ));

        Self {
            pool,
            config,
            redis,
            http_client,
            exchange,
            fuel,
            geocoding,
            feed: DeliveryFeed::new(),
        }
    }
}

/// Instanciar el adaptador correcto para cada URL de proveedor de
/// petróleo configurada. El shape del payload va ligado al host.
fn build_oil_providers(
    client: &Client,
    urls: &[String],
) -> Vec<Arc<dyn OilPriceProvider>> {
    urls.iter()
        .map(|url| -> Arc<dyn OilPriceProvider> {
            if url.contains("commodities") {
                Arc::new(CommoditiesApiProvider::new(client.clone(), url.clone()))
            } else {
                Arc::new(OilPriceApiProvider::new(client.clone(), url.clone()))
            }
        })
        .collect()
}
