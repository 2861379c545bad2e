//! Servicios
//!
//! Este módulo contiene la lógica de negocio: resolución de rates
//! externos, motor de precios, geocoding y el feed de cambios.

pub mod delivery_feed;
pub mod exchange_rate_service;
pub mod fuel_price_service;
pub mod geocoding_service;
pub mod pricing_service;

pub use delivery_feed::{DeliveryEvent, DeliveryEventKind, DeliveryFeed};
pub use exchange_rate_service::{ExchangeRateService, RateSource, ResolvedRate};
pub use fuel_price_service::{trip_fuel_cost, FuelPriceService, OilPriceProvider};
pub use geocoding_service::GeocodingService;
pub use pricing_service::PricingService;
