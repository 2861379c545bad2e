//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de
//! configuración. Todos los valores tienen defaults razonables para
//! desarrollo; producción los sobreescribe vía .env.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    // URLs de proveedores de tipo de cambio (prioridad: primario, secundario)
    pub exchange_primary_url: String,
    pub exchange_fallback_url: String,
    // URLs de proveedores de precios de petróleo
    pub oil_price_urls: Vec<String>,
    // URL base de Nominatim para geocoding
    pub nominatim_base_url: String,
    /// Tipo de cambio SYP/USD usado cuando todos los proveedores fallan
    pub fallback_exchange_rate: i64,
    /// TTL del cache de rates en segundos
    pub rate_cache_ttl_secs: u64,
    /// Timeout de llamadas a proveedores externos en segundos
    pub provider_timeout_secs: u64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            exchange_primary_url: env::var("EXCHANGE_PRIMARY_URL")
                .unwrap_or_else(|_| "https://api.exchangerate-api.com/v4/latest".to_string()),
            exchange_fallback_url: env::var("EXCHANGE_FALLBACK_URL")
                .unwrap_or_else(|_| "https://open.er-api.com/v6/latest".to_string()),
            oil_price_urls: env::var("OIL_PRICE_URLS")
                .unwrap_or_else(|_| {
                    "https://api.oilpriceapi.com/v1/prices/latest,https://commodities-api.com/api/latest"
                        .to_string()
                })
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            nominatim_base_url: env::var("NOMINATIM_BASE_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            fallback_exchange_rate: env::var("FALLBACK_EXCHANGE_RATE")
                .unwrap_or_else(|_| "15000".to_string())
                .parse()
                .expect("FALLBACK_EXCHANGE_RATE must be a valid number"),
            rate_cache_ttl_secs: env::var("RATE_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .expect("RATE_CACHE_TTL_SECS must be a valid number"),
            provider_timeout_secs: env::var("PROVIDER_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("PROVIDER_TIMEOUT_SECS must be a valid number"),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
