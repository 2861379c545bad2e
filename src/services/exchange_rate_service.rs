//! Servicio de tipo de cambio
//!
//! Resuelve el tipo de cambio USD→SYP con fallback ordenado:
//! cache fresco → proveedor primario → proveedor secundario → cache
//! stale → constante hardcodeada. El servicio nunca falla hacia
//! afuera: todo el código de pricing y display asume que siempre hay
//! un rate disponible, aunque sea aproximado.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::RateCache;

/// Procedencia del rate resuelto
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// Lectura fresca del cache
    Cached,
    /// Respuesta directa de un proveedor
    Provider(String),
    /// Cache expirado usado como último valor conocido
    StaleCache,
    /// Constante de emergencia
    Fallback,
}

/// Rate resuelto con su procedencia
#[derive(Debug, Clone, serde::Serialize)]
pub struct ResolvedRate {
    /// SYP por 1 USD
    pub rate: Decimal,
    pub source: RateSource,
}

/// Respuesta de los proveedores de tipo de cambio: ambos devuelven
/// un mapa de código de moneda a rate sobre la moneda base
#[derive(Debug, Deserialize)]
struct ExchangeRateResponse {
    rates: HashMap<String, f64>,
}

pub struct ExchangeRateService {
    client: reqwest::Client,
    cache: Arc<RateCache<Decimal>>,
    primary_url: String,
    fallback_url: String,
    fallback_rate: Decimal,
}

impl ExchangeRateService {
    pub fn new(
        client: reqwest::Client,
        cache: Arc<RateCache<Decimal>>,
        primary_url: String,
        fallback_url: String,
        fallback_rate: Decimal,
    ) -> Self {
        Self {
            client,
            cache,
            primary_url,
            fallback_url,
            fallback_rate,
        }
    }

    /// Resolver el tipo de cambio USD→SYP. Nunca devuelve error.
    pub async fn get_usd_rate(&self) -> ResolvedRate {
        // 1. Cache fresco
        if let Some(rate) = self.cache.read(false).await {
            return ResolvedRate {
                rate,
                source: RateSource::Cached,
            };
        }

        // 2. Proveedores en orden de prioridad; cada fallo se traga y
        // se loguea, nunca aborta la resolución
        for (name, base_url) in [
            ("primary", &self.primary_url),
            ("fallback", &self.fallback_url),
        ] {
            match self.fetch_rate(base_url).await {
                Some(rate) => {
                    log::info!("💱 Rate USD→SYP obtenido de proveedor {}: {}", name, rate);
                    self.cache.write(rate).await;
                    return ResolvedRate {
                        rate,
                        source: RateSource::Provider(name.to_string()),
                    };
                }
                None => {
                    log::warn!("⚠️ Proveedor de tipo de cambio '{}' falló", name);
                }
            }
        }

        // 3. Último valor conocido, aunque esté expirado
        if let Some(rate) = self.cache.read(true).await {
            log::warn!("⚠️ Usando rate stale del cache: {}", rate);
            return ResolvedRate {
                rate,
                source: RateSource::StaleCache,
            };
        }

        // 4. Constante de emergencia; se cachea igual que un rate real
        log::warn!(
            "⚠️ Todos los proveedores de tipo de cambio fallaron, usando constante {}",
            self.fallback_rate
        );
        self.cache.write(self.fallback_rate).await;
        ResolvedRate {
            rate: self.fallback_rate,
            source: RateSource::Fallback,
        }
    }

    /// Convertir un monto SYP a USD con el último rate conocido
    /// (stale permitido, es solo para display)
    pub async fn convert_syp_to_usd(&self, syp_amount: Decimal) -> Option<Decimal> {
        let rate = self.cache.read(true).await?;
        if rate <= Decimal::ZERO {
            return None;
        }
        Some(syp_amount / rate)
    }

    /// Llamar a un proveedor y extraer el rate SYP. Cualquier fallo
    /// (red, status, payload malformado, rate no positivo) es None.
    async fn fetch_rate(&self, base_url: &str) -> Option<Decimal> {
        let url = format!("{}/USD", base_url);

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                log::warn!("⚠️ Error de red consultando {}: {}", url, e);
                return None;
            }
        };

        if !response.status().is_success() {
            log::warn!("⚠️ Proveedor {} respondió {}", url, response.status());
            return None;
        }

        let body: ExchangeRateResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                log::warn!("⚠️ Payload malformado de {}: {}", url, e);
                return None;
            }
        };

        let raw = body.rates.get("SYP").copied()?;
        let rate = Decimal::from_f64_retain(raw)?;

        if rate > Decimal::ZERO {
            Some(rate)
        } else {
            None
        }
    }

    /// Fijar un rate manualmente. Solo para desarrollo y tests.
    pub async fn set_test_rate(&self, rate: Decimal) {
        self.cache.write(rate).await;
    }

    /// Vaciar el cache. Solo para tests.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn unreachable_service(ttl: Duration) -> ExchangeRateService {
        // Puerto 1 local: la conexión se rechaza de inmediato, sin red externa
        ExchangeRateService::new(
            reqwest::Client::new(),
            Arc::new(RateCache::new("test:exchange_rate", ttl)),
            "http://127.0.0.1:1/primary".to_string(),
            "http://127.0.0.1:1/fallback".to_string(),
            Decimal::from(15000),
        )
    }

    #[tokio::test]
    async fn test_never_fails_returns_hardcoded_constant() {
        let service = unreachable_service(Duration::hours(1));
        let resolved = service.get_usd_rate().await;

        assert_eq!(resolved.rate, Decimal::from(15000));
        assert_eq!(resolved.source, RateSource::Fallback);
    }

    #[tokio::test]
    async fn test_fallback_constant_is_cached() {
        let service = unreachable_service(Duration::hours(1));
        let _ = service.get_usd_rate().await;

        // La segunda resolución sale del cache sin tocar proveedores
        let resolved = service.get_usd_rate().await;
        assert_eq!(resolved.source, RateSource::Cached);
        assert_eq!(resolved.rate, Decimal::from(15000));
    }

    #[tokio::test]
    async fn test_fresh_cache_hit_short_circuits() {
        let service = unreachable_service(Duration::hours(1));
        service.set_test_rate(Decimal::from(14250)).await;

        let resolved = service.get_usd_rate().await;
        assert_eq!(resolved.rate, Decimal::from(14250));
        assert_eq!(resolved.source, RateSource::Cached);
    }

    #[tokio::test]
    async fn test_stale_cache_preferred_over_constant() {
        // TTL cero: el valor escrito queda stale de inmediato
        let service = unreachable_service(Duration::zero());
        service.set_test_rate(Decimal::from(14000)).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let resolved = service.get_usd_rate().await;
        assert_eq!(resolved.rate, Decimal::from(14000));
        assert_eq!(resolved.source, RateSource::StaleCache);
    }

    #[tokio::test]
    async fn test_convert_syp_to_usd_uses_stale_rate() {
        let service = unreachable_service(Duration::zero());
        assert_eq!(service.convert_syp_to_usd(Decimal::from(30000)).await, None);

        service.set_test_rate(Decimal::from(15000)).await;
        let usd = service.convert_syp_to_usd(Decimal::from(30000)).await;
        assert_eq!(usd, Some(Decimal::from(2)));
    }
}
