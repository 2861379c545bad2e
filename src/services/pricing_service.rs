//! Motor de precios
//!
//! Calcula el precio base de una entrega a partir del tamaño del
//! paquete y la distancia, y reparte el ingreso entre plataforma y
//! conductor. Las tablas y el reparto viven en PricingConfig.

use rust_decimal::Decimal;

use crate::config::pricing::PricingConfig;
use crate::models::delivery::ParcelSize;

pub struct PricingService {
    config: PricingConfig,
}

impl PricingService {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Cotizar una entrega.
    ///
    /// Los paquetes custom llevan precio plano sin sensibilidad a la
    /// distancia: se cotizan manualmente fuera del sistema. Para el
    /// resto, `max(precio_por_km * distancia, precio_mínimo)`. Si el
    /// caller no da distancia se asume la distancia por defecto
    /// (flujo de alta sin mapa).
    pub fn quote(&self, parcel_size: ParcelSize, distance_km: Option<Decimal>) -> Decimal {
        if parcel_size == ParcelSize::Custom {
            return self.config.custom_flat_price;
        }

        let pricing = match self.config.sizes.get(&parcel_size) {
            Some(pricing) => pricing,
            None => return self.config.default_price,
        };

        let distance = distance_km.unwrap_or(self.config.default_distance_km);
        let candidate = pricing.base_price_per_km * distance;

        candidate.max(pricing.min_price)
    }

    /// Ganancia del conductor: floor(total * 0.70) con el reparto por
    /// defecto. Se calcula una sola vez al crear la entrega y no se
    /// recalcula después.
    pub fn driver_earnings(&self, total_price: Decimal) -> Decimal {
        (total_price * self.config.driver_share).floor()
    }
}

impl Default for PricingService {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_never_below_minimum() {
        let service = PricingService::default();
        for size in [
            ParcelSize::Small,
            ParcelSize::Medium,
            ParcelSize::Large,
            ParcelSize::ExtraLarge,
        ] {
            let min = service.config.sizes[&size].min_price;
            for km in [0i64, 1, 2, 5, 10, 100] {
                let quote = service.quote(size, Some(Decimal::from(km)));
                assert!(quote >= min, "{:?} at {} km quoted {} < {}", size, km, quote, min);
            }
        }
    }

    #[test]
    fn test_quote_scales_with_distance_above_minimum() {
        let service = PricingService::default();
        // small: 500/km, mínimo 2000 → a 10 km gana el cálculo por distancia
        assert_eq!(
            service.quote(ParcelSize::Small, Some(Decimal::from(10))),
            Decimal::from(5000)
        );
        // a 2 km manda el mínimo
        assert_eq!(
            service.quote(ParcelSize::Small, Some(Decimal::from(2))),
            Decimal::from(2000)
        );
    }

    #[test]
    fn test_custom_is_flat_regardless_of_distance() {
        let service = PricingService::default();
        let flat = service.quote(ParcelSize::Custom, Some(Decimal::from(1)));
        assert_eq!(flat, Decimal::from(10000));
        assert_eq!(service.quote(ParcelSize::Custom, Some(Decimal::from(500))), flat);
        assert_eq!(service.quote(ParcelSize::Custom, None), flat);
    }

    #[test]
    fn test_default_distance_applies_when_absent() {
        let service = PricingService::default();
        // medium: 750/km * 5 km = 3750 > mínimo 3000
        assert_eq!(service.quote(ParcelSize::Medium, None), Decimal::from(3750));
    }

    #[test]
    fn test_driver_earnings_is_floored_70_percent() {
        let service = PricingService::default();
        assert_eq!(
            service.driver_earnings(Decimal::from(10000)),
            Decimal::from(7000)
        );
        assert_eq!(
            service.driver_earnings(Decimal::from(10001)),
            Decimal::from(7000)
        );
        assert_eq!(service.driver_earnings(Decimal::ZERO), Decimal::ZERO);
        assert_eq!(service.driver_earnings(Decimal::from(1)), Decimal::ZERO);
    }
}
