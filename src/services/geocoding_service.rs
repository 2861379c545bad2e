//! Servicio de geocoding
//!
//! Búsqueda directa e inversa de direcciones contra Nominatim.
//! Se usa para obtener coordenadas y distancias de entrada al motor
//! de precios; el proveedor de mapas no forma parte del core.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Candidato de dirección normalizado para la UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingCandidate {
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
    pub address: AddressParts,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressParts {
    pub city: String,
    pub road: String,
    pub house_number: String,
    pub suburb: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    road: Option<String>,
    house_number: Option<String>,
    suburb: Option<String>,
    state: Option<String>,
}

pub struct GeocodingService {
    client: reqwest::Client,
    base_url: String,
}

impl GeocodingService {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Buscar candidatos para una dirección de texto libre
    pub async fn search_address(&self, query: &str) -> Result<Vec<GeocodingCandidate>> {
        log::info!("🗺️ Geocoding address: {}", query);

        let url = format!(
            "{}/search?format=json&q={}&limit=5&addressdetails=1&countrycodes=sy",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "TawsilBackend/1.0")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("geocoding search failed: {}", response.status()));
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        let candidates = places
            .into_iter()
            .filter_map(|place| place_to_candidate(place).ok())
            .collect();

        Ok(candidates)
    }

    /// Resolver coordenadas a una dirección
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<GeocodingCandidate> {
        log::info!("🗺️ Reverse geocoding ({}, {})", lat, lon);

        let url = format!(
            "{}/reverse?format=json&lat={}&lon={}&addressdetails=1",
            self.base_url, lat, lon
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "TawsilBackend/1.0")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("reverse geocoding failed: {}", response.status()));
        }

        let place: NominatimPlace = response.json().await?;
        place_to_candidate(place)
    }
}

fn place_to_candidate(place: NominatimPlace) -> Result<GeocodingCandidate> {
    let lat: f64 = place
        .lat
        .parse()
        .map_err(|_| anyhow!("non-numeric latitude in geocoding response"))?;
    let lon: f64 = place
        .lon
        .parse()
        .map_err(|_| anyhow!("non-numeric longitude in geocoding response"))?;

    let addr = place.address.unwrap_or_default();
    let city = addr
        .city
        .or(addr.town)
        .or(addr.village)
        .unwrap_or_default();

    Ok(GeocodingCandidate {
        display_name: place.display_name,
        lat,
        lon,
        address: AddressParts {
            city,
            road: addr.road.unwrap_or_default(),
            house_number: addr.house_number.unwrap_or_default(),
            suburb: addr.suburb.unwrap_or_default(),
            state: addr.state.unwrap_or_default(),
        },
    })
}

/// Formatear una dirección para mostrar: número, calle, barrio, ciudad
pub fn format_address_for_display(candidate: &GeocodingCandidate) -> String {
    let parts: Vec<&str> = [
        candidate.address.house_number.as_str(),
        candidate.address.road.as_str(),
        candidate.address.suburb.as_str(),
        candidate.address.city.as_str(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect();

    if parts.is_empty() {
        candidate.display_name.clone()
    } else {
        parts.join(", ")
    }
}

/// Distancia haversine en km entre dos coordenadas
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_zero_distance() {
        assert!(haversine_distance_km(33.5138, 36.2765, 33.5138, 36.2765) < 1e-9);
    }

    #[test]
    fn test_haversine_damascus_to_aleppo() {
        // Damasco (33.5138, 36.2765) a Alepo (36.2021, 37.1343): ~310 km
        let d = haversine_distance_km(33.5138, 36.2765, 36.2021, 37.1343);
        assert!(d > 290.0 && d < 330.0, "distance {}", d);
    }

    #[test]
    fn test_format_address_prefers_structured_parts() {
        let candidate = GeocodingCandidate {
            display_name: "fallback".to_string(),
            lat: 0.0,
            lon: 0.0,
            address: AddressParts {
                city: "Damascus".to_string(),
                road: "Straight Street".to_string(),
                house_number: "12".to_string(),
                suburb: "Bab Tuma".to_string(),
                state: String::new(),
            },
        };
        assert_eq!(
            format_address_for_display(&candidate),
            "12, Straight Street, Bab Tuma, Damascus"
        );
    }

    #[test]
    fn test_format_address_falls_back_to_display_name() {
        let candidate = GeocodingCandidate {
            display_name: "somewhere in Syria".to_string(),
            lat: 0.0,
            lon: 0.0,
            address: AddressParts::default(),
        };
        assert_eq!(format_address_for_display(&candidate), "somewhere in Syria");
    }
}
