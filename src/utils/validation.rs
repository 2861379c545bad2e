//! Utilidades de validación
//!
//! Validación del formulario de alta de entregas. Devuelve un mapa
//! campo→mensaje que se entrega tal cual al cliente antes de tocar
//! la persistencia; nunca un panic.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

use crate::dto::delivery_dto::CreateDeliveryRequest;
use crate::utils::errors::{AppError, AppResult};

const MIN_ADDRESS_LEN: usize = 5;

lazy_static! {
    /// Teléfonos sirios: +963 seguido de 9 dígitos
    static ref SYRIAN_PHONE: Regex = Regex::new(r"^\+963\d{9}$").expect("valid phone regex");
}

/// Validar el formulario de creación de entrega.
/// Mapa vacío = formulario válido.
pub fn validate_delivery_form(request: &CreateDeliveryRequest) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    if request.parcel_size.is_none() {
        errors.insert(
            "parcel_size".to_string(),
            "Parcel size is required".to_string(),
        );
    }

    if request.delivery_mode.is_none() {
        errors.insert(
            "delivery_mode".to_string(),
            "Delivery mode is required".to_string(),
        );
    }

    if request.pickup_address.trim().chars().count() < MIN_ADDRESS_LEN {
        errors.insert(
            "pickup_address".to_string(),
            "Pickup address is required (at least 5 characters)".to_string(),
        );
    }

    if request.delivery_address.trim().chars().count() < MIN_ADDRESS_LEN {
        errors.insert(
            "delivery_address".to_string(),
            "Delivery address is required (at least 5 characters)".to_string(),
        );
    }

    errors
}

/// Validar y convertir el mapa en error de aplicación
pub fn ensure_valid_delivery_form(request: &CreateDeliveryRequest) -> AppResult<()> {
    let errors = validate_delivery_form(request);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationMap(errors))
    }
}

/// Validar formato de teléfono sirio
pub fn is_valid_phone(phone: &str) -> bool {
    SYRIAN_PHONE.is_match(phone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::delivery::{DeliveryMode, ParcelSize};

    fn valid_request() -> CreateDeliveryRequest {
        CreateDeliveryRequest {
            sender_id: uuid::Uuid::new_v4(),
            recipient_id: None,
            parcel_size: Some(ParcelSize::Medium),
            delivery_mode: Some(DeliveryMode::DoorToDoor),
            pickup_address: "Bab Tuma, Damascus".to_string(),
            delivery_address: "Mezzeh, Damascus".to_string(),
            pickup_lat: None,
            pickup_lon: None,
            delivery_lat: None,
            delivery_lon: None,
            distance_km: None,
            description: None,
            pickup_instructions: None,
            delivery_instructions: None,
        }
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        assert!(validate_delivery_form(&valid_request()).is_empty());
    }

    #[test]
    fn test_missing_fields_are_reported_per_field() {
        let mut request = valid_request();
        request.parcel_size = None;
        request.delivery_mode = None;
        request.pickup_address = "x".to_string();
        request.delivery_address = "  ab  ".to_string();

        let errors = validate_delivery_form(&request);
        assert_eq!(errors.len(), 4);
        assert!(errors.contains_key("parcel_size"));
        assert!(errors.contains_key("delivery_mode"));
        assert!(errors.contains_key("pickup_address"));
        assert!(errors.contains_key("delivery_address"));
    }

    #[test]
    fn test_address_length_counts_trimmed_chars() {
        let mut request = valid_request();
        request.pickup_address = "  abcde  ".to_string();
        assert!(validate_delivery_form(&request).is_empty());
    }

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_phone("+963991234567"));
        assert!(!is_valid_phone("0991234567"));
        assert!(!is_valid_phone("+96399123456"));
        assert!(!is_valid_phone("+963 991 234 567"));
    }
}
