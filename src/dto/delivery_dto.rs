//! DTOs de entregas
//!
//! Requests y responses de la API de entregas.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::delivery::{Delivery, DeliveryMode, DeliveryStatus, ParcelSize};

/// Request para crear una entrega.
///
/// parcel_size y delivery_mode son Option para que la validación de
/// formulario los reporte en el mapa campo→mensaje en lugar de fallar
/// en la deserialización.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDeliveryRequest {
    pub sender_id: Uuid,
    pub recipient_id: Option<Uuid>,
    pub parcel_size: Option<ParcelSize>,
    pub delivery_mode: Option<DeliveryMode>,
    pub pickup_address: String,
    pub delivery_address: String,
    pub pickup_lat: Option<f64>,
    pub pickup_lon: Option<f64>,
    pub delivery_lat: Option<f64>,
    pub delivery_lon: Option<f64>,
    /// Distancia en km; si falta y hay coordenadas se calcula con
    /// haversine, y si tampoco hay coordenadas se asume la distancia
    /// por defecto del motor de precios
    pub distance_km: Option<Decimal>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub pickup_instructions: Option<String>,
    #[validate(length(max = 500))]
    pub delivery_instructions: Option<String>,
}

/// Request de aceptación por parte de un conductor
#[derive(Debug, Deserialize)]
pub struct AcceptDeliveryRequest {
    pub driver_id: Uuid,
}

/// Request para avanzar el estado de una entrega
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: DeliveryStatus,
    /// Quién dispara la transición; las posteriores a assigned son
    /// exclusivas del conductor asignado
    pub actor_id: Uuid,
}

/// Filtros del listado de entregas
#[derive(Debug, Default, Deserialize)]
pub struct DeliveryFilters {
    pub status: Option<DeliveryStatus>,
    pub driver_id: Option<Uuid>,
    pub sender_id: Option<Uuid>,
}

/// Request de cotización (sin persistencia)
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub parcel_size: ParcelSize,
    pub distance_km: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub total_price: Decimal,
    pub driver_earnings: Decimal,
    pub currency: String,
}

/// Response de entrega para la API
#[derive(Debug, Serialize)]
pub struct DeliveryResponse {
    pub id: Uuid,
    pub delivery_code: String,
    pub sender_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub recipient_id: Option<Uuid>,
    pub parcel_size: ParcelSize,
    pub delivery_mode: DeliveryMode,
    pub pickup_address: String,
    pub delivery_address: String,
    pub pickup_lat: Option<f64>,
    pub pickup_lon: Option<f64>,
    pub delivery_lat: Option<f64>,
    pub delivery_lon: Option<f64>,
    pub description: Option<String>,
    pub pickup_instructions: Option<String>,
    pub delivery_instructions: Option<String>,
    pub base_price: Decimal,
    pub total_price: Decimal,
    pub driver_earnings: Decimal,
    pub status: DeliveryStatus,
    pub status_label: &'static str,
    pub status_color: &'static str,
    pub created_at: DateTime<Utc>,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl From<Delivery> for DeliveryResponse {
    fn from(delivery: Delivery) -> Self {
        Self {
            status_label: delivery.status.label(),
            status_color: delivery.status.color(),
            id: delivery.id,
            delivery_code: delivery.delivery_code,
            sender_id: delivery.sender_id,
            driver_id: delivery.driver_id,
            recipient_id: delivery.recipient_id,
            parcel_size: delivery.parcel_size,
            delivery_mode: delivery.delivery_mode,
            pickup_address: delivery.pickup_address,
            delivery_address: delivery.delivery_address,
            pickup_lat: delivery.pickup_lat,
            pickup_lon: delivery.pickup_lon,
            delivery_lat: delivery.delivery_lat,
            delivery_lon: delivery.delivery_lon,
            description: delivery.description,
            pickup_instructions: delivery.pickup_instructions,
            delivery_instructions: delivery.delivery_instructions,
            base_price: delivery.base_price,
            total_price: delivery.total_price,
            driver_earnings: delivery.driver_earnings,
            status: delivery.status,
            created_at: delivery.created_at,
            picked_up_at: delivery.picked_up_at,
            delivered_at: delivery.delivered_at,
        }
    }
}

/// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            data: None,
        }
    }
}
