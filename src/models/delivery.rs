//! Modelo de Delivery
//!
//! Este módulo contiene el struct Delivery, los enums del dominio
//! (estado, tamaño de paquete, modo de entrega) y las reglas puras
//! de transición del ciclo de vida. Mapea exactamente al schema
//! PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la entrega - mapea al ENUM delivery_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "delivery_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    Assigned,
    PickedUp,
    InTransit,
    Delivered,
    Cancelled,
    Failed,
}

impl DeliveryStatus {
    /// Estados terminales: no admiten más transiciones
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeliveryStatus::Delivered | DeliveryStatus::Cancelled | DeliveryStatus::Failed
        )
    }

    /// Reglas de transición del ciclo de vida.
    ///
    /// pending → assigned → picked_up → in_transit → delivered,
    /// y cancelled/failed alcanzables desde cualquier estado no terminal.
    pub fn can_transition(&self, next: DeliveryStatus) -> bool {
        use DeliveryStatus::*;
        match (self, next) {
            (Pending, Assigned) => true,
            (Assigned, PickedUp) => true,
            (PickedUp, InTransit) => true,
            (InTransit, Delivered) => true,
            (from, Cancelled) | (from, Failed) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Las transiciones posteriores a `assigned` son exclusivas del
    /// conductor asignado a la entrega
    pub fn requires_assigned_driver(&self) -> bool {
        matches!(
            self,
            DeliveryStatus::PickedUp | DeliveryStatus::InTransit | DeliveryStatus::Delivered
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Assigned => "assigned",
            DeliveryStatus::PickedUp => "picked_up",
            DeliveryStatus::InTransit => "in_transit",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Cancelled => "cancelled",
            DeliveryStatus::Failed => "failed",
        }
    }

    /// Etiqueta legible para listados
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "Pending",
            DeliveryStatus::Assigned => "Assigned",
            DeliveryStatus::PickedUp => "Picked up",
            DeliveryStatus::InTransit => "In transit",
            DeliveryStatus::Delivered => "Delivered",
            DeliveryStatus::Cancelled => "Cancelled",
            DeliveryStatus::Failed => "Failed",
        }
    }

    /// Color hex para la UI de listados
    pub fn color(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "#f39c12",
            DeliveryStatus::Assigned => "#3498db",
            DeliveryStatus::PickedUp => "#9b59b6",
            DeliveryStatus::InTransit => "#e67e22",
            DeliveryStatus::Delivered => "#27ae60",
            DeliveryStatus::Cancelled => "#e74c3c",
            DeliveryStatus::Failed => "#e74c3c",
        }
    }
}

/// Tamaño del paquete - mapea al ENUM parcel_size
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "parcel_size", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ParcelSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
    Custom,
}

impl ParcelSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParcelSize::Small => "small",
            ParcelSize::Medium => "medium",
            ParcelSize::Large => "large",
            ParcelSize::ExtraLarge => "extra_large",
            ParcelSize::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ParcelSize::Small => "Small",
            ParcelSize::Medium => "Medium",
            ParcelSize::Large => "Large",
            ParcelSize::ExtraLarge => "Extra large",
            ParcelSize::Custom => "Custom",
        }
    }
}

/// Modo de entrega - mapea al ENUM delivery_mode.
/// No afecta al pricing, solo describe el par origen/destino.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "delivery_mode", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    DoorToDoor,
    ShopToDoor,
    DoorToShop,
    ShopToShop,
}

impl DeliveryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMode::DoorToDoor => "door_to_door",
            DeliveryMode::ShopToDoor => "shop_to_door",
            DeliveryMode::DoorToShop => "door_to_shop",
            DeliveryMode::ShopToShop => "shop_to_shop",
        }
    }
}

/// Delivery principal - mapea exactamente a la tabla deliveries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Delivery {
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
    pub created_at: DateTime<Utc>,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        use DeliveryStatus::*;
        assert!(Pending.can_transition(Assigned));
        assert!(Assigned.can_transition(PickedUp));
        assert!(PickedUp.can_transition(InTransit));
        assert!(InTransit.can_transition(Delivered));
    }

    #[test]
    fn test_no_backward_or_skipping_transitions() {
        use DeliveryStatus::*;
        assert!(!Assigned.can_transition(Pending));
        assert!(!Pending.can_transition(PickedUp));
        assert!(!Pending.can_transition(Delivered));
        assert!(!InTransit.can_transition(Assigned));
        assert!(!Delivered.can_transition(InTransit));
    }

    #[test]
    fn test_terminal_states_reachable_from_non_terminal_only() {
        use DeliveryStatus::*;
        for from in [Pending, Assigned, PickedUp, InTransit] {
            assert!(from.can_transition(Cancelled), "{:?}", from);
            assert!(from.can_transition(Failed), "{:?}", from);
        }
        for from in [Delivered, Cancelled, Failed] {
            assert!(!from.can_transition(Cancelled), "{:?}", from);
            assert!(!from.can_transition(Failed), "{:?}", from);
        }
    }

    #[test]
    fn test_driver_exclusive_transitions() {
        use DeliveryStatus::*;
        assert!(!Assigned.requires_assigned_driver());
        assert!(PickedUp.requires_assigned_driver());
        assert!(InTransit.requires_assigned_driver());
        assert!(Delivered.requires_assigned_driver());
    }

    #[test]
    fn test_concurrent_accept_has_single_winner() {
        use std::sync::{Arc, Mutex};

        // Compare-and-swap en memoria con la misma regla que aplica el
        // update condicional de la base: solo gana quien encuentra la
        // entrega todavía en pending
        let status = Arc::new(Mutex::new(DeliveryStatus::Pending));
        let winners = Arc::new(Mutex::new(0u32));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let status = Arc::clone(&status);
                let winners = Arc::clone(&winners);
                std::thread::spawn(move || {
                    let mut guard = status.lock().unwrap();
                    if guard.can_transition(DeliveryStatus::Assigned) {
                        *guard = DeliveryStatus::Assigned;
                        *winners.lock().unwrap() += 1;
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(*winners.lock().unwrap(), 1);
        assert_eq!(*status.lock().unwrap(), DeliveryStatus::Assigned);
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&DeliveryStatus::PickedUp).unwrap();
        assert_eq!(json, "\"picked_up\"");
        let back: DeliveryStatus = serde_json::from_str("\"in_transit\"").unwrap();
        assert_eq!(back, DeliveryStatus::InTransit);
    }
}
