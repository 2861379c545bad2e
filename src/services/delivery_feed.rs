//! Feed de cambios de entregas
//!
//! Canal de notificaciones en proceso: cada insert/update sobre la
//! tabla de entregas publica un evento que los suscriptores reciben
//! vía broadcast. La suscripción se cancela al soltar el receiver.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::delivery::Delivery;

const FEED_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryEventKind {
    Insert,
    Update,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryEvent {
    pub kind: DeliveryEventKind,
    pub delivery: Delivery,
}

/// Handle de suscripción; soltar el handle cancela la suscripción
pub struct DeliverySubscription {
    receiver: broadcast::Receiver<DeliveryEvent>,
}

impl DeliverySubscription {
    /// Esperar el siguiente evento. None cuando el feed se cerró.
    pub async fn next_event(&mut self) -> Option<DeliveryEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                // Suscriptor lento: se saltó eventos, seguir con el siguiente
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("⚠️ Suscriptor del feed se saltó {} evento(s)", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[derive(Clone)]
pub struct DeliveryFeed {
    sender: broadcast::Sender<DeliveryEvent>,
}

impl DeliveryFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender }
    }

    /// Registrar un suscriptor al feed de entregas
    pub fn subscribe(&self) -> DeliverySubscription {
        DeliverySubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Publicar un evento. Sin suscriptores no es un error.
    pub fn publish(&self, kind: DeliveryEventKind, delivery: Delivery) {
        let event = DeliveryEvent { kind, delivery };
        if self.sender.send(event).is_err() {
            log::debug!("📭 Evento de entrega sin suscriptores");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for DeliveryFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::delivery::{DeliveryMode, DeliveryStatus, ParcelSize};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn sample_delivery() -> Delivery {
        Delivery {
            id: Uuid::new_v4(),
            delivery_code: "123456".to_string(),
            sender_id: Uuid::new_v4(),
            driver_id: None,
            recipient_id: None,
            parcel_size: ParcelSize::Medium,
            delivery_mode: DeliveryMode::DoorToDoor,
            pickup_address: "Bab Tuma, Damascus".to_string(),
            delivery_address: "Mezzeh, Damascus".to_string(),
            pickup_lat: None,
            pickup_lon: None,
            delivery_lat: None,
            delivery_lon: None,
            description: None,
            pickup_instructions: None,
            delivery_instructions: None,
            base_price: Decimal::from(3750),
            total_price: Decimal::from(3750),
            driver_earnings: Decimal::from(2625),
            status: DeliveryStatus::Pending,
            created_at: Utc::now(),
            picked_up_at: None,
            delivered_at: None,
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_events() {
        let feed = DeliveryFeed::new();
        let mut subscription = feed.subscribe();

        let delivery = sample_delivery();
        feed.publish(DeliveryEventKind::Insert, delivery.clone());

        let event = subscription.next_event().await.unwrap();
        assert_eq!(event.kind, DeliveryEventKind::Insert);
        assert_eq!(event.delivery.id, delivery.id);
    }

    #[tokio::test]
    async fn test_drop_cancels_subscription() {
        let feed = DeliveryFeed::new();
        let subscription = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_not_an_error() {
        let feed = DeliveryFeed::new();
        feed.publish(DeliveryEventKind::Update, sample_delivery());
    }
}
