//! Repositorio de entregas
//!
//! Acceso a la tabla deliveries. La aceptación y los avances de
//! estado son updates condicionales a nivel de base de datos: el
//! WHERE incluye el estado esperado, de modo que dos conductores
//! compitiendo por la misma entrega pendiente no pueden ganar ambos,
//! y una entrega cancelada no resucita por un update tardío.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::delivery::{Delivery, DeliveryMode, DeliveryStatus, ParcelSize};
use crate::utils::errors::{accept_conflict_error, AppError, AppResult};

/// Campos de una entrega nueva ya cotizada y validada
#[derive(Debug, Clone)]
pub struct NewDelivery {
    pub delivery_code: String,
    pub sender_id: Uuid,
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
}

pub struct DeliveryRepository {
    pool: PgPool,
}

impl DeliveryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar una entrega nueva en estado pending sin conductor.
    /// Una colisión del código de entrega se reporta como Conflict
    /// para que el controller reintente con otro código.
    pub async fn create(&self, new: NewDelivery) -> AppResult<Delivery> {
        let delivery = sqlx::query_as::<_, Delivery>(
            r#"
            INSERT INTO deliveries (
                id, delivery_code, sender_id, recipient_id,
                parcel_size, delivery_mode,
                pickup_address, delivery_address,
                pickup_lat, pickup_lon, delivery_lat, delivery_lon,
                description, pickup_instructions, delivery_instructions,
                base_price, total_price, driver_earnings,
                status, created_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, 'pending', $19
            )
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.delivery_code)
        .bind(new.sender_id)
        .bind(new.recipient_id)
        .bind(new.parcel_size)
        .bind(new.delivery_mode)
        .bind(&new.pickup_address)
        .bind(&new.delivery_address)
        .bind(new.pickup_lat)
        .bind(new.pickup_lon)
        .bind(new.delivery_lat)
        .bind(new.delivery_lon)
        .bind(&new.description)
        .bind(&new.pickup_instructions)
        .bind(&new.delivery_instructions)
        .bind(new.base_price)
        .bind(new.total_price)
        .bind(new.driver_earnings)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(
                format!("delivery_code '{}' already exists", new.delivery_code),
            ),
            _ => AppError::Database(e),
        })?;

        Ok(delivery)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Delivery>> {
        let delivery = sqlx::query_as::<_, Delivery>("SELECT * FROM deliveries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(delivery)
    }

    /// Listado con filtros opcionales, más recientes primero
    pub async fn find_all(
        &self,
        status: Option<DeliveryStatus>,
        driver_id: Option<Uuid>,
        sender_id: Option<Uuid>,
    ) -> AppResult<Vec<Delivery>> {
        let deliveries = sqlx::query_as::<_, Delivery>(
            r#"
            SELECT * FROM deliveries
            WHERE ($1::delivery_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR driver_id = $2)
              AND ($3::uuid IS NULL OR sender_id = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .bind(driver_id)
        .bind(sender_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(deliveries)
    }

    /// Entregas pendientes disponibles para conductores
    pub async fn find_pending(&self) -> AppResult<Vec<Delivery>> {
        let deliveries = sqlx::query_as::<_, Delivery>(
            "SELECT * FROM deliveries WHERE status = 'pending' ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(deliveries)
    }

    /// Aceptación por un conductor: update condicional compare-and-swap
    /// sobre el estado. Solo gana si la entrega sigue pending; cero
    /// filas afectadas significa que otro conductor llegó antes (o que
    /// la entrega no existe).
    pub async fn accept(&self, id: Uuid, driver_id: Uuid) -> AppResult<Delivery> {
        let updated = sqlx::query_as::<_, Delivery>(
            r#"
            UPDATE deliveries
            SET driver_id = $2, status = 'assigned'
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(delivery) => Ok(delivery),
            None => {
                // Distinguir carrera perdida de entrega inexistente
                match self.find_by_id(id).await? {
                    Some(_) => Err(accept_conflict_error(&id.to_string())),
                    None => Err(AppError::NotFound(format!(
                        "Delivery with id '{}' not found",
                        id
                    ))),
                }
            }
        }
    }

    /// Avanzar el estado condicionado al estado actual esperado.
    /// picked_up y delivered sellan sus timestamps; cero filas
    /// afectadas significa que el estado cambió bajo nuestros pies.
    pub async fn update_status(
        &self,
        id: Uuid,
        expected: DeliveryStatus,
        next: DeliveryStatus,
    ) -> AppResult<Option<Delivery>> {
        let now = Utc::now();

        let updated = match next {
            DeliveryStatus::PickedUp => {
                sqlx::query_as::<_, Delivery>(
                    r#"
                    UPDATE deliveries
                    SET status = $3, picked_up_at = $4
                    WHERE id = $1 AND status = $2
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(expected)
                .bind(next)
                .bind(now)
                .fetch_optional(&self.pool)
                .await?
            }
            DeliveryStatus::Delivered => {
                sqlx::query_as::<_, Delivery>(
                    r#"
                    UPDATE deliveries
                    SET status = $3, delivered_at = $4
                    WHERE id = $1 AND status = $2
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(expected)
                .bind(next)
                .bind(now)
                .fetch_optional(&self.pool)
                .await?
            }
            _ => {
                sqlx::query_as::<_, Delivery>(
                    r#"
                    UPDATE deliveries
                    SET status = $3
                    WHERE id = $1 AND status = $2
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(expected)
                .bind(next)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        Ok(updated)
    }
}
