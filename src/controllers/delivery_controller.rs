//! Controller de entregas
//!
//! Orquesta el ciclo de vida completo: alta con cotización, listado,
//! aceptación por conductores y avances de estado. El precio se fija
//! una sola vez en la creación y no se recalcula después; las
//! transiciones se validan aquí contra la máquina de estados y se
//! aplican en la base con updates condicionales.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::delivery_dto::{
    AcceptDeliveryRequest, ApiResponse, CreateDeliveryRequest, DeliveryFilters, DeliveryResponse,
    QuoteRequest, QuoteResponse, UpdateStatusRequest,
};
use crate::models::delivery::{Delivery, DeliveryStatus};
use crate::models::user::UserRole;
use crate::repositories::delivery_repository::{DeliveryRepository, NewDelivery};
use crate::repositories::user_repository::UserRepository;
use crate::services::delivery_feed::{DeliveryEventKind, DeliveryFeed};
use crate::services::geocoding_service::haversine_distance_km;
use crate::services::pricing_service::PricingService;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::helpers::generate_delivery_code;
use crate::utils::validation::ensure_valid_delivery_form;

/// Reintentos ante colisión del código de entrega. Con un millón de
/// códigos posibles, tres intentos bastan de sobra.
const CODE_RETRIES: u32 = 3;

pub struct DeliveryController {
    repository: DeliveryRepository,
    users: UserRepository,
    pricing: PricingService,
    feed: DeliveryFeed,
}

impl DeliveryController {
    pub fn new(pool: PgPool, feed: DeliveryFeed) -> Self {
        Self {
            repository: DeliveryRepository::new(pool.clone()),
            users: UserRepository::new(pool),
            pricing: PricingService::default(),
            feed,
        }
    }

    /// Crear una entrega: validar formulario, resolver distancia,
    /// cotizar, generar código y persistir en estado pending.
    pub async fn create(
        &self,
        request: CreateDeliveryRequest,
    ) -> AppResult<ApiResponse<DeliveryResponse>> {
        ensure_valid_delivery_form(&request)?;
        request
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        // Garantizados presentes por ensure_valid_delivery_form
        let parcel_size = request
            .parcel_size
            .ok_or_else(|| AppError::BadRequest("parcel_size is required".to_string()))?;
        let delivery_mode = request
            .delivery_mode
            .ok_or_else(|| AppError::BadRequest("delivery_mode is required".to_string()))?;

        let distance_km = self.resolve_distance(&request);
        let total_price = self.pricing.quote(parcel_size, distance_km);
        let driver_earnings = self.pricing.driver_earnings(total_price);

        log::info!(
            "📦 Nueva entrega {:?} a {:?} km: total {} SYP, conductor {} SYP",
            parcel_size,
            distance_km,
            total_price,
            driver_earnings
        );

        let template = NewDelivery {
            delivery_code: String::new(),
            sender_id: request.sender_id,
            recipient_id: request.recipient_id,
            parcel_size,
            delivery_mode,
            pickup_address: request.pickup_address,
            delivery_address: request.delivery_address,
            pickup_lat: request.pickup_lat,
            pickup_lon: request.pickup_lon,
            delivery_lat: request.delivery_lat,
            delivery_lon: request.delivery_lon,
            description: request.description,
            pickup_instructions: request.pickup_instructions,
            delivery_instructions: request.delivery_instructions,
            base_price: total_price,
            total_price,
            driver_earnings,
        };

        // Reintentar con un código nuevo si el generado ya existe
        let mut last_err = None;
        for attempt in 1..=CODE_RETRIES {
            let mut new = template.clone();
            new.delivery_code = generate_delivery_code();

            match self.repository.create(new).await {
                Ok(delivery) => {
                    self.feed
                        .publish(DeliveryEventKind::Insert, delivery.clone());
                    return Ok(ApiResponse::success_with_message(
                        DeliveryResponse::from(delivery),
                        "Delivery created successfully".to_string(),
                    ));
                }
                Err(AppError::Conflict(msg)) => {
                    log::warn!(
                        "⚠️ Colisión de código de entrega (intento {}/{}): {}",
                        attempt,
                        CODE_RETRIES,
                        msg
                    );
                    last_err = Some(AppError::Conflict(msg));
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| {
            AppError::Internal("delivery code generation exhausted retries".to_string())
        }))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<DeliveryResponse> {
        let delivery = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Delivery", &id.to_string()))?;

        Ok(DeliveryResponse::from(delivery))
    }

    pub async fn list(&self, filters: DeliveryFilters) -> AppResult<Vec<DeliveryResponse>> {
        let deliveries = self
            .repository
            .find_all(filters.status, filters.driver_id, filters.sender_id)
            .await?;

        Ok(deliveries.into_iter().map(DeliveryResponse::from).collect())
    }

    pub async fn list_pending(&self) -> AppResult<Vec<DeliveryResponse>> {
        let deliveries = self.repository.find_pending().await?;
        Ok(deliveries.into_iter().map(DeliveryResponse::from).collect())
    }

    /// Aceptación por un conductor. Solo usuarios con rol driver;
    /// la carrera entre conductores la resuelve el update condicional
    /// del repositorio.
    pub async fn accept(
        &self,
        id: Uuid,
        request: AcceptDeliveryRequest,
    ) -> AppResult<ApiResponse<DeliveryResponse>> {
        let driver = self
            .users
            .find_by_id(request.driver_id)
            .await?
            .ok_or_else(|| not_found_error("User", &request.driver_id.to_string()))?;

        if driver.role != UserRole::Driver {
            return Err(AppError::Forbidden(
                "Only drivers can accept deliveries".to_string(),
            ));
        }

        let delivery = self.repository.accept(id, request.driver_id).await?;
        log::info!(
            "🚚 Entrega {} aceptada por conductor {}",
            delivery.delivery_code,
            request.driver_id
        );

        self.feed
            .publish(DeliveryEventKind::Update, delivery.clone());

        Ok(ApiResponse::success_with_message(
            DeliveryResponse::from(delivery),
            "Delivery accepted successfully".to_string(),
        ))
    }

    /// Avanzar el estado de una entrega.
    ///
    /// assigned nunca se alcanza por aquí (eso es la aceptación); los
    /// estados posteriores a assigned solo los dispara el conductor
    /// asignado, y la cancelación queda para el remitente o el
    /// conductor asignado.
    pub async fn update_status(
        &self,
        id: Uuid,
        request: UpdateStatusRequest,
    ) -> AppResult<ApiResponse<DeliveryResponse>> {
        if request.status == DeliveryStatus::Assigned {
            return Err(AppError::BadRequest(
                "Use the accept endpoint to assign a driver".to_string(),
            ));
        }

        let delivery = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Delivery", &id.to_string()))?;

        if !delivery.status.can_transition(request.status) {
            return Err(AppError::LifecycleConflict(format!(
                "Cannot transition delivery '{}' from {} to {}",
                delivery.delivery_code,
                delivery.status.as_str(),
                request.status.as_str()
            )));
        }

        self.check_actor(&delivery, &request)?;

        let updated = self
            .repository
            .update_status(id, delivery.status, request.status)
            .await?
            .ok_or_else(|| {
                // El estado cambió entre la lectura y el update
                AppError::LifecycleConflict(format!(
                    "Delivery '{}' changed state concurrently",
                    delivery.delivery_code
                ))
            })?;

        log::info!(
            "📍 Entrega {} avanzó a {}",
            updated.delivery_code,
            updated.status.as_str()
        );

        self.feed.publish(DeliveryEventKind::Update, updated.clone());

        Ok(ApiResponse::success_with_message(
            DeliveryResponse::from(updated),
            "Delivery status updated successfully".to_string(),
        ))
    }

    /// Cotización sin persistencia, para mostrar el precio antes de
    /// confirmar el alta
    pub async fn quote(&self, request: QuoteRequest) -> AppResult<QuoteResponse> {
        let total_price = self.pricing.quote(request.parcel_size, request.distance_km);
        let driver_earnings = self.pricing.driver_earnings(total_price);

        Ok(QuoteResponse {
            total_price,
            driver_earnings,
            currency: "SYP".to_string(),
        })
    }

    /// Distancia de cotización: la declarada por el cliente, o la
    /// haversine entre pickup y delivery si hay coordenadas completas.
    /// None deja que el motor de precios aplique su distancia por
    /// defecto.
    fn resolve_distance(&self, request: &CreateDeliveryRequest) -> Option<Decimal> {
        if let Some(distance) = request.distance_km {
            return Some(distance);
        }

        match (
            request.pickup_lat,
            request.pickup_lon,
            request.delivery_lat,
            request.delivery_lon,
        ) {
            (Some(plat), Some(plon), Some(dlat), Some(dlon)) => {
                let km = haversine_distance_km(plat, plon, dlat, dlon);
                Decimal::from_f64_retain(km)
            }
            _ => None,
        }
    }

    fn check_actor(&self, delivery: &Delivery, request: &UpdateStatusRequest) -> AppResult<()> {
        let is_assigned_driver = delivery.driver_id == Some(request.actor_id);
        let is_sender = delivery.sender_id == request.actor_id;

        match request.status {
            DeliveryStatus::Cancelled | DeliveryStatus::Failed => {
                if !is_sender && !is_assigned_driver {
                    return Err(AppError::Forbidden(
                        "Only the sender or the assigned driver can close a delivery".to_string(),
                    ));
                }
            }
            status if status.requires_assigned_driver() => {
                if !is_assigned_driver {
                    return Err(AppError::Forbidden(
                        "Only the assigned driver can report progress on a delivery".to_string(),
                    ));
                }
            }
            _ => {}
        }

        Ok(())
    }
}
