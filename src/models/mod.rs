//! Modelos del dominio
//!
//! Este módulo contiene los structs y enums que mapean al schema
//! PostgreSQL y los tipos de valor del motor de precios.

pub mod delivery;
pub mod fuel;
pub mod user;

pub use delivery::{Delivery, DeliveryMode, DeliveryStatus, ParcelSize};
pub use fuel::{FuelPriceBundle, FuelType, TripFuelCost, VehicleClass, VehicleInfo};
pub use user::{User, UserRole};
