//! Controllers
//!
//! Lógica de negocio entre rutas y repositorios/servicios.

pub mod delivery_controller;
pub mod geocoding_controller;
pub mod rate_controller;
