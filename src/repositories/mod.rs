//! Repositorios
//!
//! Capa de acceso a datos sobre sqlx.

pub mod delivery_repository;
pub mod user_repository;
