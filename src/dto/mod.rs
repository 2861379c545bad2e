//! DTOs
//!
//! Requests y responses de la API.

pub mod delivery_dto;
pub mod rate_dto;

pub use delivery_dto::ApiResponse;
