//! Utilidades
//!
//! Manejo de errores, validación y helpers compartidos.

pub mod errors;
pub mod helpers;
pub mod validation;
