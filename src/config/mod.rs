//! Configuración
//!
//! Este módulo contiene la configuración del entorno y las tablas
//! de referencia de solo lectura.

pub mod environment;
pub mod pricing;

pub use environment::EnvironmentConfig;
pub use pricing::PricingConfig;
