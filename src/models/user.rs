//! Modelo de User
//!
//! Usuarios referenciados por las entregas (remitente, conductor,
//! destinatario). Mapea a la tabla users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Rol del usuario - mapea al ENUM user_role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Sender,
    Driver,
    ShopStaff,
    CustomerSupport,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}
