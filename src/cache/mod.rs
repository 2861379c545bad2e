//! Cache
//!
//! Este módulo contiene el cache de valores externos (rates) y el
//! cliente Redis que lo persiste entre reinicios.

pub mod rate_cache;
pub mod redis_client;

pub use rate_cache::RateCache;
pub use redis_client::RedisClient;

use anyhow::Result;

/// Operaciones de persistencia de blobs opacos.
/// El cache guarda cada entrada `{value, timestamp}` como un único
/// blob JSON bajo una clave fija, leído/escrito como unidad.
#[async_trait::async_trait]
pub trait BlobStore {
    async fn get_blob(&self, key: &str) -> Result<Option<String>>;
    async fn set_blob(&self, key: &str, blob: &str) -> Result<()>;
    async fn delete_blob(&self, key: &str) -> Result<()>;
}
