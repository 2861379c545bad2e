//! Cliente Redis
//!
//! Cliente Redis con connection manager y operaciones async de blobs.
//! Los errores de lectura se degradan a cache miss para que los
//! resolvers nunca fallen por culpa de Redis.

use anyhow::Result;
use redis::{aio::ConnectionManager, AsyncCommands, RedisResult};
use tracing::{debug, error, info, warn};

use super::BlobStore;

/// Cliente Redis con connection pooling y operaciones async
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
}

impl RedisClient {
    /// Crear nuevo cliente Redis
    pub async fn new(redis_url: &str) -> Result<Self> {
        info!("🔗 Conectando a Redis: {}", redis_url);

        let client = redis::Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        // Test de conexión usando un comando simple
        let mut conn = manager.clone();
        let _: () = redis::cmd("PING").query_async(&mut conn).await?;

        info!("✅ Redis conectado exitosamente");

        Ok(Self { manager })
    }

    /// Generar clave de cache con prefijo
    pub fn make_key(identifier: &str) -> String {
        format!("tawsil:{}", identifier)
    }

    /// Verificar si Redis está conectado
    pub async fn is_connected(&self) -> bool {
        let mut conn = self.manager.clone();
        match redis::cmd("PING").query_async::<_, String>(&mut conn).await {
            Ok(response) => response == "PONG",
            Err(_) => false,
        }
    }
}

#[async_trait::async_trait]
impl BlobStore for RedisClient {
    async fn get_blob(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();

        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(value)) => {
                debug!("📥 Cache HIT para clave: {}", key);
                Ok(Some(value))
            }
            Ok(None) => {
                debug!("❌ Cache MISS para clave: {}", key);
                Ok(None)
            }
            Err(e) => {
                warn!("⚠️ Error leyendo cache para clave {}: {}", key, e);
                Ok(None)
            }
        }
    }

    async fn set_blob(&self, key: &str, blob: &str) -> Result<()> {
        let mut conn = self.manager.clone();

        // Sin TTL de Redis: la frescura la decide el timestamp embebido
        // en el blob, porque las lecturas stale-allowed necesitan el
        // último valor aunque haya expirado
        let result: RedisResult<()> = conn.set(key, blob).await;

        match result {
            Ok(()) => {
                debug!("💾 Cache SET para clave: {}", key);
                Ok(())
            }
            Err(e) => {
                error!("❌ Error guardando en cache para clave {}: {}", key, e);
                Err(anyhow::anyhow!("Error de Redis: {}", e))
            }
        }
    }

    async fn delete_blob(&self, key: &str) -> Result<()> {
        let mut conn = self.manager.clone();

        let result: RedisResult<i64> = conn.del(key).await;

        match result {
            Ok(count) => {
                debug!("🗑️ Cache DELETE para clave: {} (eliminados: {})", key, count);
                Ok(())
            }
            Err(e) => {
                warn!("⚠️ Error eliminando cache para clave {}: {}", key, e);
                Ok(()) // No fallar si no se puede eliminar
            }
        }
    }
}
