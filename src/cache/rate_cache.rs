//! Cache genérico de valores externos
//!
//! Cache time-boxed de un único valor numérico externo (tipo de cambio
//! o bundle de precios de combustible). Guarda la entrada en memoria y,
//! si hay backend, la persiste como un blob JSON `{value, timestamp}`
//! leído/escrito como unidad.
//!
//! `read(false)` solo devuelve valores frescos (edad <= TTL);
//! `read(true)` devuelve el último valor escrito sin importar la edad,
//! para que los resolvers puedan degradar a un valor stale antes de
//! caer al estimado hardcodeado.

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::BlobStore;

/// Entrada del cache: valor + momento de escritura
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateCacheEntry<T> {
    pub value: T,
    pub timestamp: DateTime<Utc>,
}

pub struct RateCache<T> {
    entry: RwLock<Option<RateCacheEntry<T>>>,
    ttl: Duration,
    key: String,
    store: Option<Arc<dyn BlobStore + Send + Sync>>,
}

impl<T> RateCache<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    /// Cache solo en memoria
    pub fn new(key: &str, ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
            key: key.to_string(),
            store: None,
        }
    }

    /// Cache con persistencia write-through en un backend de blobs
    pub fn with_store(key: &str, ttl: Duration, store: Arc<dyn BlobStore + Send + Sync>) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
            key: key.to_string(),
            store: Some(store),
        }
    }

    /// Leer el valor cacheado.
    ///
    /// Con `allow_stale = false` devuelve None si la entrada superó el
    /// TTL o no existe. Con `allow_stale = true` devuelve el último
    /// valor escrito sin importar la edad.
    pub async fn read(&self, allow_stale: bool) -> Option<T> {
        let entry = {
            let guard = self.entry.read().await;
            guard.clone()
        };

        let entry = match entry {
            Some(entry) => Some(entry),
            None => self.load_from_store().await,
        };

        let entry = entry?;
        let age = Utc::now() - entry.timestamp;

        if !allow_stale && age > self.ttl {
            debug!("⏰ Cache '{}' expirado (edad: {}s)", self.key, age.num_seconds());
            return None;
        }

        Some(entry.value)
    }

    /// Escribir el valor, pisando cualquier entrada anterior y
    /// reseteando el timestamp a ahora. Atómico respecto a los lectores.
    pub async fn write(&self, value: T) {
        let entry = RateCacheEntry {
            value,
            timestamp: Utc::now(),
        };

        {
            let mut guard = self.entry.write().await;
            *guard = Some(entry.clone());
        }

        if let Some(store) = &self.store {
            match serde_json::to_string(&entry) {
                Ok(blob) => {
                    if let Err(e) = store.set_blob(&self.key, &blob).await {
                        warn!("⚠️ No se pudo persistir cache '{}': {}", self.key, e);
                    }
                }
                Err(e) => warn!("⚠️ Error serializando cache '{}': {}", self.key, e),
            }
        }
    }

    /// Vaciar el cache. Solo usado en tests y endpoints de mantenimiento.
    pub async fn clear(&self) {
        {
            let mut guard = self.entry.write().await;
            *guard = None;
        }

        if let Some(store) = &self.store {
            if let Err(e) = store.delete_blob(&self.key).await {
                warn!("⚠️ No se pudo limpiar cache '{}': {}", self.key, e);
            }
        }
    }

    /// Recargar la entrada desde el backend de blobs tras un arranque
    /// en frío. Los errores se degradan a miss.
    async fn load_from_store(&self) -> Option<RateCacheEntry<T>> {
        let store = self.store.as_ref()?;

        let blob = match store.get_blob(&self.key).await {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(e) => {
                warn!("⚠️ Error leyendo cache '{}' del backend: {}", self.key, e);
                return None;
            }
        };

        match serde_json::from_str::<RateCacheEntry<T>>(&blob) {
            Ok(entry) => {
                let mut guard = self.entry.write().await;
                if guard.is_none() {
                    *guard = Some(entry.clone());
                }
                Some(entry)
            }
            Err(e) => {
                warn!("⚠️ Blob corrupto en cache '{}': {}", self.key, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_write_then_fresh_read() {
        let cache: RateCache<i64> = RateCache::new("test:rate", Duration::hours(1));
        cache.write(15000).await;
        assert_eq!(cache.read(false).await, Some(15000));
    }

    #[tokio::test]
    async fn test_empty_cache_reads_absent() {
        let cache: RateCache<i64> = RateCache::new("test:rate", Duration::hours(1));
        assert_eq!(cache.read(false).await, None);
        assert_eq!(cache.read(true).await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_fresh_absent_stale_present() {
        // TTL cero: cualquier entrada ya escrita cuenta como expirada
        let cache: RateCache<i64> = RateCache::new("test:rate", Duration::zero());
        cache.write(15000).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        assert_eq!(cache.read(false).await, None);
        assert_eq!(cache.read(true).await, Some(15000));
    }

    #[tokio::test]
    async fn test_write_overwrites_and_refreshes() {
        let cache: RateCache<i64> = RateCache::new("test:rate", Duration::hours(1));
        cache.write(10000).await;
        cache.write(15500).await;
        assert_eq!(cache.read(false).await, Some(15500));
    }

    #[tokio::test]
    async fn test_clear_removes_entry() {
        let cache: RateCache<i64> = RateCache::new("test:rate", Duration::hours(1));
        cache.write(15000).await;
        cache.clear().await;
        assert_eq!(cache.read(true).await, None);
    }

    /// Backend de blobs en memoria para probar el write-through
    #[derive(Default)]
    struct MemoryBlobStore {
        blobs: Mutex<HashMap<String, String>>,
    }

    #[async_trait::async_trait]
    impl BlobStore for MemoryBlobStore {
        async fn get_blob(&self, key: &str) -> Result<Option<String>> {
            Ok(self.blobs.lock().unwrap().get(key).cloned())
        }

        async fn set_blob(&self, key: &str, blob: &str) -> Result<()> {
            self.blobs
                .lock()
                .unwrap()
                .insert(key.to_string(), blob.to_string());
            Ok(())
        }

        async fn delete_blob(&self, key: &str) -> Result<()> {
            self.blobs.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_cold_read_reloads_persisted_blob() {
        let store = Arc::new(MemoryBlobStore::default());

        let warm: RateCache<i64> =
            RateCache::with_store("test:rate", Duration::hours(1), store.clone());
        warm.write(15000).await;

        // Un cache recién construido simula el arranque en frío
        let cold: RateCache<i64> =
            RateCache::with_store("test:rate", Duration::hours(1), store);
        assert_eq!(cold.read(false).await, Some(15000));
    }
}
