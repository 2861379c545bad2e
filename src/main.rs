mod cache;
mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

use cache::redis_client::RedisClient;
use config::environment::EnvironmentConfig;
use database::DatabaseConnection;
use middleware::cors::cors_middleware;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("📦 Tawsil - Delivery Lifecycle & Pricing API");
    info!("============================================");

    let env_config = EnvironmentConfig::default();

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    let pool = db_connection.pool().clone();

    // Inicializar Redis para la persistencia de los caches de rates
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

    let redis_client = match RedisClient::new(&redis_url).await {
        Ok(client) => client,
        Err(e) => {
            error!("❌ Error conectando a Redis: {}", e);
            return Err(anyhow::anyhow!("Error de Redis: {}", e));
        }
    };

    // Cliente HTTP compartido con timeout para proveedores externos
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(env_config.provider_timeout_secs))
        .build()?;

    let addr: SocketAddr = format!("{}:{}", env_config.host, env_config.port).parse()?;
    let app_state = AppState::new(pool, env_config, redis_client, http_client);

    let app = Router::new()
        .route("/test", get(test_endpoint))
        .nest("/api/delivery", routes::delivery_routes::create_delivery_router())
        .nest("/api/rates", routes::rate_routes::create_rate_router())
        .nest("/api/vehicles", routes::vehicle_routes::create_vehicle_router())
        .nest("/api/geocoding", routes::geocoding_routes::create_geocoding_router())
        .layer(cors_middleware())
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("📦 Endpoints - Delivery:");
    info!("   POST /api/delivery - Crear entrega");
    info!("   GET  /api/delivery - Listar entregas (filtros: status, driver_id, sender_id)");
    info!("   GET  /api/delivery/pending - Entregas pendientes");
    info!("   POST /api/delivery/quote - Cotizar sin persistir");
    info!("   GET  /api/delivery/:id - Obtener entrega");
    info!("   POST /api/delivery/:id/accept - Aceptar entrega (conductor)");
    info!("   PUT  /api/delivery/:id/status - Avanzar estado");
    info!("💱 Endpoints - Rates:");
    info!("   GET  /api/rates/exchange - Tipo de cambio USD→SYP");
    info!("   GET  /api/rates/fuel - Precios de combustible");
    info!("   POST /api/rates/fuel/trip-cost - Coste de combustible de un trayecto");
    info!("🚗 Endpoints - Vehicles:");
    info!("   GET  /api/vehicles - Catálogo de vehículos");
    info!("   GET  /api/vehicles/:class - Vehículo por clase");
    info!("🗺️ Endpoints - Geocoding:");
    info!("   GET  /api/geocoding/search?q= - Buscar direcciones");
    info!("   GET  /api/geocoding/reverse?lat=&lon= - Geocoding inverso");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "¡API de entregas funcionando correctamente!",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal SIGTERM recibida, apagando servidor...");
        },
    }
}
