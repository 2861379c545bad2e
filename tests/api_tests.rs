use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

// App de test básica con los endpoints sin estado; los handlers con
// base de datos se cubren en los tests de módulo
fn create_test_app() -> Router {
    Router::new()
        .route(
            "/test",
            get(|| async {
                Json(json!({
                    "message": "¡API de entregas funcionando correctamente!",
                    "status": "ok",
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                }))
            }),
        )
        .route(
            "/api/vehicles",
            get(|| async { Json(json!([{ "class": "car" }, { "class": "small_van" }])) }),
        )
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json body")
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_vehicles_endpoint_returns_catalog_shape() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/vehicles")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body.is_array());
    assert_eq!(body[0]["class"], "car");
}
