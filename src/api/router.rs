//! HTTP routing configuration and middleware stack.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::app::AppState;
use crate::config::ServerConfig;

use super::handlers::{
    create_customer_handler, delete_customer_handler, get_customer_handler, health_check_handler,
    list_customers_handler, liveness_handler, openapi_handler, readiness_handler,
    update_customer_handler,
};
use super::middleware::{build_cors_layer, handle_panic};

/// Create the application router.
///
/// Customer routes live under `/api/v1/customers` and answer with or
/// without a trailing slash. Panics are caught outermost; inside that every
/// request is traced and bounded by the request timeout before CORS and the
/// body limit apply.
pub fn create_router(app_state: Arc<AppState>, config: &ServerConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(build_cors_layer(&config.allow_origins));

    let customer_routes = Router::new()
        .route(
            "/customers",
            post(create_customer_handler).get(list_customers_handler),
        )
        .route(
            "/customers/",
            post(create_customer_handler).get(list_customers_handler),
        )
        .route(
            "/customers/{id}",
            get(get_customer_handler)
                .put(update_customer_handler)
                .delete(delete_customer_handler),
        );

    Router::new()
        .nest("/api/v1", customer_routes)
        .route("/health", get(health_check_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .route("/api-docs/openapi.json", get(openapi_handler))
        .layer(DefaultBodyLimit::max(config.body_limit))
        .layer(middleware)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Request, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::test_utils::{MockCustomerRepository, mocks::MockConfig};

    fn router_for(repository: Arc<MockCustomerRepository>, config: &ServerConfig) -> Router {
        create_router(Arc::new(AppState::new(repository)), config)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_collection_route_with_and_without_trailing_slash() {
        let repository = Arc::new(MockCustomerRepository::new());
        repository.insert("Ada", 36);
        let app = router_for(Arc::clone(&repository), &ServerConfig::default());

        for uri in ["/api/v1/customers", "/api/v1/customers/"] {
            let response = app.clone().oneshot(empty_request("GET", uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
            let json = body_json(response).await;
            assert_eq!(json["data"].as_array().unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_create_storage_failure_is_500() {
        let repository = Arc::new(MockCustomerRepository::with_config(
            MockConfig::write_failure("database is locked"),
        ));
        let app = router_for(repository, &ServerConfig::default());

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/customers/",
                json!({"name": "test", "age": 20}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["status_code"], 500);
        assert_eq!(json["success"], false);
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .starts_with("error creating customer: ")
        );
    }

    #[tokio::test]
    async fn test_invalid_body_never_reaches_storage() {
        let repository = Arc::new(MockCustomerRepository::new());
        let app = router_for(Arc::clone(&repository), &ServerConfig::default());

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/customers",
                json!({"name": "test", "age": 0}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .starts_with("error validating request: ")
        );
        assert_eq!(repository.call_count(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_customer_skips_write() {
        let repository = Arc::new(MockCustomerRepository::new());
        let app = router_for(Arc::clone(&repository), &ServerConfig::default());

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/v1/customers/42",
                json!({"name": "ghost", "age": 30}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(repository.write_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_storage_failure_is_500() {
        let repository = Arc::new(MockCustomerRepository::with_config(
            MockConfig::write_failure("disk I/O error"),
        ));
        let existing = repository.insert("Ada", 36);
        let app = router_for(Arc::clone(&repository), &ServerConfig::default());

        let response = app
            .oneshot(empty_request(
                "DELETE",
                &format!("/api/v1/customers/{}", existing.id),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .starts_with("error deleting customer: ")
        );
        assert_eq!(repository.customers().len(), 1);
    }

    #[tokio::test]
    async fn test_read_failures_are_500() {
        let repository = Arc::new(MockCustomerRepository::failing("no such table"));
        let app = router_for(repository, &ServerConfig::default());

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/v1/customers/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .starts_with("error getting customer: ")
        );

        let response = app
            .oneshot(empty_request("GET", "/api/v1/customers"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .starts_with("error getting all customers: ")
        );
    }

    #[tokio::test]
    async fn test_slow_storage_times_out() {
        let repository = Arc::new(MockCustomerRepository::with_config(
            MockConfig::success().with_latency(500),
        ));
        let config = ServerConfig {
            request_timeout: Duration::from_millis(50),
            ..ServerConfig::default()
        };
        let app = router_for(repository, &config);

        let response = app
            .oneshot(empty_request("GET", "/api/v1/customers"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn test_oversized_body_is_413_envelope() {
        let repository = Arc::new(MockCustomerRepository::new());
        let config = ServerConfig {
            body_limit: 64,
            ..ServerConfig::default()
        };
        let app = router_for(Arc::clone(&repository), &config);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/customers",
                json!({"name": "x".repeat(256), "age": 20}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = body_json(response).await;
        assert_eq!(json["status_code"], 413);
        assert_eq!(json["success"], false);
        assert_eq!(repository.call_count(), 0);
    }

    #[tokio::test]
    async fn test_health_routes_follow_repository() {
        let repository = Arc::new(MockCustomerRepository::new());
        let app = router_for(Arc::clone(&repository), &ServerConfig::default());

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/health/ready"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        repository.set_healthy(false);

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["database"], "unhealthy");

        let response = app
            .oneshot(empty_request("GET", "/health/live"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = router_for(
            Arc::new(MockCustomerRepository::new()),
            &ServerConfig::default(),
        );

        let response = app
            .oneshot(empty_request("GET", "/api-docs/openapi.json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["paths"]["/api/v1/customers/{id}"].is_object());
    }
}
