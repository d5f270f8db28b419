//! HTTP request handlers with OpenAPI documentation.
//!
//! Every customer handler runs the same pipeline: bind the path/body into a
//! typed request, validate it, call the service, and translate the outcome
//! into an envelope. This module is the only place where errors become HTTP
//! status codes.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;
use utoipa::OpenApi;
use validator::Validate;

use crate::app::AppState;
use crate::domain::{
    AppError, CreateCustomerRequest, Customer, CustomerData, CustomerId, CustomerListResponse,
    CustomerPath, CustomerResponse, ErrorResponse, HealthResponse, HealthStatus, MessageResponse,
    UpdateCustomerRequest,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Customer CRUD API",
        version = "0.1.0",
        description = "Create, read, update, delete and list customers",
        license(
            name = "MIT"
        )
    ),
    paths(
        create_customer_handler,
        update_customer_handler,
        get_customer_handler,
        delete_customer_handler,
        list_customers_handler,
        health_check_handler,
        liveness_handler,
        readiness_handler,
    ),
    components(
        schemas(
            CreateCustomerRequest,
            UpdateCustomerRequest,
            CustomerData,
            CustomerResponse,
            CustomerListResponse,
            MessageResponse,
            ErrorResponse,
            HealthResponse,
            HealthStatus,
        )
    ),
    tags(
        (name = "customers", description = "Customer management endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Error produced by a handler, rendered as the error envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "Server error");
        }

        let body = Json(ErrorResponse::new(self.status.as_u16(), self.message));
        (self.status, body).into_response()
    }
}

fn validation_failed(err: validator::ValidationErrors) -> ApiError {
    ApiError::bad_request(format!("error validating request: {err}"))
}

/// Bind and validate the `{id}` path segment.
fn bind_id(path: Result<Path<CustomerPath>, PathRejection>) -> Result<CustomerId, ApiError> {
    let Path(path) = path
        .map_err(|e| ApiError::bad_request(format!("error binding request: {}", e.body_text())))?;
    path.validate().map_err(validation_failed)?;
    Ok(path.id)
}

/// Bind and validate a JSON body.
///
/// Oversized bodies keep their 413 status; every other rejection is a 400.
fn bind_body<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        let status = if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            StatusCode::PAYLOAD_TOO_LARGE
        } else {
            StatusCode::BAD_REQUEST
        };
        ApiError::new(status, format!("error binding request: {}", e.body_text()))
    })?;
    payload.validate().map_err(validation_failed)?;
    Ok(payload)
}

/// Split validated `name`/`age` options into values, narrowing `age`.
fn required_fields(name: Option<String>, age: Option<u64>) -> Result<(String, u32), ApiError> {
    let (Some(name), Some(age)) = (name, age) else {
        return Err(ApiError::bad_request(
            "error validating request: name and age are required",
        ));
    };
    let age = u32::try_from(age).map_err(|_| {
        ApiError::bad_request("error validating request: age must be between 1 and 200")
    })?;
    Ok((name, age))
}

/// Existence check shared by get, update and delete.
async fn find_customer(state: &AppState, id: CustomerId) -> Result<Customer, ApiError> {
    state.service.get_customer_by_id(id).await.map_err(|e: AppError| {
        if e.is_not_found() {
            ApiError::not_found(format!("customer not found: {e}"))
        } else {
            ApiError::internal(format!("error getting customer: {e}"))
        }
    })
}

/// Create a new customer
#[utoipa::path(
    post,
    path = "/api/v1/customers/",
    tag = "customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created successfully", body = CustomerResponse),
        (status = 400, description = "Bind or validation error", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    )
)]
pub async fn create_customer_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let request = bind_body(payload)?;
    let (name, age) = required_fields(request.name, request.age)?;

    let customer = state
        .service
        .create_customer(name, age)
        .await
        .map_err(|e| ApiError::internal(format!("error creating customer: {e}")))?;

    Ok((
        StatusCode::CREATED,
        Json(CustomerResponse::new("customer created successfully", customer)),
    ))
}

/// Replace the name and age of an existing customer
#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    tag = "customers",
    params(
        ("id" = u64, Path, description = "Customer ID")
    ),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated successfully", body = CustomerResponse),
        (status = 400, description = "Bind or validation error", body = ErrorResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    )
)]
pub async fn update_customer_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CustomerPath>, PathRejection>,
    payload: Result<Json<UpdateCustomerRequest>, JsonRejection>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let id = bind_id(path)?;
    let request = bind_body(payload)?;

    find_customer(&state, id).await?;

    let customer = state
        .service
        .update_customer(id, &request.into())
        .await
        .map_err(|e| ApiError::internal(format!("error updating customer: {e}")))?;

    Ok(Json(CustomerResponse::new(
        "customer updated successfully",
        customer,
    )))
}

/// Get a single customer by ID
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    tag = "customers",
    params(
        ("id" = u64, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 400, description = "Bind or validation error", body = ErrorResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    )
)]
pub async fn get_customer_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CustomerPath>, PathRejection>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let id = bind_id(path)?;
    let customer = find_customer(&state, id).await?;
    Ok(Json(CustomerResponse::new("customer found", customer)))
}

/// Delete a customer
#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    tag = "customers",
    params(
        ("id" = u64, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer deleted successfully", body = MessageResponse),
        (status = 400, description = "Bind or validation error", body = ErrorResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    )
)]
pub async fn delete_customer_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CustomerPath>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = bind_id(path)?;

    find_customer(&state, id).await?;

    state
        .service
        .delete_customer(id)
        .await
        .map_err(|e| ApiError::internal(format!("error deleting customer: {e}")))?;

    Ok(Json(MessageResponse::new("customer deleted successfully")))
}

/// List every customer
#[utoipa::path(
    get,
    path = "/api/v1/customers/",
    tag = "customers",
    responses(
        (status = 200, description = "All customers", body = CustomerListResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    )
)]
pub async fn list_customers_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CustomerListResponse>, ApiError> {
    let customers = state
        .service
        .list_all_customers()
        .await
        .map_err(|e| ApiError::internal(format!("error getting all customers: {e}")))?;

    Ok(Json(CustomerListResponse::new("customers found", customers)))
}

/// Detailed health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database is unreachable", body = HealthResponse)
    )
)]
pub async fn health_check_handler(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let health = state.service.health_check().await;
    let status = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(health))
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Application is alive")
    )
)]
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Application is ready to serve traffic"),
        (status = 503, description = "Application is not ready")
    )
)]
pub async fn readiness_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    match state.service.health_check().await.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Serve the generated OpenAPI document.
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
