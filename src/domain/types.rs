use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Storage-assigned identifier of a customer.
pub type CustomerId = u64;

/// Core domain entity representing a stored customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub age: u32,
}

impl Customer {
    pub fn new(id: CustomerId, name: impl Into<String>, age: u32) -> Self {
        Self {
            id,
            name: name.into(),
            age,
        }
    }
}

/// A customer that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub age: u32,
}

impl NewCustomer {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }
}

/// Column values written by an update.
///
/// `None` means "write NULL", which the storage layer rejects because both
/// columns are `NOT NULL`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub age: Option<u32>,
}

impl CustomerPatch {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: Some(name.into()),
            age: Some(age),
        }
    }
}

/// Request payload for creating a customer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerRequest {
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    #[schema(example = "John Doe")]
    pub name: Option<String>,
    #[validate(
        required(message = "age is required"),
        range(min = 1, max = 200, message = "age must be between 1 and 200")
    )]
    #[schema(example = 20, minimum = 1, maximum = 200)]
    pub age: Option<u64>,
}

impl CreateCustomerRequest {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: Some(name.into()),
            age: Some(u64::from(age)),
        }
    }
}

/// Request payload for updating a customer. Same rules as creation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomerRequest {
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    #[validate(
        required(message = "age is required"),
        range(min = 1, max = 200, message = "age must be between 1 and 200")
    )]
    #[schema(example = 30, minimum = 1, maximum = 200)]
    pub age: Option<u64>,
}

impl UpdateCustomerRequest {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: Some(name.into()),
            age: Some(u64::from(age)),
        }
    }
}

impl From<UpdateCustomerRequest> for CustomerPatch {
    fn from(request: UpdateCustomerRequest) -> Self {
        Self {
            name: request.name,
            // Validated ages fit; anything wider becomes NULL and is rejected by storage.
            age: request.age.and_then(|age| u32::try_from(age).ok()),
        }
    }
}

/// Path parameters of the `/customers/{id}` routes.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct CustomerPath {
    #[validate(range(min = 1, message = "id is required"))]
    pub id: CustomerId,
}

/// Customer representation inside response envelopes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct CustomerData {
    pub id: CustomerId,
    pub name: String,
    pub age: u32,
}

impl From<Customer> for CustomerData {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            age: customer.age,
        }
    }
}

/// Envelope carrying a single customer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub success: bool,
    pub message: String,
    pub data: CustomerData,
}

impl CustomerResponse {
    pub fn new(message: impl Into<String>, customer: Customer) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: customer.into(),
        }
    }
}

/// Envelope carrying every customer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerListResponse {
    pub success: bool,
    pub message: String,
    pub data: Vec<CustomerData>,
}

impl CustomerListResponse {
    pub fn new(message: impl Into<String>, customers: Vec<Customer>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: customers.into_iter().map(CustomerData::from).collect(),
        }
    }
}

/// Envelope without a payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Error envelope shared by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub status_code: u16,
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            success: false,
            message: message.into(),
        }
    }
}

/// Health check status for services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Health check response for the application.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub database: HealthStatus,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn new(database: HealthStatus) -> Self {
        Self {
            status: database.clone(),
            database,
            timestamp: Utc::now(),
        }
    }
}
