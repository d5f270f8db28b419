//! Domain traits defining contracts between layers.

use async_trait::async_trait;

use super::error::AppError;
use super::types::{Customer, CustomerId, CustomerPatch, HealthResponse, NewCustomer};

/// Persistence operations for the `customers` table.
///
/// Dropping a returned future cancels the storage round-trip, which is how
/// request deadlines reach this layer.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Check database connectivity
    async fn health_check(&self) -> Result<(), AppError>;

    /// Insert a new row and return its generated identifier
    async fn create(&self, customer: &NewCustomer) -> Result<CustomerId, AppError>;

    /// Overwrite `name` and `age` of an existing row and return the stored row
    async fn update(&self, id: CustomerId, patch: &CustomerPatch) -> Result<Customer, AppError>;

    /// Fetch a single row, failing with `DatabaseError::NotFound` on a miss
    async fn get_by_id(&self, id: CustomerId) -> Result<Customer, AppError>;

    /// Delete a row; deleting a missing id is not an error
    async fn delete(&self, id: CustomerId) -> Result<(), AppError>;

    /// Fetch every row in storage order
    async fn list_all(&self) -> Result<Vec<Customer>, AppError>;
}

/// Use cases exposed to the HTTP layer.
#[async_trait]
pub trait CustomerService: Send + Sync {
    async fn create_customer(&self, name: String, age: u32) -> Result<Customer, AppError>;

    async fn update_customer(
        &self,
        id: CustomerId,
        patch: &CustomerPatch,
    ) -> Result<Customer, AppError>;

    async fn get_customer_by_id(&self, id: CustomerId) -> Result<Customer, AppError>;

    async fn delete_customer(&self, id: CustomerId) -> Result<(), AppError>;

    async fn list_all_customers(&self) -> Result<Vec<Customer>, AppError>;

    /// Report the health of the storage dependency
    async fn health_check(&self) -> HealthResponse;
}
