//! Application service layer.
//!
//! This module contains the use cases that orchestrate repository calls.
//! It performs no validation (the HTTP layer owns that) and returns
//! repository errors untouched.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::domain::{
    AppError, Customer, CustomerId, CustomerPatch, CustomerRepository, CustomerService,
    HealthResponse, HealthStatus, NewCustomer,
};

/// Application service containing the customer use cases.
///
/// It holds a reference to the repository trait object, enabling
/// dependency injection and testability.
///
/// # Example
///
/// ```ignore
/// let repository = Arc::new(SqliteClient::with_defaults(&url).await?);
/// let service = AppService::new(repository);
///
/// let customer = service.create_customer("John Doe".to_string(), 20).await?;
/// ```
pub struct AppService {
    repository: Arc<dyn CustomerRepository>,
}

impl AppService {
    /// Creates a new `AppService` instance.
    ///
    /// # Arguments
    ///
    /// * `repository` - Repository for customer persistence.
    #[must_use]
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl CustomerService for AppService {
    /// Builds a new customer from its fields and persists it.
    ///
    /// Returns the customer with the identifier assigned by storage.
    #[instrument(skip(self, name))]
    async fn create_customer(&self, name: String, age: u32) -> Result<Customer, AppError> {
        let new_customer = NewCustomer::new(name, age);
        let id = self.repository.create(&new_customer).await?;
        info!(customer_id = id, "Customer created");

        Ok(Customer {
            id,
            name: new_customer.name,
            age: new_customer.age,
        })
    }

    #[instrument(skip(self, patch))]
    async fn update_customer(
        &self,
        id: CustomerId,
        patch: &CustomerPatch,
    ) -> Result<Customer, AppError> {
        let customer = self.repository.update(id, patch).await?;
        info!(customer_id = id, "Customer updated");
        Ok(customer)
    }

    #[instrument(skip(self))]
    async fn get_customer_by_id(&self, id: CustomerId) -> Result<Customer, AppError> {
        self.repository.get_by_id(id).await
    }

    #[instrument(skip(self))]
    async fn delete_customer(&self, id: CustomerId) -> Result<(), AppError> {
        self.repository.delete(id).await?;
        info!(customer_id = id, "Customer deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_all_customers(&self) -> Result<Vec<Customer>, AppError> {
        self.repository.list_all().await
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> HealthResponse {
        let database = match self.repository.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!(error = ?e, "Database health check failed");
                HealthStatus::Unhealthy
            }
        };

        HealthResponse::new(database)
    }
}
