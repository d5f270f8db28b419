//! Application state management.
//!
//! This module provides the shared application state that is
//! accessible to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::domain::{CustomerRepository, CustomerService};

use super::service::AppService;

/// Shared application state for the Axum web server.
///
/// Holds a thread-safe reference to the customer service, so handlers never
/// see concrete implementations.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
///
/// let repository = Arc::new(SqliteClient::with_defaults(&url).await?);
/// let state = Arc::new(AppState::new(repository));
/// let router = create_router(state, &config.server);
/// ```
#[derive(Clone)]
pub struct AppState {
    /// The service implementing the customer use cases.
    pub service: Arc<dyn CustomerService>,
}

impl AppState {
    /// Creates a new `AppState`, wiring an `AppService` to the repository.
    #[must_use]
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self {
            service: Arc::new(AppService::new(repository)),
        }
    }

    /// Creates a new `AppState` with a custom service.
    ///
    /// This is useful for testing when you want to inject a pre-configured service.
    #[must_use]
    pub fn with_service(service: Arc<dyn CustomerService>) -> Self {
        Self { service }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockCustomerRepository;

    #[tokio::test]
    async fn test_app_state_service_uses_repository() {
        let repository = Arc::new(MockCustomerRepository::new());
        repository.insert("Ada", 36);

        let state = AppState::new(repository.clone());

        let customers = state.service.list_all_customers().await.unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(repository.call_count(), 1);
    }

    #[test]
    fn test_app_state_is_clone() {
        let repository = Arc::new(MockCustomerRepository::new());

        let state = AppState::new(repository);
        let cloned = state.clone();

        assert!(Arc::ptr_eq(&state.service, &cloned.service));
    }

    #[tokio::test]
    async fn test_app_state_with_custom_service() {
        let repository: Arc<dyn CustomerRepository> = Arc::new(MockCustomerRepository::new());
        let service: Arc<dyn CustomerService> =
            Arc::new(AppService::new(Arc::clone(&repository)));

        let state = AppState::with_service(Arc::clone(&service));

        assert!(Arc::ptr_eq(&state.service, &service));
        assert!(state.service.list_all_customers().await.unwrap().is_empty());
    }
}
