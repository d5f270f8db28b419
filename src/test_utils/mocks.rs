//! Mock implementations for testing.
//!
//! These mocks provide in-memory implementations of domain traits
//! that can be configured to simulate various scenarios including
//! success, failure, and slow storage.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crate::domain::{
    AppError, Customer, CustomerId, CustomerPatch, CustomerRepository, DatabaseError, NewCustomer,
};

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, operations will fail.
    pub should_fail: bool,
    /// Restrict failures to create/update/delete; reads keep working.
    pub fail_writes_only: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
    /// Simulated latency in milliseconds.
    pub latency_ms: Option<u64>,
}

impl MockConfig {
    /// Creates a config that always succeeds.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that always fails.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Creates a config where only writes fail.
    #[must_use]
    pub fn write_failure(message: impl Into<String>) -> Self {
        Self {
            fail_writes_only: true,
            ..Self::failure(message)
        }
    }

    /// Adds simulated latency.
    #[must_use]
    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }
}

/// Mock customer repository for testing.
///
/// Uses an in-memory map for storage, assigns ids sequentially from 1
/// and supports configurable failure modes.
///
/// # Example
///
/// ```ignore
/// use crud_customer::test_utils::{MockCustomerRepository, mocks::MockConfig};
///
/// // Create a mock that succeeds
/// let mock = MockCustomerRepository::new();
///
/// // Create a mock whose writes fail
/// let failing_mock = MockCustomerRepository::with_config(MockConfig::write_failure("locked"));
/// ```
pub struct MockCustomerRepository {
    storage: Mutex<BTreeMap<CustomerId, Customer>>,
    next_id: AtomicU64,
    config: MockConfig,
    call_count: AtomicU64,
    write_count: AtomicU64,
    is_healthy: AtomicBool,
}

impl MockCustomerRepository {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    /// Creates a new mock with the given configuration.
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            storage: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            config,
            call_count: AtomicU64::new(0),
            write_count: AtomicU64::new(0),
            is_healthy: AtomicBool::new(true),
        }
    }

    /// Creates a mock that always fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Gets the number of times any trait method was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Gets the number of create/update/delete calls that reached the mock.
    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::Relaxed)
    }

    /// Sets the health status.
    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Stores a customer directly, bypassing counters and failure modes.
    pub fn insert(&self, name: &str, age: u32) -> Customer {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let customer = Customer::new(id, name, age);
        self.storage
            .lock()
            .unwrap()
            .insert(id, customer.clone());
        customer
    }

    /// Gets all stored customers ordered by id.
    pub fn customers(&self) -> Vec<Customer> {
        self.storage.lock().unwrap().values().cloned().collect()
    }

    async fn enter(&self, write: bool) -> Result<(), AppError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if write {
            self.write_count.fetch_add(1, Ordering::Relaxed);
        }

        if let Some(ms) = self.config.latency_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        if self.config.should_fail && (write || !self.config.fail_writes_only) {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock database error".to_string());
            return Err(AppError::Database(DatabaseError::Query(msg)));
        }
        Ok(())
    }

    fn not_found(id: CustomerId) -> AppError {
        AppError::Database(DatabaseError::NotFound(format!("customer {id}")))
    }
}

impl Default for MockCustomerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerRepository for MockCustomerRepository {
    async fn health_check(&self) -> Result<(), AppError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(AppError::Database(DatabaseError::Connection(
                "Mock database unhealthy".to_string(),
            )));
        }
        Ok(())
    }

    async fn create(&self, customer: &NewCustomer) -> Result<CustomerId, AppError> {
        self.enter(true).await?;
        Ok(self.insert(&customer.name, customer.age).id)
    }

    async fn update(&self, id: CustomerId, patch: &CustomerPatch) -> Result<Customer, AppError> {
        self.enter(true).await?;

        // Mirrors the NOT NULL constraints of the real table.
        let (Some(name), Some(age)) = (patch.name.clone(), patch.age) else {
            return Err(AppError::Database(DatabaseError::Query(
                "NOT NULL constraint failed".to_string(),
            )));
        };

        let mut storage = self.storage.lock().unwrap();
        match storage.get_mut(&id) {
            Some(existing) => {
                existing.name = name;
                existing.age = age;
                Ok(existing.clone())
            }
            None => Err(Self::not_found(id)),
        }
    }

    async fn get_by_id(&self, id: CustomerId) -> Result<Customer, AppError> {
        self.enter(false).await?;

        let storage = self.storage.lock().unwrap();
        storage.get(&id).cloned().ok_or_else(|| Self::not_found(id))
    }

    async fn delete(&self, id: CustomerId) -> Result<(), AppError> {
        self.enter(true).await?;

        self.storage.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Customer>, AppError> {
        self.enter(false).await?;
        Ok(self.customers())
    }
}
