//! Domain layer containing core business types, traits, and error definitions.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{AppError, ConfigError, DatabaseError};
pub use traits::{CustomerRepository, CustomerService};
pub use types::{
    CreateCustomerRequest, Customer, CustomerData, CustomerId, CustomerListResponse, CustomerPatch,
    CustomerPath, CustomerResponse, ErrorResponse, HealthResponse, HealthStatus, MessageResponse,
    NewCustomer, UpdateCustomerRequest,
};
