//! Application layer containing business logic and shared state.

pub mod seed;
pub mod service;
pub mod state;

pub use seed::{DEFAULT_SEED_COUNT, seed_customers};
pub use service::AppService;
pub use state::AppState;
