//! Customer CRUD service
//!
//! A small layered HTTP service that stores customers in SQLite and exposes
//! create, update, get, delete and list operations as JSON endpoints.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   API Layer                  │
//! │  HTTP handlers, routing, request validation  │
//! ├─────────────────────────────────────────────┤
//! │               Application Layer              │
//! │    Customer service, shared state, seeding   │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │          Traits, types and errors            │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │       SQLite repository, tracing setup       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Each layer only talks to the one below it through the traits in
//! [`domain`], so the storage backend can be swapped for the in-memory mock
//! in tests.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use crud_customer::api::{create_router, serve, shutdown_signal};
//! use crud_customer::app::AppState;
//! use crud_customer::config::AppConfig;
//! use crud_customer::infra::SqliteClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let db = Arc::new(SqliteClient::with_defaults(&config.database.url).await?);
//!     db.run_migrations().await?;
//!
//!     let router = create_router(Arc::new(AppState::new(db)), &config.server);
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     serve(listener, router, shutdown_signal(), config.server.shutdown_timeout).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
