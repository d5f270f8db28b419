//! Concrete database client implementations.
//!
//! This module contains the storage adapter that implements the
//! `CustomerRepository` trait defined in the domain layer.

pub mod sqlite;

pub use sqlite::{SqliteClient, SqliteConfig};
