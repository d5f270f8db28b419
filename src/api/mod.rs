//! The API layer, containing web handlers, routing and the server loop.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use router::create_router;
pub use server::{serve, shutdown_signal};
