//! Server module for serving the dashboard form actions over HTTP
//!
//! This module provides a `ServerBuilder` that wires:
//! - Invoice create/update/delete actions onto POST routes
//! - The cached invoice listing view
//! - The credentials login action

pub mod builder;
pub mod handlers;
pub mod router;
pub mod seed;

pub use builder::ServerBuilder;
pub use handlers::AppState;
pub use router::build_routes;
pub use seed::seed_users;
