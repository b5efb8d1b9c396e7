//! Axum HTTP adapter exposing the field codec and the validation toolkit.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Inject shared application state (`AppState`) into handlers.
//! - Map codec errors and validation verdicts onto the JSON protocol in `common`.
//!
//! Record storage, sessions, and rendering belong to the caller.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
