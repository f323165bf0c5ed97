//! Web server module
//!
//! Provides the HTTP API consumed by the mention UI.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
pub use state::AppState;
