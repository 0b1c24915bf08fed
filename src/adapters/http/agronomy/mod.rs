//! HTTP adapter for the agronomy endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ChatRequest, ErrorResponse, HealthResponse, ServiceInfoResponse};
pub use handlers::{AgronomyApiError, AgronomyAppState, IMAGE_FIELD};
pub use routes::agronomy_router;
