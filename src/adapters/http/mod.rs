//! HTTP adapters - REST API implementations.

pub mod agronomy;
mod app;

pub use agronomy::{agronomy_router, AgronomyAppState};
pub use app::build_router;
