//! AgriSmart ML - Crop health, soil analysis and farming chat
//!
//! Photos and questions are forwarded to a hosted Gemini model; its free-text
//! replies are normalized into fixed records the frontend can rely on.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
