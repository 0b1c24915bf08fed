//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `agronomy` - Disease and soil reports, chat replies, prompts, reply
//!   normalization and image intake
pub mod agronomy;
