//! Inbound HTTP adapters: handlers, DTOs, and the error envelope.

pub mod agents;
pub mod auth;
pub mod error;
pub mod health;
pub mod meals;
pub mod orders;
pub mod users;

pub use error::{ApiError, ApiResult, ErrorEnvelope};
