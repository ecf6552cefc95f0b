//! Driven adapters: PostgreSQL persistence and the completion-service
//! client.

pub mod completion;
pub mod persistence;
