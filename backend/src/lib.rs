//! Macro-aware meal ordering backend.
//!
//! The crate is organised hexagonally:
//!
//! - [`domain`] holds the core types, services, and the ports they need.
//! - [`api`] is the inbound HTTP adapter: handlers, DTOs, error envelope.
//! - [`outbound`] holds the driven adapters: PostgreSQL repositories and
//!   the chat-completion client.
//! - [`middleware`] carries the request-id middleware and the bearer-token
//!   extractor.
//! - [`server`] wires the graph and registers routes; the same wiring is
//!   used by the binary and by the integration tests.

pub mod api;
pub mod doc;
pub mod domain;
pub mod middleware;
pub mod outbound;
pub mod server;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use middleware::RequestIdentity;
