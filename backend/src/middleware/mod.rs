//! Actix middleware and request extractors.

pub mod auth;
pub mod request_id;

pub use auth::AuthenticatedUser;
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdentity};
