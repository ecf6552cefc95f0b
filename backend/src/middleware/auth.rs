//! Bearer-token authentication extractor.
//!
//! Protected handlers take an [`AuthenticatedUser`] argument; extraction
//! verifies the `Authorization: Bearer` header against the configured
//! [`TokenSigner`] and rejects the request with a 401 envelope before the
//! handler runs.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::domain::{DomainError, TokenSigner};

/// Identity extracted from a verified bearer token.
///
/// Handlers must scope every read and mutation to this identity; client
/// supplied user ids are never trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The authenticated user's identifier.
    pub user_id: Uuid,
    /// The e-mail bound into the token at issue time.
    pub email: String,
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let signer = req
        .app_data::<web::Data<TokenSigner>>()
        .ok_or_else(|| ApiError::from(DomainError::internal("token signer not configured")))?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::from(DomainError::unauthorized("Authentication required")))?;

    let claims = signer.verify(token)?;
    Ok(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
