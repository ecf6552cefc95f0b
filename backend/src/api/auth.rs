//! Registration and login handlers.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiResult;
use crate::domain::auth_service::AuthenticatedSession;
use crate::domain::{AuthService, DomainError, PublicUser};

/// Registration payload. Fields are optional so missing keys produce the
/// documented validation message instead of a generic deserialization error.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterBody {
    /// Display name.
    pub name: Option<String>,
    /// E-mail address; normalized before storage.
    pub email: Option<String>,
    /// Plaintext password; only its bcrypt hash is stored.
    pub password: Option<String>,
}

/// Login payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginBody {
    /// E-mail address.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
}

/// Sanitized user plus bearer token, as returned by both auth endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionDto {
    /// The registered or authenticated user.
    pub user: PublicUser,
    /// Signed bearer token for the `Authorization` header.
    pub token: String,
}

/// Envelope wrapping a session payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionEnvelope {
    /// Always `true` on success.
    pub success: bool,
    /// Session payload.
    pub data: SessionDto,
}

fn envelope(session: AuthenticatedSession) -> SessionEnvelope {
    SessionEnvelope {
        success: true,
        data: SessionDto {
            user: session.user,
            token: session.token,
        },
    }
}

/// Register a new account and issue a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tags = ["auth"],
    request_body = RegisterBody,
    responses(
        (status = 201, description = "Account created", body = SessionEnvelope),
        (status = 400, description = "Missing fields or duplicate e-mail")
    )
)]
#[post("/api/auth/register")]
pub async fn register(
    service: web::Data<AuthService>,
    body: web::Json<RegisterBody>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let (Some(name), Some(email), Some(password)) = (body.name, body.email, body.password) else {
        return Err(DomainError::invalid_request("Missing required fields: name, email, password").into());
    };

    let session = service.register(&name, &email, &password).await?;
    Ok(HttpResponse::Created().json(envelope(session)))
}

/// Authenticate an existing account and issue a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tags = ["auth"],
    request_body = LoginBody,
    responses(
        (status = 200, description = "Authenticated", body = SessionEnvelope),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Invalid credentials")
    )
)]
#[post("/api/auth/login")]
pub async fn login(
    service: web::Data<AuthService>,
    body: web::Json<LoginBody>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(DomainError::invalid_request("Email and password are required").into());
    };

    let session = service.login(&email, &password).await?;
    Ok(HttpResponse::Ok().json(envelope(session)))
}
