//! Health endpoint for orchestration and load balancers.

use actix_web::{HttpResponse, get};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness payload returned by the health endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    /// Always `"ok"` while the process serves traffic.
    #[schema(example = "ok")]
    pub status: String,
    /// Server time at the moment of the probe.
    pub timestamp: DateTime<Utc>,
}

/// Liveness probe. Returns 200 while the process is serving traffic.
#[utoipa::path(
    get,
    path = "/health",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive", body = HealthStatus)
    )
)]
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_owned(),
        timestamp: Utc::now(),
    })
}
