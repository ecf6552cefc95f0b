//! Profile handlers for the authenticated user.

use actix_web::{HttpResponse, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiResult;
use crate::domain::{ProfileChanges, ProfileService, PublicUser};
use crate::middleware::AuthenticatedUser;

/// Partial profile update payload; omitted fields are left untouched.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileBody {
    /// New display name.
    pub name: Option<String>,
    /// New age in years.
    pub age: Option<i32>,
    /// New body weight in kilograms.
    pub weight: Option<f64>,
    /// New height in centimetres.
    pub height: Option<f64>,
    /// New activity level.
    pub activity_level: Option<String>,
    /// New goal.
    pub goal: Option<String>,
    /// New protein target in grams.
    pub target_protein: Option<f64>,
    /// New carbohydrate target in grams.
    pub target_carbs: Option<f64>,
    /// New fat target in grams.
    pub target_fats: Option<f64>,
}

impl From<UpdateProfileBody> for ProfileChanges {
    fn from(body: UpdateProfileBody) -> Self {
        Self {
            name: body.name,
            age: body.age,
            weight: body.weight,
            height: body.height,
            activity_level: body.activity_level,
            goal: body.goal,
            target_protein: body.target_protein,
            target_carbs: body.target_carbs,
            target_fats: body.target_fats,
        }
    }
}

/// Envelope wrapping a profile payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileEnvelope {
    /// Always `true` on success.
    pub success: bool,
    /// The caller's sanitized profile.
    pub data: PublicUser,
}

/// Fetch the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/users/profile",
    tags = ["users"],
    responses(
        (status = 200, description = "The caller's profile", body = ProfileEnvelope),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
#[get("/api/users/profile")]
pub async fn get_profile(
    user: AuthenticatedUser,
    service: web::Data<ProfileService>,
) -> ApiResult<HttpResponse> {
    let profile = service.get(user.user_id).await?;
    Ok(HttpResponse::Ok().json(ProfileEnvelope {
        success: true,
        data: profile,
    }))
}

/// Apply a partial update to the authenticated user's profile.
#[utoipa::path(
    put,
    path = "/api/users/profile",
    tags = ["users"],
    request_body = UpdateProfileBody,
    responses(
        (status = 200, description = "The updated profile", body = ProfileEnvelope),
        (status = 400, description = "Empty change set or blank name"),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
#[put("/api/users/profile")]
pub async fn update_profile(
    user: AuthenticatedUser,
    service: web::Data<ProfileService>,
    body: web::Json<UpdateProfileBody>,
) -> ApiResult<HttpResponse> {
    let profile = service.update(user.user_id, body.into_inner().into()).await?;
    Ok(HttpResponse::Ok().json(ProfileEnvelope {
        success: true,
        data: profile,
    }))
}
