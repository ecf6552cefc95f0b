//! Completion-backed advisory handlers.
//!
//! Both endpoints proxy the external completion service and require a
//! bearer token. Failures from the upstream surface as a single
//! external-service error; there is no retry.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiResult;
use crate::domain::RecommendationService;
use crate::domain::recommendation::{AdvisorProfile, MacroSuggestion, MealRecommendations};
use crate::middleware::AuthenticatedUser;

/// Meal recommendation payload: the profile plus free-form context.
///
/// The context field is accepted for forwards compatibility but does not
/// influence the ranking.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendMealsBody {
    /// Profile carrying the remaining macro targets.
    #[serde(default)]
    pub user_profile: AdvisorProfile,
    /// Free-form context (time of day, meals already eaten).
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

/// Envelope wrapping a macro suggestion.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuggestionEnvelope {
    /// Always `true` on success.
    pub success: bool,
    /// The advisor's suggestion.
    pub data: MacroSuggestion,
}

/// Envelope wrapping meal recommendations.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecommendationsEnvelope {
    /// Always `true` on success.
    pub success: bool,
    /// Ranked recommendations, best first.
    pub data: MealRecommendations,
}

/// Ask the advisor for daily macro targets fitting the profile.
#[utoipa::path(
    post,
    path = "/api/agents/suggest-macros",
    tags = ["agents"],
    request_body = AdvisorProfile,
    responses(
        (status = 200, description = "Macro suggestion", body = SuggestionEnvelope),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Completion service failed")
    )
)]
#[post("/api/agents/suggest-macros")]
pub async fn suggest_macros(
    _user: AuthenticatedUser,
    service: web::Data<RecommendationService>,
    body: web::Json<AdvisorProfile>,
) -> ApiResult<HttpResponse> {
    let suggestion = service.suggest_macros(&body).await?;
    Ok(HttpResponse::Ok().json(SuggestionEnvelope {
        success: true,
        data: suggestion,
    }))
}

/// Ask the recommender to rank the catalogue against the profile's
/// remaining macro targets.
#[utoipa::path(
    post,
    path = "/api/agents/recommend-meals",
    tags = ["agents"],
    request_body = RecommendMealsBody,
    responses(
        (status = 200, description = "Ranked recommendations", body = RecommendationsEnvelope),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Completion service failed")
    )
)]
#[post("/api/agents/recommend-meals")]
pub async fn recommend_meals(
    _user: AuthenticatedUser,
    service: web::Data<RecommendationService>,
    body: web::Json<RecommendMealsBody>,
) -> ApiResult<HttpResponse> {
    let ranking = service.recommend_meals(&body.user_profile).await?;
    Ok(HttpResponse::Ok().json(RecommendationsEnvelope {
        success: true,
        data: ranking,
    }))
}
