//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API:
//! every handler path, the request/response DTOs, and the bearer-token
//! security scheme. Swagger UI serves the document in debug builds only.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::{agents, auth, error, health, meals, orders, users};
use crate::domain::order::OrderStatus;
use crate::domain::ErrorCode;
use crate::domain::recommendation::{
    AdvisorProfile, MacroBreakdown, MacroSuggestion, MealRecommendation, MealRecommendations,
};
use crate::domain::user::PublicUser;

/// Enrich the generated document with the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token issued by POST /api/auth/register or /api/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "NutriFix backend API",
        description = "Macro-aware meal ordering: catalogue search, order lifecycle, \
                       and completion-backed nutrition advice."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        health::health,
        auth::register,
        auth::login,
        meals::list_meals,
        meals::search_meals,
        meals::get_meal,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::cancel_order,
        users::get_profile,
        users::update_profile,
        agents::suggest_macros,
        agents::recommend_meals,
    ),
    components(schemas(
        error::ErrorEnvelope,
        ErrorCode,
        health::HealthStatus,
        auth::RegisterBody,
        auth::LoginBody,
        auth::SessionDto,
        auth::SessionEnvelope,
        PublicUser,
        meals::VendorDto,
        meals::MealDto,
        meals::ScoredMealDto,
        meals::MealListEnvelope,
        meals::SearchEcho,
        meals::SearchEnvelope,
        meals::MealEnvelope,
        orders::CreateOrderBody,
        OrderStatus,
        orders::OrderDto,
        orders::OrderCreatedEnvelope,
        orders::OrderListEnvelope,
        orders::OrderEnvelope,
        orders::OrderCancelledEnvelope,
        users::UpdateProfileBody,
        users::ProfileEnvelope,
        AdvisorProfile,
        MacroBreakdown,
        MacroSuggestion,
        MealRecommendation,
        MealRecommendations,
        agents::RecommendMealsBody,
        agents::SuggestionEnvelope,
        agents::RecommendationsEnvelope,
    )),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "auth", description = "Registration and login"),
        (name = "meals", description = "Catalogue listing and macro search"),
        (name = "orders", description = "Order lifecycle"),
        (name = "users", description = "Profile management"),
        (name = "agents", description = "Completion-backed nutrition advice")
    )
)]
pub struct ApiDoc;
