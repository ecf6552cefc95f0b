//! Dependency wiring and route registration.
//!
//! [`AppServices`] owns the fully constructed service graph; `main` builds
//! it from the pool and settings, while integration tests build it from
//! in-memory fakes. Both register the same routes via [`configure_api`], so
//! tests exercise the exact wiring the binary ships.

pub mod config;

pub use config::AppSettings;

use std::sync::Arc;

use actix_web::web;

use crate::api::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::api::{agents, auth, health, meals, orders, users};
use crate::domain::ports::{ChatCompletion, MealRepository, OrderRepository, UserRepository};
use crate::domain::{
    AuthService, MacroMatcher, OrderService, PasswordHasher, ProfileService,
    RecommendationService, TokenSigner,
};
use crate::outbound::completion::{DisabledCompletion, GroqClient, GroqClientConfig};
use crate::outbound::persistence::{
    DbPool, DieselMealRepository, DieselOrderRepository, DieselUserRepository,
};

/// The wired service graph shared by every worker.
#[derive(Clone)]
pub struct AppServices {
    matcher: MacroMatcher,
    meals: Arc<dyn MealRepository>,
    orders: OrderService,
    auth: AuthService,
    profile: ProfileService,
    recommender: RecommendationService,
    signer: TokenSigner,
}

impl AppServices {
    /// Wire the graph from explicit ports; used by tests with in-memory
    /// fakes.
    pub fn from_parts(
        users: Arc<dyn UserRepository>,
        meals: Arc<dyn MealRepository>,
        orders: Arc<dyn OrderRepository>,
        completion: Arc<dyn ChatCompletion>,
        hasher: PasswordHasher,
        signer: TokenSigner,
    ) -> Self {
        Self {
            matcher: MacroMatcher::new(meals.clone()),
            orders: OrderService::new(orders, meals.clone()),
            auth: AuthService::new(users.clone(), hasher, signer.clone()),
            profile: ProfileService::new(users),
            recommender: RecommendationService::new(meals.clone(), completion),
            meals,
            signer,
        }
    }

    /// Wire the graph from the database pool and settings.
    ///
    /// Without a completion API key the advisory endpoints stay routable
    /// but fail with an external-service error.
    ///
    /// # Errors
    ///
    /// Returns an error when the completion HTTP client cannot be built.
    pub fn from_pool(
        pool: &DbPool,
        settings: &AppSettings,
        jwt_secret: &str,
    ) -> Result<Self, reqwest::Error> {
        let users: Arc<dyn UserRepository> = Arc::new(DieselUserRepository::new(pool.clone()));
        let meals: Arc<dyn MealRepository> = Arc::new(DieselMealRepository::new(pool.clone()));
        let orders: Arc<dyn OrderRepository> = Arc::new(DieselOrderRepository::new(pool.clone()));

        let completion: Arc<dyn ChatCompletion> = match &settings.completion_api_key {
            Some(api_key) => Arc::new(GroqClient::new(GroqClientConfig {
                api_key: api_key.clone(),
                base_url: settings.completion_base_url().to_owned(),
                model: settings.completion_model().to_owned(),
                temperature: settings.completion_temperature(),
                max_tokens: settings.completion_max_tokens(),
            })?),
            None => Arc::new(DisabledCompletion),
        };

        Ok(Self::from_parts(
            users,
            meals,
            orders,
            completion,
            PasswordHasher::new(settings.bcrypt_cost()),
            TokenSigner::new(jwt_secret),
        ))
    }
}

/// Register shared state, payload error handlers, and every route.
///
/// The search route is registered before the `{id}` route so
/// `/api/meals/search` never resolves as a meal identifier.
pub fn configure_api(cfg: &mut web::ServiceConfig, services: &AppServices) {
    cfg.app_data(web::Data::new(services.matcher.clone()))
        .app_data(web::Data::new(services.meals.clone()))
        .app_data(web::Data::new(services.orders.clone()))
        .app_data(web::Data::new(services.auth.clone()))
        .app_data(web::Data::new(services.profile.clone()))
        .app_data(web::Data::new(services.recommender.clone()))
        .app_data(web::Data::new(services.signer.clone()))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(health::health)
        .service(auth::register)
        .service(auth::login)
        .service(meals::list_meals)
        .service(meals::search_meals)
        .service(meals::get_meal)
        .service(orders::create_order)
        .service(orders::list_orders)
        .service(orders::get_order)
        .service(orders::cancel_order)
        .service(users::get_profile)
        .service(users::update_profile)
        .service(agents::suggest_macros)
        .service(agents::recommend_meals);
}
