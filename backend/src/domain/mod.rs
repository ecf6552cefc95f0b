//! Domain layer: core types, services, and the ports they depend on.
//!
//! Nothing in this module knows about HTTP, Diesel, or the completion
//! service's wire format. Adapters live under `api` and `outbound` and
//! talk to this layer through the traits in [`ports`].

pub mod auth_service;
pub mod error;
pub mod matcher;
pub mod meal;
pub mod order;
pub mod order_service;
pub mod ports;
pub mod profile_service;
pub mod prompts;
pub mod recommendation;
pub mod user;

pub use auth_service::{AuthService, AuthenticatedSession, PasswordHasher, TokenSigner};
pub use error::{DomainError, ErrorCode};
pub use matcher::{MacroMatcher, ScoredMeal};
pub use meal::{MacroSplit, MacroTargets, MacroWindows, Meal, MealWithVendor, TolerancePercent};
pub use order::{Order, OrderStatus};
pub use order_service::OrderService;
pub use profile_service::ProfileService;
pub use recommendation::RecommendationService;
pub use user::{EmailAddress, ProfileChanges, PublicUser, User};
