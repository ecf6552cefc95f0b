//! Meal catalogue and macro-search handlers.

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::domain::matcher::ScoredMeal;
use crate::domain::meal::MealWithVendor;
use crate::domain::ports::MealRepository;
use crate::domain::{DomainError, MacroMatcher, MacroTargets, TolerancePercent};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Vendor fields exposed on meal listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VendorDto {
    /// Vendor display name.
    pub name: String,
    /// Vendor street address.
    pub address: String,
}

/// Catalogue meal joined with its vendor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MealDto {
    /// Meal identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Menu description.
    pub description: String,
    /// Protein grams.
    pub protein: f64,
    /// Carbohydrate grams.
    pub carbs: f64,
    /// Fat grams.
    pub fats: f64,
    /// Energy in kilocalories.
    pub calories: f64,
    /// Price in the vendor's currency unit.
    pub price: f64,
    /// Cuisine label.
    pub cuisine_type: String,
    /// Preparation time in minutes.
    pub preparation_time: i32,
    /// Whether the meal can currently be ordered.
    pub is_available: bool,
    /// Joined vendor summary.
    pub vendor: VendorDto,
    /// Catalogue insertion timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<MealWithVendor> for MealDto {
    fn from(row: MealWithVendor) -> Self {
        Self {
            id: row.meal.id,
            name: row.meal.name,
            description: row.meal.description,
            protein: row.meal.protein,
            carbs: row.meal.carbs,
            fats: row.meal.fats,
            calories: row.meal.calories,
            price: row.meal.price,
            cuisine_type: row.meal.cuisine_type,
            preparation_time: row.meal.preparation_time,
            is_available: row.meal.is_available,
            vendor: VendorDto {
                name: row.vendor.name,
                address: row.vendor.address,
            },
            created_at: row.meal.created_at,
        }
    }
}

/// A search hit: the meal plus its macro match score.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoredMealDto {
    /// The matching meal.
    #[serde(flatten)]
    pub meal: MealDto,
    /// Integer match percentage; 100 is an exact macro match.
    pub match_score: i32,
}

impl From<ScoredMeal> for ScoredMealDto {
    fn from(scored: ScoredMeal) -> Self {
        Self {
            meal: scored.meal.into(),
            match_score: scored.match_score,
        }
    }
}

/// Envelope for catalogue listings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MealListEnvelope {
    /// Always `true` on success.
    pub success: bool,
    /// Number of meals returned.
    pub count: usize,
    /// Catalogue entries, newest first.
    pub data: Vec<MealDto>,
}

/// Query parameters accepted by the macro search. Everything is optional at
/// the type level so missing parameters produce the documented message.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Target protein grams.
    pub protein: Option<f64>,
    /// Target carbohydrate grams.
    pub carbs: Option<f64>,
    /// Target fat grams.
    pub fats: Option<f64>,
    /// Tolerance percentage; defaults to 10.
    pub tolerance: Option<f64>,
}

/// The search parameters echoed back to the client.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchEcho {
    /// Target protein grams.
    pub protein: f64,
    /// Target carbohydrate grams.
    pub carbs: f64,
    /// Target fat grams.
    pub fats: f64,
    /// Applied tolerance percentage.
    pub tolerance: f64,
}

/// Envelope for macro-search results.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchEnvelope {
    /// Always `true` on success.
    pub success: bool,
    /// Number of hits.
    pub count: usize,
    /// The interpreted search parameters.
    pub query: SearchEcho,
    /// Hits sorted by descending match score.
    pub data: Vec<ScoredMealDto>,
}

/// Envelope for a single meal.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MealEnvelope {
    /// Always `true` on success.
    pub success: bool,
    /// The requested meal.
    pub data: MealDto,
}

/// List the full catalogue, newest first.
#[utoipa::path(
    get,
    path = "/api/meals",
    tags = ["meals"],
    responses(
        (status = 200, description = "Catalogue listing", body = MealListEnvelope)
    )
)]
#[get("/api/meals")]
pub async fn list_meals(repo: web::Data<Arc<dyn MealRepository>>) -> ApiResult<HttpResponse> {
    let meals = repo
        .list_with_vendor()
        .await
        .map_err(DomainError::from)?;
    let data: Vec<MealDto> = meals.into_iter().map(MealDto::from).collect();
    Ok(HttpResponse::Ok().json(MealListEnvelope {
        success: true,
        count: data.len(),
        data,
    }))
}

/// Search the catalogue for meals within a macro tolerance window.
#[utoipa::path(
    get,
    path = "/api/meals/search",
    tags = ["meals"],
    params(SearchQuery),
    responses(
        (status = 200, description = "Scored hits", body = SearchEnvelope),
        (status = 400, description = "Missing or invalid parameters")
    )
)]
#[get("/api/meals/search")]
pub async fn search_meals(
    matcher: web::Data<MacroMatcher>,
    query: web::Query<SearchQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let (Some(protein), Some(carbs), Some(fats)) = (query.protein, query.carbs, query.fats) else {
        return Err(DomainError::invalid_request(
            "Missing required parameters: protein, carbs, fats",
        )
        .into());
    };

    let targets = MacroTargets::try_new(protein, carbs, fats)
        .map_err(|err| DomainError::invalid_request(err.to_string()))?;
    let tolerance = match query.tolerance {
        Some(raw) => TolerancePercent::try_new(raw)
            .map_err(|err| DomainError::invalid_request(err.to_string()))?,
        None => TolerancePercent::default(),
    };

    let hits = matcher.search(targets, tolerance).await?;
    let data: Vec<ScoredMealDto> = hits.into_iter().map(ScoredMealDto::from).collect();
    Ok(HttpResponse::Ok().json(SearchEnvelope {
        success: true,
        count: data.len(),
        query: SearchEcho {
            protein,
            carbs,
            fats,
            tolerance: tolerance.value(),
        },
        data,
    }))
}

/// Fetch a single meal by id.
#[utoipa::path(
    get,
    path = "/api/meals/{id}",
    tags = ["meals"],
    params(("id" = Uuid, Path, description = "Meal identifier")),
    responses(
        (status = 200, description = "The meal", body = MealEnvelope),
        (status = 404, description = "Unknown meal")
    )
)]
#[get("/api/meals/{id}")]
pub async fn get_meal(
    repo: web::Data<Arc<dyn MealRepository>>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let meal = repo
        .find_by_id(id)
        .await
        .map_err(DomainError::from)?
        .ok_or_else(|| DomainError::not_found("Meal not found"))?;
    Ok(HttpResponse::Ok().json(MealEnvelope {
        success: true,
        data: meal.into(),
    }))
}
