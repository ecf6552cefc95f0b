//! Completion-backed recommendation facade.
//!
//! Thin orchestration: build a prompt, call the completion port, parse the
//! strict-JSON reply. Best-effort by contract — any transport or parse
//! failure surfaces as a single external-service error with no retry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;
use crate::domain::meal::MacroSplit;
use crate::domain::ports::{ChatCompletion, CompletionRequest, MealRepository};
use crate::domain::prompts;

/// Profile fields accepted by the recommendation endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorProfile {
    /// Age in years.
    pub age: Option<u32>,
    /// Body weight in kilograms.
    pub weight: Option<f64>,
    /// Height in centimetres.
    pub height: Option<f64>,
    /// Free-form activity level.
    pub activity_level: Option<String>,
    /// Free-form goal.
    pub goal: Option<String>,
    /// Remaining protein target in grams.
    pub target_protein: Option<f64>,
    /// Remaining carbohydrate target in grams.
    pub target_carbs: Option<f64>,
    /// Remaining fat target in grams.
    pub target_fats: Option<f64>,
}

impl AdvisorProfile {
    /// Target macro triple, with absent axes defaulting to zero as the
    /// recommender contract specifies.
    pub fn target_macros(&self) -> MacroSplit {
        MacroSplit {
            protein: self.target_protein.unwrap_or(0.0),
            carbs: self.target_carbs.unwrap_or(0.0),
            fats: self.target_fats.unwrap_or(0.0),
        }
    }
}

/// Macro targets proposed by the advisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MacroBreakdown {
    /// Protein grams per day.
    pub protein: f64,
    /// Carbohydrate grams per day.
    pub carbs: f64,
    /// Fat grams per day.
    pub fats: f64,
    /// Total kilocalories per day.
    pub calories: f64,
}

/// Structured macro suggestion returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MacroSuggestion {
    /// Proposed daily targets.
    pub macros: MacroBreakdown,
    /// The advisor's explanation.
    pub reasoning: String,
    /// Self-reported confidence between 0 and 1.
    pub confidence: f64,
    /// Weekly adjustment strategy, when provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustments: Option<String>,
}

/// Reply shape requested from the completion service for macro advice.
#[derive(Debug, Deserialize)]
struct RawMacroSuggestion {
    macros: MacroBreakdown,
    reasoning: String,
    confidence: f64,
    weekly_adjustments: Option<String>,
}

/// One ranked meal recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MealRecommendation {
    /// Name of the recommended catalogue meal.
    pub meal_name: String,
    /// Why the meal was chosen.
    pub reasoning: String,
    /// Textual macro-fit summary.
    pub macro_match: Option<String>,
}

/// Top-5 ranking returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MealRecommendations {
    /// Ranked recommendations, best first.
    pub recommendations: Vec<MealRecommendation>,
}

/// Orchestrates macro-suggestion and meal-recommendation exchanges.
#[derive(Clone)]
pub struct RecommendationService {
    meals: Arc<dyn MealRepository>,
    completion: Arc<dyn ChatCompletion>,
}

impl RecommendationService {
    /// Create the facade from its collaborators.
    pub fn new(meals: Arc<dyn MealRepository>, completion: Arc<dyn ChatCompletion>) -> Self {
        Self { meals, completion }
    }

    /// Ask the completion service for macro targets fitting the profile.
    pub async fn suggest_macros(
        &self,
        profile: &AdvisorProfile,
    ) -> Result<MacroSuggestion, DomainError> {
        let request = CompletionRequest {
            system: prompts::MACRO_ADVISOR_SYSTEM.to_owned(),
            user: prompts::macro_advisor_prompt(profile),
            json_object: true,
        };

        let content = self.completion.complete(&request).await.map_err(|err| {
            error!(error = %err, "macro advisor exchange failed");
            DomainError::external_service("Failed to generate macro suggestions")
        })?;

        let raw: RawMacroSuggestion = serde_json::from_str(&content).map_err(|err| {
            error!(error = %err, "macro advisor reply was not parseable JSON");
            DomainError::external_service("Failed to generate macro suggestions")
        })?;

        Ok(MacroSuggestion {
            macros: raw.macros,
            reasoning: raw.reasoning,
            confidence: raw.confidence,
            adjustments: raw.weekly_adjustments,
        })
    }

    /// Ask the completion service to rank the catalogue against the
    /// profile's remaining macro targets.
    pub async fn recommend_meals(
        &self,
        profile: &AdvisorProfile,
    ) -> Result<MealRecommendations, DomainError> {
        let catalogue = self.meals.list_with_vendor().await?;
        let request = CompletionRequest {
            system: prompts::MEAL_RECOMMENDER_SYSTEM.to_owned(),
            user: prompts::meal_recommender_prompt(profile.target_macros(), &catalogue),
            json_object: true,
        };

        let content = self.completion.complete(&request).await.map_err(|err| {
            error!(error = %err, "meal recommender exchange failed");
            DomainError::external_service("Failed to recommend meals")
        })?;

        serde_json::from_str(&content).map_err(|err| {
            error!(error = %err, "meal recommender reply was not parseable JSON");
            DomainError::external_service("Failed to recommend meals")
        })
    }
}

#[cfg(test)]
mod tests {
    //! Facade behaviour with a scripted completion stub.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::meal::{MacroWindows, Meal, MealWithVendor, VendorSummary};
    use crate::domain::ports::{CompletionError, RepositoryError};
    use async_trait::async_trait;
    use chrono::Utc;
    use rstest::rstest;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct EmptyCatalogue;

    #[async_trait]
    impl MealRepository for EmptyCatalogue {
        async fn list_with_vendor(&self) -> Result<Vec<MealWithVendor>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<MealWithVendor>, RepositoryError> {
            Ok(None)
        }

        async fn find_available_within(
            &self,
            _windows: &MacroWindows,
        ) -> Result<Vec<MealWithVendor>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    struct OneMealCatalogue;

    #[async_trait]
    impl MealRepository for OneMealCatalogue {
        async fn list_with_vendor(&self) -> Result<Vec<MealWithVendor>, RepositoryError> {
            Ok(vec![MealWithVendor {
                meal: Meal {
                    id: Uuid::new_v4(),
                    vendor_id: Uuid::new_v4(),
                    name: "Paneer Tikka Bowl".into(),
                    description: String::new(),
                    protein: 32.0,
                    carbs: 40.0,
                    fats: 18.0,
                    calories: 450.0,
                    price: 220.0,
                    cuisine_type: "North Indian".into(),
                    preparation_time: 30,
                    is_available: true,
                    created_at: Utc::now(),
                },
                vendor: VendorSummary {
                    name: "Protein Kitchen".into(),
                    address: "T Nagar".into(),
                },
            }])
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<MealWithVendor>, RepositoryError> {
            Ok(None)
        }

        async fn find_available_within(
            &self,
            _windows: &MacroWindows,
        ) -> Result<Vec<MealWithVendor>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    struct ScriptedCompletion {
        reply: Result<String, CompletionError>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedCompletion {
        fn replying(content: &str) -> Self {
            Self {
                reply: Ok(content.to_owned()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: CompletionError) -> Self {
            Self {
                reply: Err(error),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatCompletion for ScriptedCompletion {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            self.seen.lock().expect("seen lock").push(request.clone());
            self.reply.clone()
        }
    }

    const SUGGESTION_JSON: &str = r#"{
        "macros": { "protein": 150, "carbs": 220, "fats": 70, "calories": 2110 },
        "reasoning": "Based on bodyweight and goal.",
        "confidence": 0.82,
        "weekly_adjustments": "Add 10g carbs if weight stalls."
    }"#;

    #[rstest]
    fn suggest_macros_parses_structured_reply() {
        let stub = Arc::new(ScriptedCompletion::replying(SUGGESTION_JSON));
        let service = RecommendationService::new(Arc::new(EmptyCatalogue), stub.clone());

        actix_rt::System::new().block_on(async move {
            let suggestion = service
                .suggest_macros(&AdvisorProfile {
                    age: Some(28),
                    weight: Some(75.0),
                    ..AdvisorProfile::default()
                })
                .await
                .expect("suggestion succeeds");
            assert_eq!(suggestion.macros.protein, 150.0);
            assert_eq!(suggestion.confidence, 0.82);
            assert_eq!(
                suggestion.adjustments.as_deref(),
                Some("Add 10g carbs if weight stalls.")
            );

            let seen = stub.seen.lock().expect("seen lock");
            assert!(seen[0].json_object);
            assert!(seen[0].user.contains("- Age: 28"));
            assert!(seen[0].user.contains("- Weight: 75kg"));
        });
    }

    #[rstest]
    fn unparseable_reply_is_an_external_service_error() {
        let stub = Arc::new(ScriptedCompletion::replying("I think you should eat more."));
        let service = RecommendationService::new(Arc::new(EmptyCatalogue), stub);

        actix_rt::System::new().block_on(async move {
            let err = service
                .suggest_macros(&AdvisorProfile::default())
                .await
                .expect_err("garbage rejected");
            assert_eq!(err.code(), ErrorCode::ExternalService);
            assert_eq!(err.message(), "Failed to generate macro suggestions");
        });
    }

    #[rstest]
    fn transport_failure_is_an_external_service_error() {
        let stub = Arc::new(ScriptedCompletion::failing(CompletionError::Status {
            status: 429,
        }));
        let service = RecommendationService::new(Arc::new(EmptyCatalogue), stub);

        actix_rt::System::new().block_on(async move {
            let err = service
                .recommend_meals(&AdvisorProfile::default())
                .await
                .expect_err("failure surfaces");
            assert_eq!(err.code(), ErrorCode::ExternalService);
            assert_eq!(err.message(), "Failed to recommend meals");
        });
    }

    #[rstest]
    fn recommend_meals_embeds_catalogue_and_targets() {
        let stub = Arc::new(ScriptedCompletion::replying(
            r#"{ "recommendations": [{ "mealName": "Paneer Tikka Bowl", "reasoning": "Closest fit", "macroMatch": "32/40/18" }] }"#,
        ));
        let service = RecommendationService::new(Arc::new(OneMealCatalogue), stub.clone());

        actix_rt::System::new().block_on(async move {
            let ranking = service
                .recommend_meals(&AdvisorProfile {
                    target_protein: Some(35.0),
                    target_carbs: Some(45.0),
                    ..AdvisorProfile::default()
                })
                .await
                .expect("ranking succeeds");
            assert_eq!(ranking.recommendations.len(), 1);
            assert_eq!(ranking.recommendations[0].meal_name, "Paneer Tikka Bowl");

            let seen = stub.seen.lock().expect("seen lock");
            assert!(seen[0].user.contains("Paneer Tikka Bowl: P:32g C:40g F:18g (₹220)"));
            assert!(seen[0].user.contains("- Protein: 35g"));
            // Absent targets default to zero rather than failing.
            assert!(seen[0].user.contains("- Fats: 0g"));
        });
    }
}
