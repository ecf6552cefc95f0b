//! Prompt templates for the completion-backed recommendation facade.
//!
//! The system prompts pin the reply shape; the builders do plain template
//! substitution with `Not specified` fallbacks for absent profile fields.

use crate::domain::meal::{MacroSplit, MealWithVendor};
use crate::domain::recommendation::AdvisorProfile;

/// System prompt for the macro-target advisor exchange.
pub const MACRO_ADVISOR_SYSTEM: &str = "\
You are a professional nutritionist and fitness advisor specializing in macro-based meal planning.

Your role:
1. Analyze user profiles (age, weight, height, activity level, goals)
2. Calculate optimal macro targets (protein, carbs, fats in grams)
3. Provide evidence-based reasoning
4. Suggest weekly adjustment strategies

Guidelines:
- Protein: 1.6-2.2g per kg bodyweight (higher for muscle gain)
- Fats: 20-35% of total calories
- Carbs: Fill remaining calories based on activity level
- Adjust for training volume and individual response

Return structured JSON ONLY with this exact format:
{
  \"macros\": { \"protein\": number, \"carbs\": number, \"fats\": number, \"calories\": number },
  \"reasoning\": \"Detailed explanation of calculations\",
  \"confidence\": number between 0 and 1,
  \"weekly_adjustments\": \"How to adjust macros over time\"
}";

/// System prompt for the meal-ranking exchange.
pub const MEAL_RECOMMENDER_SYSTEM: &str = "\
You are an intelligent meal recommendation engine for fitness enthusiasts.

Your role:
1. Match available meals to user's remaining macro targets
2. Consider context (time of day, previous meals eaten, dietary preferences)
3. Provide variety to prevent meal fatigue
4. Optimize for macro accuracy while respecting user preferences

Ranking criteria (in priority order):
1. Macro match accuracy (most important)
2. Meal diversity (avoid repetition from previous meals)
3. Time-appropriate (breakfast/lunch/dinner/post-workout)
4. Dietary restrictions compliance
5. Price and delivery time

Return JSON with top 5 meal recommendations and reasoning.";

fn or_not_specified<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "Not specified".to_owned(), |v| v.to_string())
}

/// User prompt for the macro advisor, embedding the known profile fields.
pub fn macro_advisor_prompt(profile: &AdvisorProfile) -> String {
    format!(
        "User Profile:\n\
         - Age: {age}\n\
         - Weight: {weight}kg\n\
         - Height: {height}cm\n\
         - Goal: {goal}\n\
         - Activity Level: {activity}\n\
         \n\
         Calculate optimal macro targets (protein/carbs/fats in grams and total calories).\n\
         Consider basal metabolic rate, activity multiplier, and goal-specific adjustments.",
        age = or_not_specified(profile.age),
        weight = or_not_specified(profile.weight),
        height = or_not_specified(profile.height),
        goal = or_not_specified(profile.goal.as_deref()),
        activity = or_not_specified(profile.activity_level.as_deref()),
    )
}

/// User prompt for the meal recommender: target macros plus one line per
/// catalogue meal.
pub fn meal_recommender_prompt(targets: MacroSplit, meals: &[MealWithVendor]) -> String {
    let meal_lines: Vec<String> = meals
        .iter()
        .map(|row| {
            format!(
                "{}: P:{}g C:{}g F:{}g (₹{})",
                row.meal.name, row.meal.protein, row.meal.carbs, row.meal.fats, row.meal.price
            )
        })
        .collect();

    format!(
        "Target Macros:\n\
         - Protein: {protein}g\n\
         - Carbs: {carbs}g\n\
         - Fats: {fats}g\n\
         \n\
         Available Meals:\n\
         {meals}\n\
         \n\
         Recommend top 5 meals that best match the target macros.\n\
         \n\
         YOU MUST respond with valid JSON only. No markdown, no code blocks, no explanations.\n\
         Format: {{ \"recommendations\": [{{ \"mealName\": \"...\", \"reasoning\": \"...\", \"macroMatch\": \"...\" }}] }}",
        protein = targets.protein,
        carbs = targets.carbs,
        fats = targets.fats,
        meals = meal_lines.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    //! Prompt substitution coverage.
    use super::*;
    use crate::domain::meal::{Meal, VendorSummary};
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn missing_profile_fields_render_not_specified() {
        let profile = AdvisorProfile {
            age: Some(30),
            weight: None,
            height: None,
            activity_level: None,
            goal: Some("muscle gain".into()),
            target_protein: None,
            target_carbs: None,
            target_fats: None,
        };
        let prompt = macro_advisor_prompt(&profile);
        assert!(prompt.contains("- Age: 30"));
        assert!(prompt.contains("- Weight: Not specifiedkg"));
        assert!(prompt.contains("- Goal: muscle gain"));
        assert!(prompt.contains("- Activity Level: Not specified"));
    }

    #[rstest]
    fn recommender_prompt_lists_each_meal() {
        let meal = MealWithVendor {
            meal: Meal {
                id: Uuid::new_v4(),
                vendor_id: Uuid::new_v4(),
                name: "Grilled Chicken Bowl".into(),
                description: String::new(),
                protein: 45.0,
                carbs: 50.0,
                fats: 12.0,
                calories: 488.0,
                price: 250.0,
                cuisine_type: "Continental".into(),
                preparation_time: 25,
                is_available: true,
                created_at: Utc::now(),
            },
            vendor: VendorSummary {
                name: "FitMeals".into(),
                address: "Anna Nagar".into(),
            },
        };
        let prompt = meal_recommender_prompt(
            MacroSplit {
                protein: 40.0,
                carbs: 45.0,
                fats: 15.0,
            },
            &[meal],
        );
        assert!(prompt.contains("Grilled Chicken Bowl: P:45g C:50g F:12g (₹250)"));
        assert!(prompt.contains("- Protein: 40g"));
        assert!(prompt.contains("valid JSON only"));
    }
}
