use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{debug, instrument, warn};

use super::fallback::{self, FallbackKeyStrategy, FallbackMeal};
use super::model::{FoodItem, FoodKey, MealItem, NewFoodItem, Nutrition};
use super::recipes::{NutrientQuery, RecipeApiError, RecipeSource, RecipeSummary};
use super::repo::FoodStore;
use super::slot::SlotType;
use crate::error::PlanError;

/// Budget for one resolution of a meal slot.
#[derive(Debug, Clone)]
pub struct SlotRequest<'a> {
    pub slot: SlotType,
    pub target_calories: f64,
    pub target_protein: f64,
    pub target_carbohydrates: f64,
    pub target_fat: f64,
    pub dietary_preferences: &'a [String],
}

/// Turns a slot budget into concrete, stored meal content.
///
/// The recipe API is tried first; any failure or an empty result falls back to
/// the built-in table. Stored foods are looked up by key before creation so the
/// same recipe or fallback meal is only ever stored once.
pub struct MealContentResolver {
    foods: Arc<dyn FoodStore>,
    recipes: Arc<dyn RecipeSource>,
    key_strategy: FallbackKeyStrategy,
}

impl MealContentResolver {
    pub fn new(
        foods: Arc<dyn FoodStore>,
        recipes: Arc<dyn RecipeSource>,
        key_strategy: FallbackKeyStrategy,
    ) -> Self {
        Self {
            foods,
            recipes,
            key_strategy,
        }
    }

    #[instrument(
        skip(self, request),
        fields(
            slot = request.slot.as_str(),
            calories = request.target_calories,
            protein = request.target_protein,
            carbohydrates = request.target_carbohydrates,
            fat = request.target_fat,
        )
    )]
    pub async fn resolve(&self, request: &SlotRequest<'_>) -> Result<Vec<MealItem>, PlanError> {
        let food = match self.from_recipe_api(request).await? {
            Some(food) => food,
            None => self.from_fallback(request).await?,
        };
        debug!(food_id = %food.id, name = %food.name, "slot resolved");
        Ok(vec![MealItem::one_serving(food.id, request.slot)])
    }

    async fn from_recipe_api(&self, request: &SlotRequest<'_>) -> Result<Option<FoodItem>, PlanError> {
        let query = NutrientQuery::around(
            request.target_calories,
            request.target_protein,
            request.dietary_preferences,
        );
        let matches = match self.recipes.find_by_nutrients(&query).await {
            Ok(matches) => matches,
            Err(RecipeApiError::NotConfigured) => return Ok(None),
            Err(e) => {
                warn!(error = %e, "recipe API unavailable; using fallback meals");
                return Ok(None);
            }
        };
        let Some(recipe) = pick(&matches).cloned() else {
            debug!("recipe API returned no matches; using fallback meals");
            return Ok(None);
        };
        self.store_recipe(request.slot, recipe).await.map(Some)
    }

    async fn store_recipe(&self, slot: SlotType, recipe: RecipeSummary) -> Result<FoodItem, PlanError> {
        let food = NewFoodItem {
            name: recipe.title,
            category: slot.as_str().to_string(),
            nutrition: Nutrition {
                calories: recipe.calories,
                protein: recipe.protein,
                carbohydrates: recipe.carbohydrates,
                fat: recipe.fat,
                ..Nutrition::default()
            },
            serving_size: "1 serving".to_string(),
            key: FoodKey::Source(recipe.id.to_string()),
        };
        self.find_or_create(food).await
    }

    async fn from_fallback(&self, request: &SlotRequest<'_>) -> Result<FoodItem, PlanError> {
        let options = fallback::options(request.slot);
        let meal = pick(options).unwrap_or(&options[0]);
        self.store_fallback(request.slot, meal, request.target_calories)
            .await
    }

    /// Stores `meal` scaled to `target_calories`, unless its key already exists.
    pub async fn store_fallback(
        &self,
        slot: SlotType,
        meal: &FallbackMeal,
        target_calories: f64,
    ) -> Result<FoodItem, PlanError> {
        let nutrition = fallback::scale(meal, target_calories);
        let key = fallback::fallback_key(slot, meal, &nutrition, self.key_strategy);
        let food = NewFoodItem {
            name: meal.name.to_string(),
            category: slot.as_str().to_string(),
            nutrition,
            serving_size: "1 serving".to_string(),
            key: FoodKey::Fallback(key),
        };
        self.find_or_create(food).await
    }

    async fn find_or_create(&self, food: NewFoodItem) -> Result<FoodItem, PlanError> {
        if let Some(existing) = self
            .foods
            .find_by_key(&food.key)
            .await
            .map_err(PlanError::Persistence)?
        {
            return Ok(existing);
        }
        self.foods
            .insert_or_get(food)
            .await
            .map_err(PlanError::Persistence)
    }
}

/// Unseeded choice; callers must not depend on which element comes back.
fn pick<T>(items: &[T]) -> Option<&T> {
    items.choose(&mut rand::thread_rng())
}
