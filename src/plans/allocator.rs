use std::sync::Arc;

use time::Date;
use tracing::{debug, instrument};

use super::model::{DailyPlan, NutritionProgress, TargetNutrition};
use crate::error::PlanError;
use crate::foods::{FoodStore, MealContentResolver, MealItem, Nutrition, SlotRequest, SlotType};
use crate::nutrition::NutritionTarget;

/// One resolver call: the slot and its fraction of the day's calories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation {
    pub slot: SlotType,
    pub share: f64,
}

/// Resolution order for a day. Slots with several instances get equal splits of their share.
pub fn allocations() -> Vec<Allocation> {
    SlotType::ALL
        .iter()
        .flat_map(|&slot| {
            let n = slot.instances();
            let share = slot.budget_share() / f64::from(n);
            (0..n).map(move |_| Allocation { slot, share })
        })
        .collect()
}

/// Spreads one day's budget over the meal slots and totals what was placed.
pub struct DailyAllocator {
    resolver: MealContentResolver,
    foods: Arc<dyn FoodStore>,
}

impl DailyAllocator {
    pub fn new(resolver: MealContentResolver, foods: Arc<dyn FoodStore>) -> Self {
        Self { resolver, foods }
    }

    #[instrument(skip(self, targets, dietary_preferences), fields(user_id = %targets.user_id))]
    pub async fn generate_daily_plan(
        &self,
        targets: &NutritionTarget,
        dietary_preferences: &[String],
        date: Date,
    ) -> Result<DailyPlan, PlanError> {
        let daily = targets.daily_calories as f64;
        let macros = &targets.macros;

        let mut meals = Vec::new();
        for Allocation { slot, share } in allocations() {
            let request = SlotRequest {
                slot,
                target_calories: daily * share,
                target_protein: macros.protein.grams as f64 * share,
                target_carbohydrates: macros.carbohydrates.grams as f64 * share,
                target_fat: macros.fat.grams as f64 * share,
                dietary_preferences,
            };
            meals.extend(self.resolver.resolve(&request).await?);
        }

        let total_nutrition = self.total_of(&meals).await?;
        let target_nutrition = TargetNutrition::from(targets);
        let nutrition_progress = NutritionProgress::of(&total_nutrition, &target_nutrition);
        debug!(%date, calories = total_nutrition.calories, "daily plan allocated");

        Ok(DailyPlan {
            date,
            meals,
            total_nutrition,
            target_nutrition,
            nutrition_progress,
        })
    }

    /// Sums stored nutrition × quantity, reading each food from the store.
    async fn total_of(&self, meals: &[MealItem]) -> Result<Nutrition, PlanError> {
        let mut portions = Vec::with_capacity(meals.len());
        for item in meals {
            let food = self
                .foods
                .get(item.food_id)
                .await
                .map_err(PlanError::Persistence)?
                .ok_or_else(|| {
                    PlanError::Persistence(anyhow::anyhow!("food {} vanished from store", item.food_id))
                })?;
            portions.push(food.nutrition * item.quantity);
        }
        Ok(portions.into_iter().sum())
    }
}
