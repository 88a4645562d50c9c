use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::calculator::{calculate_bmr, calculate_nutrition_targets, calculate_tdee};
use super::model::{CalculationParams, NewNutritionTarget, NutritionTarget};
use super::repo::TargetStore;
use crate::error::PlanError;
use crate::profiles::{CompleteProfile, Profile};

/// Runs the full BMR → TDEE → budget chain for one profile.
pub fn compute_target(user_id: Uuid, profile: &CompleteProfile) -> Result<NewNutritionTarget, PlanError> {
    let bmr = calculate_bmr(profile.weight_kg, profile.height_cm, profile.age, &profile.gender);
    let tdee = calculate_tdee(bmr, &profile.activity_level)?;
    let budget = calculate_nutrition_targets(tdee, &profile.health_goal)?;

    let target = NewNutritionTarget {
        user_id,
        bmr,
        tdee,
        daily_calories: budget.daily_calories,
        macros: budget.macros,
        calculation_params: CalculationParams::from(profile),
    };
    if let Some(field) = target.first_non_finite() {
        return Err(PlanError::InvalidNutritionCalculation(field.to_string()));
    }
    Ok(target)
}

/// At-most-once computation of a user's nutrition target.
///
/// A stored target is returned as-is even if the profile changed since; call
/// [`TargetCache::invalidate`] to force a recompute on the next request.
#[derive(Clone)]
pub struct TargetCache {
    store: Arc<dyn TargetStore>,
}

impl TargetCache {
    pub fn new(store: Arc<dyn TargetStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, profile))]
    pub async fn get_or_create(&self, user_id: Uuid, profile: &Profile) -> Result<NutritionTarget, PlanError> {
        if let Some(existing) = self
            .store
            .find_by_user(user_id)
            .await
            .map_err(PlanError::Persistence)?
        {
            debug!(%user_id, "nutrition target cache hit");
            return Ok(existing);
        }

        let complete = profile.require_complete()?;
        let target = compute_target(user_id, &complete)?;
        let stored = self
            .store
            .insert_or_get(target)
            .await
            .map_err(PlanError::Persistence)?;
        info!(%user_id, daily_calories = stored.daily_calories, "nutrition target created");
        Ok(stored)
    }

    pub async fn get(&self, user_id: Uuid) -> Result<NutritionTarget, PlanError> {
        self.store
            .find_by_user(user_id)
            .await
            .map_err(PlanError::Persistence)?
            .ok_or(PlanError::NotFound("nutrition target"))
    }

    #[instrument(skip(self))]
    pub async fn invalidate(&self, user_id: Uuid) -> Result<(), PlanError> {
        let removed = self
            .store
            .delete_by_user(user_id)
            .await
            .map_err(PlanError::Persistence)?;
        if !removed {
            return Err(PlanError::NotFound("nutrition target"));
        }
        info!(%user_id, "nutrition target invalidated");
        Ok(())
    }
}
