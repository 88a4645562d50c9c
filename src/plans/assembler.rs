use std::sync::Arc;

use serde::Deserialize;
use time::Date;
use tracing::{info, instrument};
use uuid::Uuid;

use super::allocator::DailyAllocator;
use super::model::{MacroRatios, MealPlan, NewMealPlan, PlanPreferences, PlanStatus};
use super::repo::PlanStore;
use crate::error::PlanError;
use crate::nutrition::{NutritionTarget, TargetCache};
use crate::profiles::{Profile, ProfileStore};

pub const DEFAULT_MAX_PLAN_DAYS: u32 = 90;

/// Caller-supplied preferences for a generation request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanRequestPreferences {
    /// Added to the profile's dietary preferences for this plan only.
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

/// Profile preferences first, then request extras, without duplicates.
fn merge_restrictions(profile: &[String], extra: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(profile.len() + extra.len());
    for pref in profile.iter().chain(extra) {
        let pref = pref.trim();
        if !pref.is_empty() && !merged.iter().any(|p| p.eq_ignore_ascii_case(pref)) {
            merged.push(pref.to_string());
        }
    }
    merged
}

fn preferences_snapshot(targets: &NutritionTarget, restrictions: Vec<String>) -> PlanPreferences {
    PlanPreferences {
        dietary_restrictions: restrictions,
        calorie_target: targets.daily_calories,
        macro_ratios: MacroRatios {
            protein: targets.macros.protein.percentage,
            carbohydrates: targets.macros.carbohydrates.percentage,
            fat: targets.macros.fat.percentage,
        },
    }
}

/// Builds and stores multi-day meal plans.
pub struct PlanAssembler {
    profiles: Arc<dyn ProfileStore>,
    targets: TargetCache,
    allocator: DailyAllocator,
    plans: Arc<dyn PlanStore>,
    max_days: u32,
}

impl PlanAssembler {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        targets: TargetCache,
        allocator: DailyAllocator,
        plans: Arc<dyn PlanStore>,
    ) -> Self {
        Self {
            profiles,
            targets,
            allocator,
            plans,
            max_days: DEFAULT_MAX_PLAN_DAYS,
        }
    }

    pub fn with_max_days(mut self, max_days: u32) -> Self {
        self.max_days = max_days;
        self
    }

    /// Days are resolved in order and the plan is stored once at the end, so a
    /// failure part way through leaves nothing behind.
    #[instrument(skip(self, preferences))]
    pub async fn generate_meal_plan(
        &self,
        user_id: Uuid,
        start_date: Date,
        end_date: Date,
        preferences: PlanRequestPreferences,
    ) -> Result<MealPlan, PlanError> {
        let days = (end_date - start_date).whole_days() + 1;
        if days < 1 || days > i64::from(self.max_days) {
            return Err(PlanError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }

        let profile = self
            .profiles
            .find_by_user(user_id)
            .await
            .map_err(PlanError::Persistence)?
            .unwrap_or_else(|| Profile::empty(user_id));
        let targets = self.targets.get_or_create(user_id, &profile).await?;
        let restrictions = merge_restrictions(
            &profile.dietary_preferences,
            &preferences.dietary_restrictions,
        );

        let mut daily_plans = Vec::with_capacity(days as usize);
        let mut day = start_date;
        loop {
            daily_plans.push(
                self.allocator
                    .generate_daily_plan(&targets, &restrictions, day)
                    .await?,
            );
            if day == end_date {
                break;
            }
            day = day.next_day().ok_or(PlanError::InvalidDateRange {
                start: start_date,
                end: end_date,
            })?;
        }

        let plan = NewMealPlan {
            user_id,
            start_date,
            end_date,
            daily_plans,
            preferences: preferences_snapshot(&targets, restrictions),
            status: PlanStatus::Active,
        };
        let stored = self.plans.create(plan).await.map_err(PlanError::Persistence)?;
        info!(
            plan_id = %stored.id,
            %user_id,
            days = stored.daily_plans.len(),
            status = %stored.status,
            "meal plan generated"
        );
        Ok(stored)
    }

    /// The newest active plan covering `on`.
    pub async fn current_plan(&self, user_id: Uuid, on: Date) -> Result<MealPlan, PlanError> {
        self.plans
            .find_covering(user_id, on, PlanStatus::Active)
            .await
            .map_err(PlanError::Persistence)?
            .ok_or(PlanError::NotFound("current meal plan"))
    }
}
