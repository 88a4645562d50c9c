use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::foods::{MealItem, Nutrition};
use crate::nutrition::NutritionTarget;

/// Day-level targets copied from the user's nutrition target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetNutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
}

impl From<&NutritionTarget> for TargetNutrition {
    fn from(t: &NutritionTarget) -> Self {
        Self {
            calories: t.daily_calories as f64,
            protein: t.macros.protein.grams as f64,
            carbohydrates: t.macros.carbohydrates.grams as f64,
            fat: t.macros.fat.grams as f64,
        }
    }
}

/// Percent of each target reached, rounded, not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionProgress {
    pub calories: i64,
    pub protein: i64,
    pub carbohydrates: i64,
    pub fat: i64,
}

impl NutritionProgress {
    pub fn of(total: &Nutrition, target: &TargetNutrition) -> Self {
        Self {
            calories: percent(total.calories, target.calories),
            protein: percent(total.protein, target.protein),
            carbohydrates: percent(total.carbohydrates, target.carbohydrates),
            fat: percent(total.fat, target.fat),
        }
    }
}

fn percent(total: f64, target: f64) -> i64 {
    if target <= 0.0 || !target.is_finite() {
        return 0;
    }
    (total / target * 100.0).round() as i64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub date: Date,
    pub meals: Vec<MealItem>,
    pub total_nutrition: Nutrition,
    pub target_nutrition: TargetNutrition,
    pub nutrition_progress: NutritionProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroRatios {
    pub protein: i64,
    pub carbohydrates: i64,
    pub fat: i64,
}

/// Preferences denormalized onto the plan at generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanPreferences {
    pub dietary_restrictions: Vec<String>,
    pub calorie_target: i64,
    pub macro_ratios: MacroRatios,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Active,
    Completed,
    Paused,
}

impl PlanStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanStatus::Active => "active",
            PlanStatus::Completed => "completed",
            PlanStatus::Paused => "paused",
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "active" => Ok(PlanStatus::Active),
            "completed" => Ok(PlanStatus::Completed),
            "paused" => Ok(PlanStatus::Paused),
            other => anyhow::bail!("unknown meal plan status: {other}"),
        }
    }
}

/// A plan assembled in memory, written to storage in one go.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMealPlan {
    pub user_id: Uuid,
    pub start_date: Date,
    pub end_date: Date,
    pub daily_plans: Vec<DailyPlan>,
    pub preferences: PlanPreferences,
    pub status: PlanStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: Date,
    pub end_date: Date,
    pub daily_plans: Vec<DailyPlan>,
    pub preferences: PlanPreferences,
    pub status: PlanStatus,
    pub created_at: OffsetDateTime,
}
