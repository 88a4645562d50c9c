use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::profiles::CompleteProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTarget {
    pub grams: i64,
    pub percentage: i64,
    pub calories: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroBreakdown {
    pub protein: MacroTarget,
    pub carbohydrates: MacroTarget,
    pub fat: MacroTarget,
}

/// Snapshot of the profile inputs a target was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationParams {
    pub age: f64,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: String,
    pub health_goal: String,
}

impl From<&CompleteProfile> for CalculationParams {
    fn from(p: &CompleteProfile) -> Self {
        Self {
            age: p.age,
            gender: p.gender.clone(),
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            activity_level: p.activity_level.clone(),
            health_goal: p.health_goal.clone(),
        }
    }
}

/// Computed target that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewNutritionTarget {
    pub user_id: Uuid,
    pub bmr: f64,
    pub tdee: f64,
    pub daily_calories: i64,
    pub macros: MacroBreakdown,
    pub calculation_params: CalculationParams,
}

impl NewNutritionTarget {
    /// Name of the first floating point field that is NaN or infinite.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        let p = &self.calculation_params;
        [
            ("bmr", self.bmr),
            ("tdee", self.tdee),
            ("age", p.age),
            ("height", p.height_cm),
            ("weight", p.weight_kg),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

/// One canonical record per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionTarget {
    pub user_id: Uuid,
    pub bmr: f64,
    pub tdee: f64,
    pub daily_calories: i64,
    pub macros: MacroBreakdown,
    pub calculation_params: CalculationParams,
    pub created_at: OffsetDateTime,
}
