//! Metabolic calculations: BMR, TDEE and the goal-adjusted macro budget.
//!
//! Everything here is pure. Non-finite intermediate values are turned into
//! [`PlanError`]s instead of being rounded away, so nothing derived from a bad
//! input can reach storage.

use std::str::FromStr;

use super::model::{MacroBreakdown, MacroTarget};
use crate::error::PlanError;

pub const LOSE_WEIGHT_DELTA_KCAL: f64 = -500.0;
pub const GAIN_WEIGHT_DELTA_KCAL: f64 = 500.0;

pub const PROTEIN_RATIO: f64 = 0.25;
pub const CARBOHYDRATE_RATIO: f64 = 0.45;
pub const FAT_RATIO: f64 = 0.30;

pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBOHYDRATE: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Only `male` gets the male Mifflin-St Jeor constant; every other value uses the female one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmrOffset {
    Male,
    NotMale,
}

impl BmrOffset {
    pub fn for_gender(gender: &str) -> Self {
        if gender.trim().eq_ignore_ascii_case("male") {
            BmrOffset::Male
        } else {
            BmrOffset::NotMale
        }
    }

    fn kcal(self) -> f64 {
        match self {
            BmrOffset::Male => 5.0,
            BmrOffset::NotMale => -161.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
    ExtremelyActive,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
            ActivityLevel::ExtremelyActive => 2.0,
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "very_active" => Ok(ActivityLevel::VeryActive),
            "extremely_active" => Ok(ActivityLevel::ExtremelyActive),
            _ => Err(PlanError::InvalidActivityLevel(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthGoal {
    LoseWeight,
    GainWeight,
    MaintainWeight,
}

impl HealthGoal {
    /// Unrecognized goals leave calories unchanged, same as maintenance.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "lose_weight" => HealthGoal::LoseWeight,
            "gain_weight" => HealthGoal::GainWeight,
            _ => HealthGoal::MaintainWeight,
        }
    }

    pub fn calorie_delta(self) -> f64 {
        match self {
            HealthGoal::LoseWeight => LOSE_WEIGHT_DELTA_KCAL,
            HealthGoal::GainWeight => GAIN_WEIGHT_DELTA_KCAL,
            HealthGoal::MaintainWeight => 0.0,
        }
    }
}

/// Goal-adjusted daily budget.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBudget {
    pub daily_calories: i64,
    pub macros: MacroBreakdown,
}

/// Mifflin-St Jeor: `10*weight + 6.25*height - 5*age + offset`. Not rounded.
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: f64, gender: &str) -> f64 {
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years + BmrOffset::for_gender(gender).kcal()
}

pub fn calculate_tdee(bmr: f64, activity_level: &str) -> Result<f64, PlanError> {
    let level = activity_level.parse::<ActivityLevel>()?;
    let tdee = bmr * level.multiplier();
    if !tdee.is_finite() {
        return Err(PlanError::InvalidNutritionCalculation("tdee".into()));
    }
    Ok(tdee)
}

pub fn calculate_nutrition_targets(tdee: f64, health_goal: &str) -> Result<DailyBudget, PlanError> {
    let adjusted = finite("calories", tdee + HealthGoal::parse_lenient(health_goal).calorie_delta())?;
    let daily = adjusted.round();
    if daily <= 0.0 {
        return Err(PlanError::InvalidNutritionCalculation("daily calories".into()));
    }

    let macros = MacroBreakdown {
        protein: split(daily, PROTEIN_RATIO, KCAL_PER_GRAM_PROTEIN, "protein")?,
        carbohydrates: split(
            daily,
            CARBOHYDRATE_RATIO,
            KCAL_PER_GRAM_CARBOHYDRATE,
            "carbohydrates",
        )?,
        fat: split(daily, FAT_RATIO, KCAL_PER_GRAM_FAT, "fat")?,
    };

    Ok(DailyBudget {
        daily_calories: daily as i64,
        macros,
    })
}

fn split(daily: f64, ratio: f64, kcal_per_gram: f64, label: &str) -> Result<MacroTarget, PlanError> {
    let calories = finite(label, daily * ratio)?;
    Ok(MacroTarget {
        grams: (calories / kcal_per_gram).round() as i64,
        percentage: (ratio * 100.0).round() as i64,
        calories: calories.round() as i64,
    })
}

fn finite(label: &str, value: f64) -> Result<f64, PlanError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PlanError::InvalidNutritionCalculation(label.to_string()))
    }
}
