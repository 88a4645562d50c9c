//! Built-in meals used when the recipe API is unavailable or finds nothing.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::model::Nutrition;
use super::slot::SlotType;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackMeal {
    pub name: &'static str,
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
}

const fn meal(name: &'static str, calories: f64, protein: f64, carbohydrates: f64, fat: f64) -> FallbackMeal {
    FallbackMeal {
        name,
        calories,
        protein,
        carbohydrates,
        fat,
    }
}

const BREAKFASTS: [FallbackMeal; 4] = [
    meal("Oatmeal with Berries", 350.0, 12.0, 60.0, 7.0),
    meal("Greek Yogurt Parfait", 300.0, 20.0, 35.0, 8.0),
    meal("Scrambled Eggs with Toast", 400.0, 22.0, 30.0, 20.0),
    meal("Avocado Toast", 380.0, 12.0, 40.0, 20.0),
];

const LUNCHES: [FallbackMeal; 4] = [
    meal("Grilled Chicken Salad", 450.0, 40.0, 20.0, 22.0),
    meal("Turkey Wrap", 500.0, 32.0, 50.0, 18.0),
    meal("Quinoa Buddha Bowl", 480.0, 18.0, 65.0, 16.0),
    meal("Lentil Soup", 420.0, 24.0, 60.0, 8.0),
];

const DINNERS: [FallbackMeal; 4] = [
    meal("Baked Salmon with Vegetables", 600.0, 42.0, 30.0, 32.0),
    meal("Beef Stir Fry", 650.0, 40.0, 60.0, 24.0),
    meal("Chicken with Brown Rice", 620.0, 45.0, 65.0, 15.0),
    meal("Vegetable Pasta", 580.0, 20.0, 90.0, 14.0),
];

const SNACKS: [FallbackMeal; 4] = [
    meal("Apple with Peanut Butter", 200.0, 7.0, 25.0, 8.0),
    meal("Mixed Nuts", 180.0, 6.0, 6.0, 16.0),
    meal("Hummus with Carrots", 150.0, 5.0, 18.0, 7.0),
    meal("Protein Smoothie", 220.0, 20.0, 25.0, 4.0),
];

pub fn options(slot: SlotType) -> &'static [FallbackMeal; 4] {
    match slot {
        SlotType::Breakfast => &BREAKFASTS,
        SlotType::Lunch => &LUNCHES,
        SlotType::Dinner => &DINNERS,
        SlotType::Snack => &SNACKS,
    }
}

/// Scales every nutrient by `target_calories / meal.calories`, rounded to whole units.
pub fn scale(meal: &FallbackMeal, target_calories: f64) -> Nutrition {
    let factor = target_calories / meal.calories;
    Nutrition {
        calories: (meal.calories * factor).round(),
        protein: (meal.protein * factor).round(),
        carbohydrates: (meal.carbohydrates * factor).round(),
        fat: (meal.fat * factor).round(),
        ..Nutrition::default()
    }
}

/// What makes two fallback resolutions share one stored food.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKeyStrategy {
    /// Slot and meal name only. The first stored scale is reused for every later lookup.
    #[default]
    Name,
    /// Slot, meal name and the scaled calorie value.
    NameAndCalories,
}

impl FromStr for FallbackKeyStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(FallbackKeyStrategy::Name),
            "name_and_calories" => Ok(FallbackKeyStrategy::NameAndCalories),
            other => Err(format!("unknown fallback key strategy: {other}")),
        }
    }
}

impl fmt::Display for FallbackKeyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackKeyStrategy::Name => f.write_str("name"),
            FallbackKeyStrategy::NameAndCalories => f.write_str("name_and_calories"),
        }
    }
}

fn slug(name: &str) -> String {
    lazy_static! {
        static ref SPACES: Regex = Regex::new(r"\s+").unwrap();
    }
    SPACES.replace_all(name.trim(), "_").to_lowercase()
}

pub fn fallback_key(
    slot: SlotType,
    meal: &FallbackMeal,
    scaled: &Nutrition,
    strategy: FallbackKeyStrategy,
) -> String {
    let base = format!("{}_{}", slot.as_str(), slug(meal.name));
    match strategy {
        FallbackKeyStrategy::Name => base,
        FallbackKeyStrategy::NameAndCalories => format!("{base}_{}", scaled.calories as i64),
    }
}
