use std::iter::Sum;
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::slot::SlotType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub sodium: f64,
}

impl Add for Nutrition {
    type Output = Nutrition;

    fn add(self, rhs: Nutrition) -> Nutrition {
        Nutrition {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbohydrates: self.carbohydrates + rhs.carbohydrates,
            fat: self.fat + rhs.fat,
            fiber: self.fiber + rhs.fiber,
            sugar: self.sugar + rhs.sugar,
            sodium: self.sodium + rhs.sodium,
        }
    }
}

impl Mul<f64> for Nutrition {
    type Output = Nutrition;

    fn mul(self, k: f64) -> Nutrition {
        Nutrition {
            calories: self.calories * k,
            protein: self.protein * k,
            carbohydrates: self.carbohydrates * k,
            fat: self.fat * k,
            fiber: self.fiber * k,
            sugar: self.sugar * k,
            sodium: self.sodium * k,
        }
    }
}

impl Sum for Nutrition {
    fn sum<I: Iterator<Item = Nutrition>>(iter: I) -> Nutrition {
        iter.fold(Nutrition::default(), Add::add)
    }
}

/// Dedup key of a stored food: exactly one of the two identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FoodKey {
    /// Identifier assigned by the external recipe API.
    Source(String),
    /// Derived from slot type and meal name for fallback content.
    Fallback(String),
}

impl FoodKey {
    pub fn source_id(&self) -> Option<&str> {
        match self {
            FoodKey::Source(id) => Some(id),
            FoodKey::Fallback(_) => None,
        }
    }

    pub fn fallback_id(&self) -> Option<&str> {
        match self {
            FoodKey::Source(_) => None,
            FoodKey::Fallback(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFoodItem {
    pub name: String,
    pub category: String,
    pub nutrition: Nutrition,
    pub serving_size: String,
    pub key: FoodKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub nutrition: Nutrition,
    pub serving_size: String,
    pub key: FoodKey,
    pub created_at: OffsetDateTime,
}

/// Reference to a stored food placed in a meal slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealItem {
    pub food_id: Uuid,
    pub quantity: f64,
    pub unit: String,
    pub slot: SlotType,
    pub time_label: String,
}

impl MealItem {
    pub fn one_serving(food_id: Uuid, slot: SlotType) -> Self {
        Self {
            food_id,
            quantity: 1.0,
            unit: "serving".to_string(),
            slot,
            time_label: slot.time_label().to_string(),
        }
    }
}
