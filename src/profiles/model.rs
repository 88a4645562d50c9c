use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::PlanError;

/// Biometric profile as stored; every field may still be unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub user_id: Uuid,
    pub age: Option<f64>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub health_goal: Option<String>,
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
}

/// A profile with every field the metabolic calculator needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteProfile {
    pub age: f64,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: String,
    pub health_goal: String,
}

impl Profile {
    /// A profile row that does not exist yet, reported as missing everything.
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    pub fn missing_fields(&self) -> Vec<String> {
        let blank = |s: &Option<String>| s.as_deref().map_or(true, |v| v.trim().is_empty());
        let mut missing = Vec::new();
        if self.age.is_none() {
            missing.push("age");
        }
        if blank(&self.gender) {
            missing.push("gender");
        }
        if self.height_cm.is_none() {
            missing.push("height");
        }
        if self.weight_kg.is_none() {
            missing.push("weight");
        }
        if blank(&self.activity_level) {
            missing.push("activity_level");
        }
        if blank(&self.health_goal) {
            missing.push("health_goal");
        }
        missing.into_iter().map(String::from).collect()
    }

    pub fn require_complete(&self) -> Result<CompleteProfile, PlanError> {
        match (
            self.age,
            self.gender.as_deref(),
            self.height_cm,
            self.weight_kg,
            self.activity_level.as_deref(),
            self.health_goal.as_deref(),
        ) {
            (Some(age), Some(gender), Some(height_cm), Some(weight_kg), Some(activity), Some(goal))
                if self.missing_fields().is_empty() =>
            {
                Ok(CompleteProfile {
                    age,
                    gender: gender.trim().to_lowercase(),
                    height_cm,
                    weight_kg,
                    activity_level: activity.trim().to_lowercase(),
                    health_goal: goal.trim().to_lowercase(),
                })
            }
            _ => Err(PlanError::IncompleteProfile {
                missing: self.missing_fields(),
            }),
        }
    }
}
