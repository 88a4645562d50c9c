//! In-memory stores and a canned recipe source for unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::foods::recipes::{NutrientQuery, RecipeApiError, RecipeSource, RecipeSummary};
use crate::foods::{FoodItem, FoodKey, FoodStore, NewFoodItem};
use crate::nutrition::model::NewNutritionTarget;
use crate::nutrition::{NutritionTarget, TargetStore};
use crate::plans::model::{NewMealPlan, PlanStatus};
use crate::plans::{MealPlan, PlanStore};
use crate::profiles::{Profile, ProfileStore};

/// 30-year-old male, 175 cm, 70 kg, moderate activity, maintaining weight.
pub fn sample_profile() -> Profile {
    Profile {
        user_id: Uuid::new_v4(),
        age: Some(30.0),
        gender: Some("male".into()),
        height_cm: Some(175.0),
        weight_kg: Some(70.0),
        activity_level: Some("moderate".into()),
        health_goal: Some("maintain_weight".into()),
        dietary_preferences: vec![],
    }
}

pub fn stored_target(t: NewNutritionTarget) -> NutritionTarget {
    NutritionTarget {
        user_id: t.user_id,
        bmr: t.bmr,
        tdee: t.tdee,
        daily_calories: t.daily_calories,
        macros: t.macros,
        calculation_params: t.calculation_params,
        created_at: OffsetDateTime::now_utc(),
    }
}

fn store_down() -> anyhow::Error {
    anyhow::anyhow!("store unavailable")
}

#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: Vec<Profile>,
}

impl MemoryProfileStore {
    pub fn with(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        Ok(self.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryTargetStore {
    rows: Mutex<Vec<NutritionTarget>>,
    inserts: Mutex<usize>,
    failing: bool,
}

impl MemoryTargetStore {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn inserts(&self) -> usize {
        *self.inserts.lock().await
    }
}

#[async_trait]
impl TargetStore for MemoryTargetStore {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<NutritionTarget>> {
        if self.failing {
            return Err(store_down());
        }
        Ok(self.rows.lock().await.iter().find(|t| t.user_id == user_id).cloned())
    }

    async fn insert_or_get(&self, target: NewNutritionTarget) -> anyhow::Result<NutritionTarget> {
        if self.failing {
            return Err(store_down());
        }
        let mut rows = self.rows.lock().await;
        if let Some(existing) = rows.iter().find(|t| t.user_id == target.user_id) {
            return Ok(existing.clone());
        }
        let stored = stored_target(target);
        rows.push(stored.clone());
        *self.inserts.lock().await += 1;
        Ok(stored)
    }

    async fn delete_by_user(&self, user_id: Uuid) -> anyhow::Result<bool> {
        if self.failing {
            return Err(store_down());
        }
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|t| t.user_id != user_id);
        Ok(rows.len() != before)
    }
}

#[derive(Default)]
pub struct MemoryFoodStore {
    rows: Mutex<Vec<FoodItem>>,
    failing: bool,
}

impl MemoryFoodStore {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }
}

#[async_trait]
impl FoodStore for MemoryFoodStore {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<FoodItem>> {
        if self.failing {
            return Err(store_down());
        }
        Ok(self.rows.lock().await.iter().find(|f| f.id == id).cloned())
    }

    async fn find_by_key(&self, key: &FoodKey) -> anyhow::Result<Option<FoodItem>> {
        if self.failing {
            return Err(store_down());
        }
        Ok(self.rows.lock().await.iter().find(|f| &f.key == key).cloned())
    }

    async fn insert_or_get(&self, food: NewFoodItem) -> anyhow::Result<FoodItem> {
        if self.failing {
            return Err(store_down());
        }
        let mut rows = self.rows.lock().await;
        if let Some(existing) = rows.iter().find(|f| f.key == food.key) {
            return Ok(existing.clone());
        }
        let stored = FoodItem {
            id: Uuid::new_v4(),
            name: food.name,
            category: food.category,
            nutrition: food.nutrition,
            serving_size: food.serving_size,
            key: food.key,
            created_at: OffsetDateTime::now_utc(),
        };
        rows.push(stored.clone());
        Ok(stored)
    }
}

#[derive(Default)]
pub struct MemoryPlanStore {
    rows: Mutex<Vec<MealPlan>>,
}

impl MemoryPlanStore {
    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }
}

#[async_trait]
impl PlanStore for MemoryPlanStore {
    async fn create(&self, plan: NewMealPlan) -> anyhow::Result<MealPlan> {
        let stored = MealPlan {
            id: Uuid::new_v4(),
            user_id: plan.user_id,
            start_date: plan.start_date,
            end_date: plan.end_date,
            daily_plans: plan.daily_plans,
            preferences: plan.preferences,
            status: plan.status,
            created_at: OffsetDateTime::now_utc(),
        };
        self.rows.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn find_covering(
        &self,
        user_id: Uuid,
        on: Date,
        status: PlanStatus,
    ) -> anyhow::Result<Option<MealPlan>> {
        // Newest first, like ORDER BY created_at DESC.
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .rev()
            .find(|p| p.user_id == user_id && p.status == status && p.start_date <= on && on <= p.end_date)
            .cloned())
    }
}

/// Recipe source that either fails or returns a fixed list, recording every query.
pub struct StubRecipes {
    results: Option<Vec<RecipeSummary>>,
    rejected_with: Option<reqwest::StatusCode>,
    queries: Arc<Mutex<Vec<NutrientQuery>>>,
}

impl StubRecipes {
    /// Behaves like a client with no API key.
    pub fn failing() -> Self {
        Self {
            results: None,
            rejected_with: None,
            queries: Arc::default(),
        }
    }

    pub fn rejecting(status: reqwest::StatusCode) -> Self {
        Self {
            rejected_with: Some(status),
            ..Self::failing()
        }
    }

    pub fn returning(results: Vec<RecipeSummary>) -> Self {
        Self {
            results: Some(results),
            ..Self::failing()
        }
    }

    pub fn queries(&self) -> Arc<Mutex<Vec<NutrientQuery>>> {
        self.queries.clone()
    }
}

#[async_trait]
impl RecipeSource for StubRecipes {
    async fn find_by_nutrients(&self, query: &NutrientQuery) -> Result<Vec<RecipeSummary>, RecipeApiError> {
        self.queries.lock().await.push(query.clone());
        if let Some(status) = self.rejected_with {
            return Err(RecipeApiError::Status {
                status,
                body: "daily points limit reached".into(),
            });
        }
        self.results.clone().ok_or(RecipeApiError::NotConfigured)
    }
}
