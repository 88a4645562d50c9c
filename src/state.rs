use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use crate::auth::jwt::JwtKeys;
use crate::config::AppConfig;
use crate::foods::{FoodStore, MealContentResolver, PgFoodStore, RecipeSource, SpoonacularClient};
use crate::nutrition::{PgTargetStore, TargetCache, TargetStore};
use crate::plans::{DailyAllocator, PgPlanStore, PlanAssembler, PlanStore};
use crate::profiles::{PgProfileStore, ProfileStore};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub targets: TargetCache,
    pub planner: Arc<PlanAssembler>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        Self::from_parts(db, config)
    }

    pub fn from_parts(db: PgPool, config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let profiles = Arc::new(PgProfileStore::new(db.clone())) as Arc<dyn ProfileStore>;
        let target_store = Arc::new(PgTargetStore::new(db.clone())) as Arc<dyn TargetStore>;
        let foods = Arc::new(PgFoodStore::new(db.clone())) as Arc<dyn FoodStore>;
        let plans = Arc::new(PgPlanStore::new(db.clone())) as Arc<dyn PlanStore>;
        let recipes = Arc::new(
            SpoonacularClient::new(&config.recipe_api).context("build recipe API client")?,
        ) as Arc<dyn RecipeSource>;

        let targets = TargetCache::new(target_store);
        let resolver = MealContentResolver::new(foods.clone(), recipes, config.fallback_key);
        let allocator = DailyAllocator::new(resolver, foods);
        let planner = Arc::new(PlanAssembler::new(
            profiles,
            targets.clone(),
            allocator,
            plans,
        )
        .with_max_days(config.max_plan_days));

        Ok(Self {
            db,
            jwt: JwtKeys::from(&config.jwt),
            config,
            targets,
            planner,
        })
    }
}
