use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::model::{DailyPlan, MealPlan, NewMealPlan, PlanPreferences, PlanStatus};

#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Writes the whole plan document in a single statement.
    async fn create(&self, plan: NewMealPlan) -> anyhow::Result<MealPlan>;

    /// Most recent plan with `status` whose date range contains `on`.
    async fn find_covering(
        &self,
        user_id: Uuid,
        on: Date,
        status: PlanStatus,
    ) -> anyhow::Result<Option<MealPlan>>;
}

#[derive(Debug, FromRow)]
struct MealPlanRow {
    id: Uuid,
    user_id: Uuid,
    start_date: Date,
    end_date: Date,
    daily_plans: Json<Vec<DailyPlan>>,
    preferences: Json<PlanPreferences>,
    status: String,
    created_at: OffsetDateTime,
}

impl TryFrom<MealPlanRow> for MealPlan {
    type Error = anyhow::Error;

    fn try_from(r: MealPlanRow) -> anyhow::Result<Self> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            start_date: r.start_date,
            end_date: r.end_date,
            daily_plans: r.daily_plans.0,
            preferences: r.preferences.0,
            status: r.status.parse()?,
            created_at: r.created_at,
        })
    }
}

#[derive(Clone)]
pub struct PgPlanStore {
    db: PgPool,
}

impl PgPlanStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlanStore for PgPlanStore {
    async fn create(&self, plan: NewMealPlan) -> anyhow::Result<MealPlan> {
        let row = sqlx::query_as::<_, MealPlanRow>(
            r#"
            INSERT INTO meal_plans (user_id, start_date, end_date, daily_plans, preferences, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, start_date, end_date, daily_plans, preferences, status, created_at
            "#,
        )
        .bind(plan.user_id)
        .bind(plan.start_date)
        .bind(plan.end_date)
        .bind(Json(&plan.daily_plans))
        .bind(Json(&plan.preferences))
        .bind(plan.status.as_str())
        .fetch_one(&self.db)
        .await
        .context("insert meal plan")?;
        row.try_into()
    }

    async fn find_covering(
        &self,
        user_id: Uuid,
        on: Date,
        status: PlanStatus,
    ) -> anyhow::Result<Option<MealPlan>> {
        let row = sqlx::query_as::<_, MealPlanRow>(
            r#"
            SELECT id, user_id, start_date, end_date, daily_plans, preferences, status, created_at
            FROM meal_plans
            WHERE user_id = $1 AND status = $2 AND start_date <= $3 AND end_date >= $3
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(status.as_str())
        .bind(on)
        .fetch_optional(&self.db)
        .await
        .context("find covering meal plan")?;
        row.map(MealPlan::try_from).transpose()
    }
}
