use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::model::{CalculationParams, MacroBreakdown, NewNutritionTarget, NutritionTarget};

#[async_trait]
pub trait TargetStore: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<NutritionTarget>>;

    /// Inserts unless a target already exists for the user; returns whichever row won.
    async fn insert_or_get(&self, target: NewNutritionTarget) -> anyhow::Result<NutritionTarget>;

    /// Returns true when a row was removed.
    async fn delete_by_user(&self, user_id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Debug, FromRow)]
struct TargetRow {
    user_id: Uuid,
    bmr: f64,
    tdee: f64,
    daily_calories: i64,
    macros: Json<MacroBreakdown>,
    calculation_params: Json<CalculationParams>,
    created_at: OffsetDateTime,
}

impl From<TargetRow> for NutritionTarget {
    fn from(r: TargetRow) -> Self {
        Self {
            user_id: r.user_id,
            bmr: r.bmr,
            tdee: r.tdee,
            daily_calories: r.daily_calories,
            macros: r.macros.0,
            calculation_params: r.calculation_params.0,
            created_at: r.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PgTargetStore {
    db: PgPool,
}

impl PgTargetStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TargetStore for PgTargetStore {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<NutritionTarget>> {
        let row = sqlx::query_as::<_, TargetRow>(
            r#"
            SELECT user_id, bmr, tdee, daily_calories, macros, calculation_params, created_at
            FROM nutrition_targets
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("find nutrition target")?;
        Ok(row.map(NutritionTarget::from))
    }

    async fn insert_or_get(&self, target: NewNutritionTarget) -> anyhow::Result<NutritionTarget> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        sqlx::query(
            r#"
            INSERT INTO nutrition_targets
                (user_id, bmr, tdee, daily_calories, macros, calculation_params)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(target.user_id)
        .bind(target.bmr)
        .bind(target.tdee)
        .bind(target.daily_calories)
        .bind(Json(&target.macros))
        .bind(Json(&target.calculation_params))
        .execute(&mut *tx)
        .await
        .context("insert nutrition target")?;

        let row = sqlx::query_as::<_, TargetRow>(
            r#"
            SELECT user_id, bmr, tdee, daily_calories, macros, calculation_params, created_at
            FROM nutrition_targets
            WHERE user_id = $1
            "#,
        )
        .bind(target.user_id)
        .fetch_one(&mut *tx)
        .await
        .context("read back nutrition target")?;
        tx.commit().await.context("commit tx")?;
        Ok(row.into())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM nutrition_targets WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete nutrition target")?;
        Ok(result.rows_affected() > 0)
    }
}
