use anyhow::Context;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::model::{FoodItem, FoodKey, NewFoodItem, Nutrition};

/// Shared, append-only table of nutrition-bearing content.
#[async_trait]
pub trait FoodStore: Send + Sync {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<FoodItem>>;

    async fn find_by_key(&self, key: &FoodKey) -> anyhow::Result<Option<FoodItem>>;

    /// Inserts unless a food with the same key exists; returns whichever row won.
    async fn insert_or_get(&self, food: NewFoodItem) -> anyhow::Result<FoodItem>;
}

#[derive(Debug, FromRow)]
struct FoodRow {
    id: Uuid,
    name: String,
    category: String,
    calories: f64,
    protein: f64,
    carbohydrates: f64,
    fat: f64,
    fiber: f64,
    sugar: f64,
    sodium: f64,
    serving_size: String,
    source_id: Option<String>,
    fallback_id: Option<String>,
    created_at: OffsetDateTime,
}

impl TryFrom<FoodRow> for FoodItem {
    type Error = anyhow::Error;

    fn try_from(r: FoodRow) -> anyhow::Result<Self> {
        let key = match (r.source_id, r.fallback_id) {
            (Some(id), None) => FoodKey::Source(id),
            (None, Some(id)) => FoodKey::Fallback(id),
            _ => anyhow::bail!("food {} must have exactly one of source_id/fallback_id", r.id),
        };
        Ok(Self {
            id: r.id,
            name: r.name,
            category: r.category,
            nutrition: Nutrition {
                calories: r.calories,
                protein: r.protein,
                carbohydrates: r.carbohydrates,
                fat: r.fat,
                fiber: r.fiber,
                sugar: r.sugar,
                sodium: r.sodium,
            },
            serving_size: r.serving_size,
            key,
            created_at: r.created_at,
        })
    }
}

const FOOD_COLUMNS: &str = "id, name, category, calories, protein, carbohydrates, fat, \
                            fiber, sugar, sodium, serving_size, source_id, fallback_id, created_at";

#[derive(Clone)]
pub struct PgFoodStore {
    db: PgPool,
}

impl PgFoodStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FoodStore for PgFoodStore {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<FoodItem>> {
        let sql = format!("SELECT {FOOD_COLUMNS} FROM food_items WHERE id = $1");
        let row = sqlx::query_as::<_, FoodRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("get food item")?;
        row.map(FoodItem::try_from).transpose()
    }

    async fn find_by_key(&self, key: &FoodKey) -> anyhow::Result<Option<FoodItem>> {
        let (column, value) = match key {
            FoodKey::Source(id) => ("source_id", id),
            FoodKey::Fallback(id) => ("fallback_id", id),
        };
        let sql = format!("SELECT {FOOD_COLUMNS} FROM food_items WHERE {column} = $1");
        let row = sqlx::query_as::<_, FoodRow>(&sql)
            .bind(value)
            .fetch_optional(&self.db)
            .await
            .with_context(|| format!("find food item by {column}"))?;
        row.map(FoodItem::try_from).transpose()
    }

    async fn insert_or_get(&self, food: NewFoodItem) -> anyhow::Result<FoodItem> {
        let n = food.nutrition;
        sqlx::query(
            r#"
            INSERT INTO food_items
                (name, category, calories, protein, carbohydrates, fat,
                 fiber, sugar, sodium, serving_size, source_id, fallback_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(&food.name)
        .bind(&food.category)
        .bind(n.calories)
        .bind(n.protein)
        .bind(n.carbohydrates)
        .bind(n.fat)
        .bind(n.fiber)
        .bind(n.sugar)
        .bind(n.sodium)
        .bind(&food.serving_size)
        .bind(food.key.source_id())
        .bind(food.key.fallback_id())
        .execute(&self.db)
        .await
        .context("insert food item")?;

        self.find_by_key(&food.key)
            .await?
            .with_context(|| format!("food item {:?} missing after insert", food.key))
    }
}
