//! Client for a Spoonacular-compatible "find recipes by nutrients" endpoint.

use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::config::RecipeApiConfig;

#[derive(Debug, thiserror::Error)]
pub enum RecipeApiError {
    #[error("recipe API is not configured")]
    NotConfigured,
    #[error("recipe API request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("recipe API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Query windows for one meal slot.
#[derive(Debug, Clone, PartialEq)]
pub struct NutrientQuery {
    pub min_calories: f64,
    pub max_calories: f64,
    pub min_protein: f64,
    pub max_protein: f64,
    pub diets: Vec<&'static str>,
    pub intolerances: Vec<&'static str>,
}

impl NutrientQuery {
    pub const CALORIE_WINDOW: f64 = 100.0;
    pub const PROTEIN_WINDOW: f64 = 10.0;

    pub fn around(target_calories: f64, target_protein: f64, dietary_preferences: &[String]) -> Self {
        let (diets, intolerances) = map_dietary_preferences(dietary_preferences);
        Self {
            min_calories: (target_calories - Self::CALORIE_WINDOW).max(0.0),
            max_calories: target_calories + Self::CALORIE_WINDOW,
            min_protein: (target_protein - Self::PROTEIN_WINDOW).max(0.0),
            max_protein: target_protein + Self::PROTEIN_WINDOW,
            diets,
            intolerances,
        }
    }
}

/// One recipe match, macros already parsed to grams.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
}

#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn find_by_nutrients(&self, query: &NutrientQuery) -> Result<Vec<RecipeSummary>, RecipeApiError>;
}

/// Splits free-form preferences into API `diet` and `intolerances` values.
pub fn map_dietary_preferences(preferences: &[String]) -> (Vec<&'static str>, Vec<&'static str>) {
    let mut diets = Vec::new();
    let mut intolerances = Vec::new();
    for pref in preferences {
        let normalized = pref.trim().to_lowercase().replace(['-', ' '], "_");
        let (bucket, value) = match normalized.as_str() {
            "vegetarian" => (&mut diets, "vegetarian"),
            "vegan" => (&mut diets, "vegan"),
            "pescetarian" | "pescatarian" => (&mut diets, "pescetarian"),
            "paleo" => (&mut diets, "paleo"),
            "primal" => (&mut diets, "primal"),
            "whole30" => (&mut diets, "whole30"),
            "keto" | "ketogenic" => (&mut diets, "ketogenic"),
            "gluten_free" => (&mut intolerances, "gluten"),
            "dairy_free" | "lactose_free" => (&mut intolerances, "dairy"),
            "nut_free" => (&mut intolerances, "tree nut"),
            "egg_free" => (&mut intolerances, "egg"),
            "soy_free" => (&mut intolerances, "soy"),
            "shellfish_free" => (&mut intolerances, "shellfish"),
            _ => continue,
        };
        if !bucket.contains(&value) {
            bucket.push(value);
        }
    }
    (diets, intolerances)
}

/// Reads the leading number of strings like `"25g"` or `"12.5 g"`.
fn grams(raw: &str) -> f64 {
    lazy_static! {
        static ref LEADING_NUMBER: Regex = Regex::new(r"^\s*([0-9]+(?:\.[0-9]+)?)").unwrap();
    }
    LEADING_NUMBER
        .captures(raw)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[derive(Debug, Deserialize)]
struct FindByNutrientsItem {
    id: i64,
    title: String,
    #[serde(default)]
    calories: f64,
    #[serde(default)]
    protein: String,
    #[serde(default)]
    carbs: String,
    #[serde(default)]
    fat: String,
}

impl From<FindByNutrientsItem> for RecipeSummary {
    fn from(item: FindByNutrientsItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            calories: item.calories,
            protein: grams(&item.protein),
            carbohydrates: grams(&item.carbs),
            fat: grams(&item.fat),
        }
    }
}

pub struct SpoonacularClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    results: u32,
}

impl SpoonacularClient {
    pub fn new(config: &RecipeApiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            results: config.results,
        })
    }
}

#[async_trait]
impl RecipeSource for SpoonacularClient {
    async fn find_by_nutrients(&self, query: &NutrientQuery) -> Result<Vec<RecipeSummary>, RecipeApiError> {
        let api_key = self.api_key.as_deref().ok_or(RecipeApiError::NotConfigured)?;

        let mut params: Vec<(&str, String)> = vec![
            ("minCalories", format!("{:.0}", query.min_calories)),
            ("maxCalories", format!("{:.0}", query.max_calories)),
            ("minProtein", format!("{:.0}", query.min_protein)),
            ("maxProtein", format!("{:.0}", query.max_protein)),
            ("number", self.results.to_string()),
            ("random", "true".to_string()),
            ("apiKey", api_key.to_string()),
        ];
        if !query.diets.is_empty() {
            params.push(("diet", query.diets.join(",")));
        }
        if !query.intolerances.is_empty() {
            params.push(("intolerances", query.intolerances.join(",")));
        }

        let url = format!("{}/recipes/findByNutrients", self.base_url);
        let response = self.http.get(&url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(RecipeApiError::Status { status, body });
        }

        let items = response.json::<Vec<FindByNutrientsItem>>().await?;
        debug!(count = items.len(), "recipe API matches");
        Ok(items.into_iter().map(RecipeSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_windows_surround_targets() {
        let q = NutrientQuery::around(640.0, 40.0, &[]);
        assert_eq!(q.min_calories, 540.0);
        assert_eq!(q.max_calories, 740.0);
        assert_eq!(q.min_protein, 30.0);
        assert_eq!(q.max_protein, 50.0);
        assert!(q.diets.is_empty() && q.intolerances.is_empty());
    }

    #[test]
    fn windows_do_not_go_negative() {
        let q = NutrientQuery::around(64.0, 4.0, &[]);
        assert_eq!(q.min_calories, 0.0);
        assert_eq!(q.min_protein, 0.0);
    }

    #[test]
    fn preferences_map_to_diet_and_intolerances() {
        let prefs: Vec<String> = ["Vegan", "gluten-free", "keto", "vegan", "likes_spicy", "Dairy Free"]
            .into_iter()
            .map(String::from)
            .collect();
        let (diets, intolerances) = map_dietary_preferences(&prefs);
        assert_eq!(diets, vec!["vegan", "ketogenic"]);
        assert_eq!(intolerances, vec!["gluten", "dairy"]);
    }

    #[test]
    fn macro_strings_parse_leading_number() {
        assert_eq!(grams("25g"), 25.0);
        assert_eq!(grams(" 12.5 g"), 12.5);
        assert_eq!(grams(""), 0.0);
        assert_eq!(grams("n/a"), 0.0);
    }

    #[test]
    fn api_item_deserializes_into_summary() {
        let raw = r#"[{"id":716429,"title":"Pasta with Garlic","image":"x.jpg",
                       "calories":584,"protein":"19g","fat":"20g","carbs":"84g"}]"#;
        let items: Vec<FindByNutrientsItem> = serde_json::from_str(raw).unwrap();
        let summary = RecipeSummary::from(items.into_iter().next().unwrap());
        assert_eq!(summary.id, 716429);
        assert_eq!(summary.calories, 584.0);
        assert_eq!(summary.protein, 19.0);
        assert_eq!(summary.carbohydrates, 84.0);
        assert_eq!(summary.fat, 20.0);
    }

    #[tokio::test]
    async fn unconfigured_client_reports_not_configured() {
        let client = SpoonacularClient::new(&RecipeApiConfig {
            base_url: "http://127.0.0.1:9".into(),
            api_key: None,
            timeout_secs: 1,
            results: 5,
        })
        .unwrap();
        let err = client
            .find_by_nutrients(&NutrientQuery::around(500.0, 30.0, &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, RecipeApiError::NotConfigured));
    }
}
