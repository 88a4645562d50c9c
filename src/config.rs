use anyhow::Context;
use serde::Deserialize;

use crate::foods::fallback::FallbackKeyStrategy;
use crate::plans::assembler::DEFAULT_MAX_PLAN_DAYS;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

/// Settings for the third-party recipe-by-nutrients API.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeApiConfig {
    pub base_url: String,
    /// `None` means the API is not configured and every slot uses fallback content.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub results: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub recipe_api: RecipeApiConfig,
    pub fallback_key: FallbackKeyStrategy,
    /// Longest plan, in days, a single request may generate.
    pub max_plan_days: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = get("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: get("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: get("JWT_ISSUER").unwrap_or_else(|| "mealplanner".into()),
            audience: get("JWT_AUDIENCE").unwrap_or_else(|| "mealplanner-users".into()),
        };
        let recipe_api = RecipeApiConfig {
            base_url: get("RECIPE_API_BASE_URL")
                .unwrap_or_else(|| "https://api.spoonacular.com".into()),
            api_key: get("RECIPE_API_KEY").filter(|k| !k.trim().is_empty()),
            timeout_secs: get("RECIPE_API_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
            results: get("RECIPE_API_RESULTS")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
        };
        let fallback_key = match get("FALLBACK_KEY_STRATEGY") {
            Some(raw) => raw
                .parse::<FallbackKeyStrategy>()
                .map_err(|e| anyhow::anyhow!(e))
                .context("FALLBACK_KEY_STRATEGY")?,
            None => FallbackKeyStrategy::default(),
        };
        let max_plan_days = get("MAX_PLAN_DAYS")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&d| d > 0)
            .unwrap_or(DEFAULT_MAX_PLAN_DAYS);
        Ok(Self {
            database_url,
            jwt,
            recipe_api,
            fallback_key,
            max_plan_days,
        })
    }
}
