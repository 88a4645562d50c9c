mod app;
mod auth;
mod config;
mod error;
mod foods;
mod nutrition;
mod plans;
mod profiles;
mod state;
#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "mealplanner=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;

    if let Err(e) = sqlx::migrate!("./migrations").run(&app_state.db).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    tracing::info!(
        recipe_api = app_state.config.recipe_api.api_key.is_some(),
        fallback_key = %app_state.config.fallback_key,
        max_plan_days = app_state.config.max_plan_days,
        "nutrition engine ready"
    );

    app::serve(app::build_app(app_state)).await
}
