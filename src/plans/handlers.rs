use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use super::dto::GeneratePlanRequest;
use super::model::MealPlan;
use crate::{auth::AuthUser, error::PlanError, state::AppState};

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/meal-plans", post(generate_plan))
        .route("/meal-plans/current", get(current_plan))
}

#[instrument(skip(state, body))]
pub async fn generate_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<GeneratePlanRequest>,
) -> Result<(StatusCode, Json<MealPlan>), PlanError> {
    let plan = state
        .planner
        .generate_meal_plan(user_id, body.start_date, body.end_date, body.preferences)
        .await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[instrument(skip(state))]
pub async fn current_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MealPlan>, PlanError> {
    let today = OffsetDateTime::now_utc().date();
    let plan = state.planner.current_plan(user_id, today).await?;
    Ok(Json(plan))
}
