use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::model::NutritionTarget;
use crate::{auth::AuthUser, error::PlanError, state::AppState};

pub fn targets_routes() -> Router<AppState> {
    Router::new().route(
        "/nutrition/targets",
        get(get_targets).delete(invalidate_targets),
    )
}

#[instrument(skip(state))]
pub async fn get_targets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<NutritionTarget>, PlanError> {
    let target = state.targets.get(user_id).await?;
    Ok(Json(target))
}

/// Drops the cached target so the next plan generation recomputes it.
#[instrument(skip(state))]
pub async fn invalidate_targets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<StatusCode, PlanError> {
    state.targets.invalidate(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
