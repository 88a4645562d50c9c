use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use time::Date;
use tracing::error;

/// Failures of the nutrition engine, passed to callers unchanged.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("profile is incomplete, missing: {}", missing.join(", "))]
    IncompleteProfile { missing: Vec<String> },

    #[error("unrecognized activity level: {0}")]
    InvalidActivityLevel(String),

    #[error("nutrition calculation produced a non-finite {0}")]
    InvalidNutritionCalculation(String),

    #[error("invalid date range {start}..={end}")]
    InvalidDateRange { start: Date, end: Date },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("persistence failure: {0:#}")]
    Persistence(#[source] anyhow::Error),
}

impl PlanError {
    pub fn status(&self) -> StatusCode {
        match self {
            PlanError::IncompleteProfile { .. }
            | PlanError::InvalidActivityLevel(_)
            | PlanError::InvalidNutritionCalculation(_)
            | PlanError::InvalidDateRange { .. } => StatusCode::BAD_REQUEST,
            PlanError::NotFound(_) => StatusCode::NOT_FOUND,
            PlanError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PlanError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            PlanError::IncompleteProfile { missing } => json!({
                "error": self.to_string(),
                "missing_fields": missing,
            }),
            PlanError::Persistence(e) => {
                error!(error = %format!("{e:#}"), "persistence failure");
                json!({ "error": "internal error" })
            }
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
