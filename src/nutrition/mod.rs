pub mod calculator;
pub mod handlers;
pub mod model;
pub mod repo;
pub mod targets;

use crate::state::AppState;
use axum::Router;

pub use model::NutritionTarget;
pub use repo::{PgTargetStore, TargetStore};
pub use targets::TargetCache;

pub fn router() -> Router<AppState> {
    handlers::targets_routes()
}
