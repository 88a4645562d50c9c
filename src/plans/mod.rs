pub mod allocator;
pub mod assembler;
mod dto;
pub mod handlers;
pub mod model;
pub mod repo;

use crate::state::AppState;
use axum::Router;

pub use allocator::DailyAllocator;
pub use assembler::PlanAssembler;
pub use model::MealPlan;
pub use repo::{PgPlanStore, PlanStore};

pub fn router() -> Router<AppState> {
    handlers::plan_routes()
}
