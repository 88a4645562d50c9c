use serde::Deserialize;
use time::Date;

use super::assembler::PlanRequestPreferences;

#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    pub start_date: Date,
    pub end_date: Date,
    #[serde(default)]
    pub preferences: PlanRequestPreferences,
}
