use serde::{Deserialize, Serialize};

/// Meal category with a fixed share of the daily budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl SlotType {
    pub const ALL: [SlotType; 4] = [
        SlotType::Breakfast,
        SlotType::Lunch,
        SlotType::Dinner,
        SlotType::Snack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SlotType::Breakfast => "breakfast",
            SlotType::Lunch => "lunch",
            SlotType::Dinner => "dinner",
            SlotType::Snack => "snack",
        }
    }

    pub fn time_label(self) -> &'static str {
        match self {
            SlotType::Breakfast => "8:00 AM",
            SlotType::Lunch => "12:00 PM",
            SlotType::Dinner => "7:00 PM",
            SlotType::Snack => "3:00 PM",
        }
    }

    /// Fraction of daily calories for the whole slot.
    pub fn budget_share(self) -> f64 {
        match self {
            SlotType::Breakfast => 0.25,
            SlotType::Lunch => 0.30,
            SlotType::Dinner => 0.35,
            SlotType::Snack => 0.10,
        }
    }

    /// How many independent resolutions split the slot's share.
    pub fn instances(self) -> u32 {
        match self {
            SlotType::Snack => 2,
            SlotType::Breakfast | SlotType::Lunch | SlotType::Dinner => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_cover_the_whole_day() {
        let total: f64 = SlotType::ALL.iter().map(|s| s.budget_share()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SlotType::Dinner).unwrap(), "\"dinner\"");
        assert_eq!(SlotType::Snack.time_label(), "3:00 PM");
    }
}
