use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::activity::Activity;

/// Drives both the budget split percentages and the auto-fill scoring bonuses.
/// Unrecognized values fall back to Balanced.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TravelStyle {
    Budget,
    Luxury,
    #[serde(other)]
    Balanced,
}

impl Default for TravelStyle {
    fn default() -> Self {
        TravelStyle::Balanced
    }
}

impl TravelStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelStyle::Budget => "budget",
            TravelStyle::Balanced => "balanced",
            TravelStyle::Luxury => "luxury",
        }
    }
}

/// A city the user picked in the wizard, with how long they want to stay.
/// Sequence position defines the visiting order.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SelectedCity {
    pub city_id: ObjectId,
    pub city_name: String,
    pub days: u32, // >= 1
}

/// One calendar day of the working plan, tied to a single city.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DayPlanSlot {
    pub date: NaiveDate,
    pub city_id: ObjectId,
    pub city_name: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// Category split of the total budget. Each sub-amount is rounded to the
/// nearest whole currency unit independently, so they may not sum exactly
/// to `total`. That is display rounding, not a bug.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BudgetBreakdown {
    pub transport: f64,
    pub accommodation: f64,
    pub food: f64,
    pub activities: f64,
    pub misc: f64,
    pub total: f64,
}

/// The whole wizard state as one serializable object, so the planner can be
/// exercised without a UI harness.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WizardSession {
    pub trip_name: String,
    pub home_country: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_budget: Option<f64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub travel_style: TravelStyle,
    #[serde(default)]
    pub selected_cities: Vec<SelectedCity>,
    #[serde(default)]
    pub day_plan: Vec<DayPlanSlot>,
}

impl WizardSession {
    /// Inclusive day count of the trip date range; 0 when either date is unset.
    pub fn total_days(&self) -> u32 {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                let span = (end - start).num_days() + 1;
                span.max(1) as u32
            }
            _ => 0,
        }
    }

    pub fn allocated_days(&self) -> u32 {
        self.selected_cities.iter().map(|c| c.days.max(1)).sum()
    }

    /// Soft check only: the UI warns when negative but nothing blocks.
    pub fn days_remaining(&self) -> i64 {
        self.total_days() as i64 - self.allocated_days() as i64
    }
}
