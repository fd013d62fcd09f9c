use crate::models::wizard::{BudgetBreakdown, TravelStyle};

/// Fixed allocation percentages per travel style:
/// transport / accommodation / food / activities / misc.
fn allocation_table(style: TravelStyle) -> [f64; 5] {
    match style {
        TravelStyle::Budget => [0.25, 0.25, 0.25, 0.15, 0.10],
        TravelStyle::Balanced => [0.20, 0.30, 0.20, 0.20, 0.10],
        TravelStyle::Luxury => [0.15, 0.40, 0.15, 0.20, 0.10],
    }
}

pub struct BudgetService;

impl BudgetService {
    /// Split a total trip budget across the five spending categories.
    /// Non-finite or negative totals are treated as 0. Each category is
    /// rounded to the nearest whole unit on its own; the rounding drift
    /// against `total` is accepted, not redistributed.
    pub fn allocate(total_budget: f64, style: TravelStyle) -> BudgetBreakdown {
        let total = if total_budget.is_finite() && total_budget >= 0.0 {
            total_budget
        } else {
            0.0
        };

        let [transport, accommodation, food, activities, misc] = allocation_table(style);

        BudgetBreakdown {
            transport: (total * transport).round(),
            accommodation: (total * accommodation).round(),
            food: (total * food).round(),
            activities: (total * activities).round(),
            misc: (total * misc).round(),
            total,
        }
    }
}
