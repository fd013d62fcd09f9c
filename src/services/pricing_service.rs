use std::collections::HashMap;

use bson::oid::ObjectId;
use chrono::NaiveDate;

use crate::models::activity::Activity;
use crate::models::trip::{StopActivity, TripStop};

pub struct PricingService;

impl PricingService {
    /// Total accommodation spend across a trip's stops.
    pub fn accommodation_total(stops: &[TripStop]) -> f64 {
        stops
            .iter()
            .filter_map(|s| s.accommodation_cost)
            .sum()
    }

    /// Total activity spend; an actual_cost override wins over the catalog
    /// estimate, and unknown catalog entries count as zero.
    pub fn activity_total(
        stop_activities: &[StopActivity],
        catalog: &HashMap<ObjectId, Activity>,
    ) -> f64 {
        stop_activities
            .iter()
            .map(|sa| {
                sa.actual_cost.unwrap_or_else(|| {
                    catalog
                        .get(&sa.activity_id)
                        .map(|a| a.estimated_cost)
                        .unwrap_or(0.0)
                })
            })
            .sum()
    }

    /// Average daily spend over the trip's inclusive date span, rounded to
    /// two decimals for display.
    pub fn per_day_average(total: f64, start: NaiveDate, end: NaiveDate) -> f64 {
        let days = ((end - start).num_days() + 1).max(1);
        (total / days as f64 * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::ActivityCategory;
    use chrono::NaiveDate;

    fn stop(accommodation_cost: Option<f64>) -> TripStop {
        TripStop {
            id: Some(ObjectId::new()),
            trip_id: ObjectId::new(),
            city_id: ObjectId::new(),
            stop_order: 1,
            arrival_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            departure_date: NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
            accommodation_name: None,
            accommodation_cost,
            notes: None,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }

    fn catalog_activity(id: ObjectId, cost: f64) -> Activity {
        Activity {
            id: Some(id),
            city_id: ObjectId::new(),
            name: "test".to_string(),
            category: ActivityCategory::Sightseeing,
            description: None,
            estimated_cost: cost,
            currency: "INR".to_string(),
            duration_minutes: None,
            rating: None,
            image_url: None,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }

    fn stop_activity(activity_id: ObjectId, actual_cost: Option<f64>) -> StopActivity {
        StopActivity {
            id: Some(ObjectId::new()),
            trip_stop_id: ObjectId::new(),
            activity_id,
            scheduled_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            scheduled_time: None,
            actual_cost,
            is_completed: false,
            notes: None,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }

    #[test]
    fn test_accommodation_total_skips_unset_costs() {
        let stops = vec![stop(Some(2500.0)), stop(None), stop(Some(1200.0))];
        assert_eq!(PricingService::accommodation_total(&stops), 3700.0);
    }

    #[test]
    fn test_activity_total_prefers_actual_cost() {
        let id_a = ObjectId::new();
        let id_b = ObjectId::new();
        let mut catalog = HashMap::new();
        catalog.insert(id_a, catalog_activity(id_a, 400.0));
        catalog.insert(id_b, catalog_activity(id_b, 900.0));

        let entries = vec![
            stop_activity(id_a, Some(350.0)), // override wins
            stop_activity(id_b, None),        // falls back to estimate
            stop_activity(ObjectId::new(), None), // unknown counts as zero
        ];

        assert_eq!(PricingService::activity_total(&entries, &catalog), 1250.0);
    }

    #[test]
    fn test_per_day_average_spans_dates_inclusively() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(); // 5 days
        assert_eq!(PricingService::per_day_average(100000.0, start, end), 20000.0);

        // single-day trip divides by one, not zero
        assert_eq!(PricingService::per_day_average(750.0, start, start), 750.0);

        // display rounding to two decimals
        let end = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(); // 3 days
        assert_eq!(PricingService::per_day_average(1000.0, start, end), 333.33);
    }
}
