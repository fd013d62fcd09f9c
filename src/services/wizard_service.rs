use std::sync::Arc;

use chrono::{Duration, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Client, Collection,
};
use serde::Serialize;

use crate::models::activity::Activity;
use crate::models::trip::{StopActivity, Trip, TripStatus, TripStop};
use crate::models::wizard::{BudgetBreakdown, DayPlanSlot, WizardSession};
use crate::services::budget_service::BudgetService;
use crate::services::planner_service::PlannerService;

#[derive(Debug, Serialize)]
pub struct WizardPreview {
    pub budget_breakdown: BudgetBreakdown,
    pub day_plan: Vec<DayPlanSlot>,
    pub total_days: u32,
    pub allocated_days: u32,
    pub days_remaining: i64, // negative means over-allocated; a warning, never an error
}

#[derive(Debug, Serialize)]
pub struct WizardOutcome {
    pub trip_id: ObjectId,
    pub stop_ids: Vec<ObjectId>,
    pub activity_count: usize,
}

/// Runs the wizard pipeline (allocator -> structurer -> auto-filler) against
/// the catalog and turns the finished plan into persisted trip records.
pub struct WizardService {
    client: Arc<Client>,
}

impl WizardService {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    fn activities_collection(&self) -> Collection<Activity> {
        self.client.database("Catalog").collection("Activities")
    }

    /// Candidate activities for every selected city, fetched concurrently.
    /// The per-city lookups are independent; they only need to all complete
    /// before aggregation.
    pub async fn fetch_candidate_activities(
        &self,
        session: &WizardSession,
    ) -> Result<Vec<Activity>, mongodb::error::Error> {
        let collection = self.activities_collection();

        let lookups = session.selected_cities.iter().map(|city| {
            let collection = collection.clone();
            let city_id = city.city_id;
            async move {
                let cursor = collection
                    .find(doc! { "city_id": city_id, "deleted_at": null })
                    .await?;
                cursor.try_collect::<Vec<Activity>>().await
            }
        });

        let results = futures::future::try_join_all(lookups).await?;
        Ok(results.into_iter().flatten().collect())
    }

    pub async fn preview(
        &self,
        session: WizardSession,
    ) -> Result<WizardPreview, mongodb::error::Error> {
        let catalog = self.fetch_candidate_activities(&session).await?;
        Ok(Self::build_preview(session, &catalog))
    }

    /// The pure part of the pipeline, separated so tests can drive it with an
    /// in-memory catalog.
    pub fn build_preview(session: WizardSession, catalog: &[Activity]) -> WizardPreview {
        let total_days = session.total_days();
        let allocated_days = session.allocated_days();
        let days_remaining = session.days_remaining();

        let breakdown = BudgetService::allocate(
            session.total_budget.unwrap_or(0.0),
            session.travel_style,
        );
        let slots = PlannerService::sync_plan(
            session.day_plan,
            session.start_date,
            &session.selected_cities,
        );
        let day_plan = PlannerService::auto_fill(
            slots,
            catalog,
            breakdown.activities,
            total_days,
            session.travel_style,
        );

        WizardPreview {
            budget_breakdown: breakdown,
            day_plan,
            total_days,
            allocated_days,
            days_remaining,
        }
    }

    /// Persist a finished wizard session: one Trip, one Stop per selected
    /// city (arrival = running cursor, departure = cursor + days), and one
    /// StopActivity per planned slot activity. Writes are sequential; there
    /// is no cross-document transaction.
    pub async fn complete(
        &self,
        user_id: ObjectId,
        session: WizardSession,
    ) -> Result<WizardOutcome, Box<dyn std::error::Error>> {
        let start_date = session.start_date.ok_or("Start date required")?;
        let end_date = session.end_date.ok_or("End date required")?;
        if end_date < start_date {
            return Err("End date must be on or after start date".into());
        }
        if session.trip_name.trim().is_empty() {
            return Err("Trip name required".into());
        }
        if session.selected_cities.is_empty() {
            return Err("At least one destination required".into());
        }

        let catalog = self.fetch_candidate_activities(&session).await?;
        let selected_cities = session.selected_cities.clone();
        let travel_style = session.travel_style;
        let home_country = session.home_country.clone();
        let trip_name = session.trip_name.clone();
        let total_budget = session.total_budget.unwrap_or(0.0);
        let currency = session
            .currency
            .clone()
            .unwrap_or_else(|| "INR".to_string());

        let preview = Self::build_preview(session, &catalog);
        let day_plan = preview.day_plan;

        let now = Utc::now();
        let trip_id = ObjectId::new();
        let trip = Trip {
            id: Some(trip_id),
            user_id,
            name: trip_name,
            description: Some(format!(
                "{} trip from {}",
                travel_style.as_str(),
                home_country.as_deref().unwrap_or("home")
            )),
            start_date,
            end_date,
            status: TripStatus::Draft,
            is_public: false,
            total_estimated_cost: total_budget,
            currency,
            travel_style: Some(travel_style.as_str().to_string()),
            cover_photo_url: None,
            created_at: Some(now),
            updated_at: Some(now),
            deleted_at: None,
        };

        let db = self.client.database("Trips");
        let trips: Collection<Trip> = db.collection("Trips");
        let stops: Collection<TripStop> = db.collection("Stops");
        let stop_activities: Collection<StopActivity> = db.collection("StopActivities");

        trips.insert_one(&trip).await?;

        let mut stop_ids = Vec::new();
        let mut activity_count = 0usize;
        let mut cursor_date = start_date;
        let mut slot_offset = 0usize;

        for (index, city) in selected_cities.iter().enumerate() {
            let days = city.days.max(1) as usize;
            let arrival = cursor_date;
            let departure = cursor_date + Duration::days(days as i64);

            let stop_id = ObjectId::new();
            let stop = TripStop {
                id: Some(stop_id),
                trip_id,
                city_id: city.city_id,
                stop_order: index as i32 + 1,
                arrival_date: arrival,
                departure_date: departure,
                accommodation_name: None,
                accommodation_cost: None,
                notes: Some("Planned via wizard".to_string()),
                created_at: Some(now),
                updated_at: Some(now),
                deleted_at: None,
            };
            stops.insert_one(&stop).await?;
            stop_ids.push(stop_id);

            // Slots are grouped by position, so a city visited twice keeps
            // its activities with the right stop.
            let mut batch = Vec::new();
            for slot in day_plan.iter().skip(slot_offset).take(days) {
                for activity in &slot.activities {
                    let activity_id = match activity.id {
                        Some(id) => id,
                        None => continue,
                    };
                    batch.push(StopActivity {
                        id: None,
                        trip_stop_id: stop_id,
                        activity_id,
                        scheduled_date: slot.date,
                        scheduled_time: None,
                        actual_cost: None,
                        is_completed: false,
                        notes: None,
                        created_at: Some(now),
                        updated_at: Some(now),
                        deleted_at: None,
                    });
                }
            }
            if !batch.is_empty() {
                stop_activities.insert_many(&batch).await?;
                activity_count += batch.len();
            }

            slot_offset += days;
            cursor_date = departure;
        }

        println!(
            "Wizard created trip {} with {} stops and {} activities",
            trip_id,
            stop_ids.len(),
            activity_count
        );

        Ok(WizardOutcome {
            trip_id,
            stop_ids,
            activity_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::ActivityCategory;
    use crate::models::wizard::{SelectedCity, TravelStyle};
    use chrono::NaiveDate;

    fn catalog_activity(city_id: ObjectId, name: &str, cost: f64, rating: f64) -> Activity {
        Activity {
            id: Some(ObjectId::new()),
            city_id,
            name: name.to_string(),
            category: ActivityCategory::Sightseeing,
            description: None,
            estimated_cost: cost,
            currency: "INR".to_string(),
            duration_minutes: None,
            rating: Some(rating),
            image_url: None,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }

    #[test]
    fn test_build_preview_runs_full_pipeline() {
        let goa = ObjectId::new();
        let session = WizardSession {
            trip_name: "Goa escape".to_string(),
            home_country: Some("India".to_string()),
            start_date: NaiveDate::from_ymd_opt(2025, 11, 3),
            end_date: NaiveDate::from_ymd_opt(2025, 11, 7),
            total_budget: Some(100000.0),
            currency: Some("INR".to_string()),
            travel_style: TravelStyle::Balanced,
            selected_cities: vec![SelectedCity {
                city_id: goa,
                city_name: "Goa".to_string(),
                days: 5,
            }],
            day_plan: Vec::new(),
        };
        let catalog = vec![
            catalog_activity(goa, "flea market", 0.0, 4.2),
            catalog_activity(goa, "diving", 3500.0, 4.6),
        ];

        let preview = WizardService::build_preview(session, &catalog);

        assert_eq!(preview.total_days, 5);
        assert_eq!(preview.allocated_days, 5);
        assert_eq!(preview.days_remaining, 0);
        assert_eq!(preview.budget_breakdown.activities, 20000.0);
        assert_eq!(preview.day_plan.len(), 5);
        // 4000/day cap fits both catalog entries on every day
        for slot in &preview.day_plan {
            assert_eq!(slot.activities.len(), 2);
        }
    }

    #[test]
    fn test_build_preview_without_dates_produces_no_slots() {
        let session = WizardSession {
            trip_name: "unplanned".to_string(),
            home_country: None,
            start_date: None,
            end_date: None,
            total_budget: None,
            currency: None,
            travel_style: TravelStyle::Balanced,
            selected_cities: Vec::new(),
            day_plan: Vec::new(),
        };

        let preview = WizardService::build_preview(session, &[]);
        assert_eq!(preview.total_days, 0);
        assert!(preview.day_plan.is_empty());
        assert_eq!(preview.budget_breakdown.total, 0.0);
    }
}
