use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;

use globetrotter_api::models::activity::{Activity, ActivityCategory};
use globetrotter_api::models::wizard::{SelectedCity, TravelStyle, WizardSession};
use globetrotter_api::services::budget_service::BudgetService;
use globetrotter_api::services::planner_service::PlannerService;
use globetrotter_api::services::wizard_service::WizardService;

fn activity(city_id: ObjectId, name: &str, cost: f64, rating: f64) -> Activity {
    Activity {
        id: Some(ObjectId::new()),
        city_id,
        name: name.to_string(),
        category: ActivityCategory::Sightseeing,
        description: None,
        estimated_cost: cost,
        currency: "INR".to_string(),
        duration_minutes: Some(120),
        rating: Some(rating),
        image_url: None,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}

fn session(cities: Vec<SelectedCity>) -> WizardSession {
    WizardSession {
        trip_name: "Golden Triangle".to_string(),
        home_country: Some("India".to_string()),
        start_date: Some(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
        end_date: Some(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()),
        total_budget: Some(100_000.0),
        currency: Some("INR".to_string()),
        travel_style: TravelStyle::Balanced,
        selected_cities: cities,
        day_plan: Vec::new(),
    }
}

#[test]
fn full_planning_flow_from_session_to_filled_plan() {
    let delhi = ObjectId::new();
    let agra = ObjectId::new();

    let catalog = vec![
        activity(delhi, "Red Fort", 500.0, 4.6),
        activity(delhi, "Street food walk", 800.0, 4.8),
        activity(delhi, "Private heritage tour", 6000.0, 4.9),
        activity(agra, "Taj Mahal", 1100.0, 4.9),
        activity(agra, "Agra Fort", 650.0, 4.5),
    ];

    let session = session(vec![
        SelectedCity {
            city_id: delhi,
            city_name: "Delhi".to_string(),
            days: 3,
        },
        SelectedCity {
            city_id: agra,
            city_name: "Agra".to_string(),
            days: 2,
        },
    ]);

    // Balanced style puts 20% of 100k into activities
    let breakdown = BudgetService::allocate(session.total_budget.unwrap(), session.travel_style);
    assert_eq!(breakdown.activities, 20_000.0);
    assert_eq!(breakdown.total, 100_000.0);

    let preview = WizardService::build_preview(session.clone(), &catalog);
    assert_eq!(preview.total_days, 5);
    assert_eq!(preview.allocated_days, 5);
    assert_eq!(preview.days_remaining, 0);
    assert_eq!(preview.day_plan.len(), 5);

    // First three days in Delhi, last two in Agra, consecutive dates
    for (i, slot) in preview.day_plan.iter().enumerate() {
        let expected_city = if i < 3 { delhi } else { agra };
        assert_eq!(slot.city_id, expected_city);
        assert_eq!(
            slot.date,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap() + chrono::Duration::days(i as i64)
        );
        assert!(!slot.activities.is_empty(), "day {} left empty", i + 1);
        assert!(slot.activities.len() <= 3);
    }

    // 4000/day cap: the 6000 tour only fits as a first pick, and days
    // starting with Red Fort (500) still have room for the food walk
    for slot in preview.day_plan.iter().take(3) {
        let spend: f64 = slot.activities.iter().map(|a| a.estimated_cost).sum();
        assert!(
            spend <= 4000.0 || slot.activities.len() == 1,
            "overspent day: {}",
            spend
        );
    }
}

#[test]
fn manual_toggle_survives_auto_fill() {
    let delhi = ObjectId::new();
    let catalog = vec![
        activity(delhi, "Red Fort", 500.0, 4.6),
        activity(delhi, "Street food walk", 800.0, 4.8),
    ];
    let hand_pick = activity(delhi, "Gallery visit", 300.0, 3.9);

    let session = session(vec![SelectedCity {
        city_id: delhi,
        city_name: "Delhi".to_string(),
        days: 5,
    }]);

    let plan = PlannerService::structure_plan(session.start_date, &session.selected_cities);
    assert_eq!(plan.len(), 5);

    // Hand-pick one activity on day 2, then auto-fill the rest
    let plan = PlannerService::toggle_activity(plan, 1, &hand_pick);
    let plan = PlannerService::auto_fill(plan, &catalog, 20_000.0, 5, TravelStyle::Balanced);

    assert_eq!(plan[1].activities.len(), 1);
    assert_eq!(plan[1].activities[0].name, "Gallery visit");
    for (i, slot) in plan.iter().enumerate() {
        if i != 1 {
            assert_eq!(slot.activities.len(), 2, "day {} should be auto-filled", i + 1);
        }
    }

    // Toggling the same activity again removes it
    let plan = PlannerService::toggle_activity(plan, 1, &hand_pick);
    assert!(plan[1].activities.is_empty());
}

#[test]
fn resizing_the_trip_replaces_the_plan() {
    let delhi = ObjectId::new();
    let mut session = session(vec![SelectedCity {
        city_id: delhi,
        city_name: "Delhi".to_string(),
        days: 5,
    }]);

    let plan = PlannerService::structure_plan(session.start_date, &session.selected_cities);
    assert_eq!(plan.len(), 5);

    // Stretch the stay to 7 days; the stale 5-day plan gets rebuilt
    session.selected_cities[0].days = 7;
    let plan = PlannerService::sync_plan(plan, session.start_date, &session.selected_cities);
    assert_eq!(plan.len(), 7);

    // Same shape again leaves it untouched, activities included
    let hand_pick = activity(delhi, "Gallery visit", 300.0, 3.9);
    let plan = PlannerService::toggle_activity(plan, 0, &hand_pick);
    let plan = PlannerService::sync_plan(plan, session.start_date, &session.selected_cities);
    assert_eq!(plan.len(), 7);
    assert_eq!(plan[0].activities.len(), 1);
}
