use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Draft,
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

impl Default for TripStatus {
    fn default() -> Self {
        TripStatus::Draft
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Trip {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate, // start_date <= end_date, checked at the route
    #[serde(default)]
    pub status: TripStatus,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub total_estimated_cost: f64,
    pub currency: String,
    pub travel_style: Option<String>,
    pub cover_photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// One contiguous stay in a city. stop_order is unique within a trip and
/// assigned server-side when the client omits it.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TripStop {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub trip_id: ObjectId,
    pub city_id: ObjectId,
    pub stop_order: i32,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate, // arrival_date < departure_date
    pub accommodation_name: Option<String>,
    pub accommodation_cost: Option<f64>,
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StopActivity {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub trip_stop_id: ObjectId,
    pub activity_id: ObjectId,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: Option<String>,
    pub actual_cost: Option<f64>, // overrides the catalog estimate when set
    #[serde(default)]
    pub is_completed: bool,
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ShareType {
    Public,
    Private,
    Friends,
}

impl Default for ShareType {
    fn default() -> Self {
        ShareType::Public
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TripShare {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub trip_id: ObjectId,
    pub share_token: String, // uuid v4
    #[serde(default)]
    pub share_type: ShareType,
    pub shared_with_email: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
