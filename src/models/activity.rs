use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Sightseeing,
    Food,
    Adventure,
    Culture,
    Shopping,
    Nightlife,
    Nature,
    #[serde(other)]
    Other,
}

/// Catalog entry; read-only from the planner's point of view.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Activity {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub city_id: ObjectId,
    pub name: String,
    pub category: ActivityCategory,
    pub description: Option<String>,
    #[serde(default)]
    pub estimated_cost: f64,
    pub currency: String,
    pub duration_minutes: Option<u16>,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}
