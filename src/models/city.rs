use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Reference data, seeded once through the admin endpoints.
/// Name + country are unique together (enforced by a compound index).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct City {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub country: String,
    pub country_code: Option<String>,
    pub region: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub cost_index: Option<f64>,
    #[serde(default)]
    pub popularity_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}
