use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Transport {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub transport_type: String, // flight / train / bus
    pub operator_name: String,
    pub from_city_id: ObjectId,
    pub to_city_id: ObjectId,
    pub departure_time: Option<String>, // "HH:MM" local
    pub arrival_time: Option<String>,
    pub duration_minutes: Option<u16>,
    pub price: f64,
    pub currency: String,
    pub class_type: Option<String>,
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}
