use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::FindOptions,
    Client,
};
use std::sync::Arc;

use crate::models::activity::Activity;

#[derive(serde::Deserialize)]
pub struct QueryParams {
    city_id: Option<String>,
    category: Option<String>,
    min_cost: Option<f64>,
    max_cost: Option<f64>,
    limit: Option<u32>,
}

/*
    GET /api/activities
*/
pub async fn get_activities(
    data: web::Data<Arc<Client>>,
    params: web::Query<QueryParams>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Activity> =
        client.database("Catalog").collection("Activities");

    let mut filter = doc! { "deleted_at": null };
    if let Some(city_id) = &params.city_id {
        match ObjectId::parse_str(city_id) {
            Ok(id) => {
                filter.insert("city_id", id);
            }
            Err(_) => return HttpResponse::BadRequest().body("Invalid city ID"),
        }
    }
    if let Some(category) = &params.category {
        if !category.is_empty() {
            filter.insert("category", category.to_lowercase());
        }
    }
    let mut cost_filter = doc! {};
    if let Some(min_cost) = params.min_cost {
        cost_filter.insert("$gte", min_cost);
    }
    if let Some(max_cost) = params.max_cost {
        cost_filter.insert("$lte", max_cost);
    }
    if !cost_filter.is_empty() {
        filter.insert("estimated_cost", cost_filter);
    }

    let mut options = FindOptions::default();
    options.limit = Some(crate::routes::clamp_limit(params.limit, 50, 100));

    match collection.find(filter).with_options(options).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Activity>>().await {
            Ok(activities) => HttpResponse::Ok().json(activities),
            Err(err) => {
                eprintln!("Failed to collect documents: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect activities.")
            }
        },
        Err(err) => {
            eprintln!("Failed to find documents: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find activities.")
        }
    }
}

/*
    POST /api/admin/activities (admin only)
*/
pub async fn add(data: web::Data<Arc<Client>>, input: web::Json<Activity>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Activity> =
        client.database("Catalog").collection("Activities");

    let mut submission = input.into_inner();
    if submission.estimated_cost < 0.0 {
        return HttpResponse::BadRequest().body("Estimated cost must be non-negative");
    }
    if let Some(rating) = submission.rating {
        if !(0.0..=5.0).contains(&rating) {
            return HttpResponse::BadRequest().body("Rating must be between 0 and 5");
        }
    }

    let curr_time = Utc::now();
    submission.created_at = Some(curr_time);
    submission.updated_at = Some(curr_time);

    match collection.insert_one(&submission).await {
        Ok(_) => HttpResponse::Created().json(submission),
        Err(err) => {
            eprintln!("Failed to insert document: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to add activity.")
        }
    }
}
