use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Client,
};
use std::sync::Arc;

use crate::models::restaurant::Restaurant;

#[derive(serde::Deserialize)]
pub struct QueryParams {
    city_id: Option<String>,
    cuisine: Option<String>,
}

/*
    GET /api/restaurants
*/
pub async fn get_restaurants(
    data: web::Data<Arc<Client>>,
    params: web::Query<QueryParams>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Restaurant> =
        client.database("Catalog").collection("Restaurants");

    let mut filter = doc! { "deleted_at": null };
    if let Some(city_id) = &params.city_id {
        match ObjectId::parse_str(city_id) {
            Ok(id) => {
                filter.insert("city_id", id);
            }
            Err(_) => return HttpResponse::BadRequest().body("Invalid city ID"),
        }
    }
    if let Some(cuisine) = &params.cuisine {
        if !cuisine.is_empty() {
            filter.insert("cuisine_type", cuisine.clone());
        }
    }

    match collection.find(filter).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Restaurant>>().await {
            Ok(restaurants) => HttpResponse::Ok().json(restaurants),
            Err(err) => {
                eprintln!("Failed to collect documents: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect restaurants.")
            }
        },
        Err(err) => {
            eprintln!("Failed to find documents: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find restaurants.")
        }
    }
}

/*
    POST /api/admin/restaurants (admin only)
*/
pub async fn add(data: web::Data<Arc<Client>>, input: web::Json<Restaurant>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Restaurant> =
        client.database("Catalog").collection("Restaurants");

    let curr_time = Utc::now();
    let mut submission = input.into_inner();
    submission.created_at = Some(curr_time);
    submission.updated_at = Some(curr_time);

    match collection.insert_one(&submission).await {
        Ok(_) => HttpResponse::Created().json(submission),
        Err(err) => {
            eprintln!("Failed to insert document: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to add restaurant.")
        }
    }
}
