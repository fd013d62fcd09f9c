use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::FindOptions,
    Client,
};
use std::sync::Arc;

use crate::models::city::City;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 100;

#[derive(serde::Deserialize)]
pub struct QueryParams {
    limit: Option<u32>,
    search: Option<String>,
    country: Option<String>,
}

/*
    GET /api/cities
*/
pub async fn get_cities(
    data: web::Data<Arc<Client>>,
    params: web::Query<QueryParams>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<City> = client.database("Catalog").collection("Cities");

    let mut options = FindOptions::default();
    options.limit = Some(crate::routes::clamp_limit(
        params.limit,
        DEFAULT_LIMIT,
        MAX_LIMIT,
    ));
    options.sort = Some(doc! { "popularity_score": -1 });

    let mut filter = doc! { "deleted_at": null };
    if let Some(search_text) = &params.search {
        if !search_text.is_empty() {
            filter.insert(
                "name",
                doc! {
                    "$regex": format!("^{}", regex::escape(search_text)),
                    "$options": "i"
                },
            );
        }
    }
    if let Some(country) = &params.country {
        if !country.is_empty() {
            filter.insert("country", country.clone());
        }
    }

    match collection.find(filter).with_options(options).await {
        Ok(cursor) => match cursor.try_collect::<Vec<City>>().await {
            Ok(cities) => HttpResponse::Ok().json(cities),
            Err(err) => {
                eprintln!("Failed to collect documents: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect cities.")
            }
        },
        Err(err) => {
            eprintln!("Failed to find documents: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find cities.")
        }
    }
}

/*
    GET /api/cities/popular
*/
pub async fn get_popular(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<City> = client.database("Catalog").collection("Cities");

    let mut options = FindOptions::default();
    options.limit = Some(10);
    options.sort = Some(doc! { "popularity_score": -1 });

    match collection
        .find(doc! { "deleted_at": null })
        .with_options(options)
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<City>>().await {
            Ok(cities) => HttpResponse::Ok().json(cities),
            Err(err) => {
                eprintln!("Failed to collect documents: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect cities.")
            }
        },
        Err(err) => {
            eprintln!("Failed to find documents: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find cities.")
        }
    }
}

/*
    GET /api/cities/{id}
*/
pub async fn get_by_id(path: web::Path<String>, data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let city_id = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    let collection: mongodb::Collection<City> = client.database("Catalog").collection("Cities");
    match collection
        .find_one(doc! { "_id": city_id, "deleted_at": null })
        .await
    {
        Ok(Some(city)) => HttpResponse::Ok().json(city),
        Ok(None) => HttpResponse::NotFound().body("City not found"),
        Err(err) => {
            eprintln!("Failed to find document: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch city.")
        }
    }
}

/*
    POST /api/admin/cities (admin only)
*/
pub async fn add(data: web::Data<Arc<Client>>, input: web::Json<City>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<City> = client.database("Catalog").collection("Cities");

    let curr_time = Utc::now();
    let mut submission = input.into_inner();
    submission.created_at = Some(curr_time);
    submission.updated_at = Some(curr_time);

    match collection.insert_one(&submission).await {
        Ok(_) => HttpResponse::Created().json(submission),
        Err(err) => {
            eprintln!("Failed to insert document: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to add city.")
        }
    }
}
