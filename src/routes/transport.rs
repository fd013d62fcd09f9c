use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Client,
};
use std::sync::Arc;

use crate::models::transport::Transport;

#[derive(serde::Deserialize)]
pub struct QueryParams {
    from_city_id: Option<String>,
    to_city_id: Option<String>,
}

/*
    GET /api/transport
*/
pub async fn get_transport(
    data: web::Data<Arc<Client>>,
    params: web::Query<QueryParams>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Transport> =
        client.database("Catalog").collection("Transports");

    let mut filter = doc! { "deleted_at": null };
    if let Some(from_city_id) = &params.from_city_id {
        match ObjectId::parse_str(from_city_id) {
            Ok(id) => {
                filter.insert("from_city_id", id);
            }
            Err(_) => return HttpResponse::BadRequest().body("Invalid city ID"),
        }
    }
    if let Some(to_city_id) = &params.to_city_id {
        match ObjectId::parse_str(to_city_id) {
            Ok(id) => {
                filter.insert("to_city_id", id);
            }
            Err(_) => return HttpResponse::BadRequest().body("Invalid city ID"),
        }
    }

    match collection.find(filter).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Transport>>().await {
            Ok(transports) => HttpResponse::Ok().json(transports),
            Err(err) => {
                eprintln!("Failed to collect documents: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect transport options.")
            }
        },
        Err(err) => {
            eprintln!("Failed to find documents: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find transport options.")
        }
    }
}

/*
    POST /api/admin/transport (admin only)
*/
pub async fn add(data: web::Data<Arc<Client>>, input: web::Json<Transport>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Transport> =
        client.database("Catalog").collection("Transports");

    let curr_time = Utc::now();
    let mut submission = input.into_inner();
    submission.created_at = Some(curr_time);
    submission.updated_at = Some(curr_time);

    match collection.insert_one(&submission).await {
        Ok(_) => HttpResponse::Created().json(submission),
        Err(err) => {
            eprintln!("Failed to insert document: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to add transport option.")
        }
    }
}
