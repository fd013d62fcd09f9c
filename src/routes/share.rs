use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use mongodb::{
    bson::{doc, oid::ObjectId},
    Client, Collection,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::auth::Claims;
use crate::models::trip::{ShareType, Trip, TripShare};
use crate::routes::trip::{build_trip_detail, find_owned_trip};

#[derive(Debug, Deserialize)]
pub struct CreateShareRequest {
    pub share_type: Option<ShareType>,
    pub shared_with_email: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/*
    POST /api/trips/{id}/share
*/
pub async fn create_share(
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
    input: web::Json<CreateShareRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let user_id = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };
    let trip_id = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    match find_owned_trip(&client, trip_id, user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().body("Trip not found"),
        Err(err) => {
            eprintln!("Failed to retrieve trip: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to share trip");
        }
    }

    let input = input.into_inner();
    let curr_time = Utc::now();
    let share = TripShare {
        id: Some(ObjectId::new()),
        trip_id,
        share_token: Uuid::new_v4().to_string(),
        share_type: input.share_type.unwrap_or_default(),
        shared_with_email: input.shared_with_email,
        expires_at: input.expires_at,
        created_at: Some(curr_time),
    };

    let collection: Collection<TripShare> = client.database("Trips").collection("Shares");
    match collection.insert_one(&share).await {
        Ok(_) => HttpResponse::Created().json(share),
        Err(err) => {
            eprintln!("Failed to insert document: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to share trip.")
        }
    }
}

/*
    GET /api/shared/{token} (no auth)
*/
pub async fn get_shared_trip(
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let client = data.into_inner();
    let token = path.into_inner();

    let shares: Collection<TripShare> = client.database("Trips").collection("Shares");
    let share = match shares.find_one(doc! { "share_token": &token }).await {
        Ok(Some(share)) => share,
        Ok(None) => return HttpResponse::NotFound().body("Shared trip not found"),
        Err(err) => {
            eprintln!("Failed to find share: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch shared trip");
        }
    };

    if let Some(expires_at) = share.expires_at {
        if expires_at < Utc::now() {
            return HttpResponse::NotFound().body("Shared trip not found");
        }
    }

    let trips: Collection<Trip> = client.database("Trips").collection("Trips");
    let trip = match trips
        .find_one(doc! { "_id": share.trip_id, "deleted_at": null })
        .await
    {
        Ok(Some(trip)) => trip,
        Ok(None) => return HttpResponse::NotFound().body("Shared trip not found"),
        Err(err) => {
            eprintln!("Failed to find trip: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch shared trip");
        }
    };

    match build_trip_detail(&client, &trip).await {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(err) => {
            eprintln!("Failed to build trip detail: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch shared trip")
        }
    }
}
