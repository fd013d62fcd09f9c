use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use chrono::{NaiveDate, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::FindOptions,
    Client, Collection,
};
use serde::Deserialize;

use crate::middleware::auth::Claims;
use crate::models::trip::{StopActivity, TripStop};
use crate::routes::trip::find_owned_trip;

fn parse_user_id(claims: &Claims) -> Result<ObjectId, HttpResponse> {
    ObjectId::parse_str(&claims.user_id)
        .map_err(|_| HttpResponse::BadRequest().body("Invalid user ID"))
}

/// Resolve a stop and check it belongs to a trip owned by the caller.
async fn find_owned_stop(
    client: &Client,
    stop_id: ObjectId,
    user_id: ObjectId,
) -> Result<Option<TripStop>, mongodb::error::Error> {
    let stops: Collection<TripStop> = client.database("Trips").collection("Stops");
    let stop = match stops
        .find_one(doc! { "_id": stop_id, "deleted_at": null })
        .await?
    {
        Some(stop) => stop,
        None => return Ok(None),
    };

    match find_owned_trip(client, stop.trip_id, user_id).await? {
        Some(_) => Ok(Some(stop)),
        None => Ok(None),
    }
}

/*
    GET /api/trips/{id}/stops
*/
pub async fn get_stops(
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let client = data.into_inner();
    let user_id = match parse_user_id(&claims) {
        Ok(id) => id,
        Err(resp) => return resp,
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
            return HttpResponse::InternalServerError().body("Failed to fetch stops");
        }
    }

    let collection: Collection<TripStop> = client.database("Trips").collection("Stops");
    let mut options = FindOptions::default();
    options.sort = Some(doc! { "stop_order": 1 });

    match collection
        .find(doc! { "trip_id": trip_id, "deleted_at": null })
        .with_options(options)
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<TripStop>>().await {
            Ok(stops) => HttpResponse::Ok().json(stops),
            Err(err) => {
                eprintln!("Failed to collect stops: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to fetch stops")
            }
        },
        Err(err) => {
            eprintln!("Failed to find stops: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch stops")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateStopRequest {
    pub city_id: String,
    pub stop_order: Option<i32>,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub accommodation_name: Option<String>,
    pub accommodation_cost: Option<f64>,
    pub notes: Option<String>,
}

/*
    POST /api/trips/{id}/stops
*/
pub async fn add_stop(
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
    input: web::Json<CreateStopRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let user_id = match parse_user_id(&claims) {
        Ok(id) => id,
        Err(resp) => return resp,
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
            return HttpResponse::InternalServerError().body("Failed to create stop");
        }
    }

    let input = input.into_inner();
    let city_id = match ObjectId::parse_str(&input.city_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid city ID"),
    };
    if input.departure_date <= input.arrival_date {
        return HttpResponse::BadRequest().body("Departure date must be after arrival date");
    }
    if let Some(cost) = input.accommodation_cost {
        if cost < 0.0 {
            return HttpResponse::BadRequest().body("Accommodation cost must be non-negative");
        }
    }

    let collection: Collection<TripStop> = client.database("Trips").collection("Stops");

    // Assign the next order index when the client doesn't pick one
    let stop_order = match input.stop_order {
        Some(order) if order > 0 => order,
        _ => {
            let mut options = FindOptions::default();
            options.sort = Some(doc! { "stop_order": -1 });
            options.limit = Some(1);
            match collection
                .find(doc! { "trip_id": trip_id, "deleted_at": null })
                .with_options(options)
                .await
            {
                Ok(cursor) => cursor
                    .try_collect::<Vec<TripStop>>()
                    .await
                    .ok()
                    .and_then(|stops| stops.first().map(|s| s.stop_order))
                    .unwrap_or(0)
                    + 1,
                Err(err) => {
                    eprintln!("Failed to find last stop: {:?}", err);
                    return HttpResponse::InternalServerError().body("Failed to create stop");
                }
            }
        }
    };

    let curr_time = Utc::now();
    let stop = TripStop {
        id: Some(ObjectId::new()),
        trip_id,
        city_id,
        stop_order,
        arrival_date: input.arrival_date,
        departure_date: input.departure_date,
        accommodation_name: input.accommodation_name,
        accommodation_cost: input.accommodation_cost,
        notes: input.notes,
        created_at: Some(curr_time),
        updated_at: Some(curr_time),
        deleted_at: None,
    };

    match collection.insert_one(&stop).await {
        Ok(_) => HttpResponse::Created().json(stop),
        Err(err) => {
            eprintln!("Failed to insert document: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create stop.")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateStopActivityRequest {
    pub activity_id: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: Option<String>,
    pub actual_cost: Option<f64>,
    pub notes: Option<String>,
}

/*
    POST /api/stops/{stop_id}/activities
*/
pub async fn add_stop_activity(
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
    input: web::Json<CreateStopActivityRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let user_id = match parse_user_id(&claims) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let stop_id = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    match find_owned_stop(&client, stop_id, user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().body("Stop not found"),
        Err(err) => {
            eprintln!("Failed to retrieve stop: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to add activity");
        }
    }

    let input = input.into_inner();
    let activity_id = match ObjectId::parse_str(&input.activity_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid activity ID"),
    };
    if let Some(cost) = input.actual_cost {
        if cost < 0.0 {
            return HttpResponse::BadRequest().body("Actual cost must be non-negative");
        }
    }

    let curr_time = Utc::now();
    let stop_activity = StopActivity {
        id: Some(ObjectId::new()),
        trip_stop_id: stop_id,
        activity_id,
        scheduled_date: input.scheduled_date,
        scheduled_time: input.scheduled_time,
        actual_cost: input.actual_cost,
        is_completed: false,
        notes: input.notes,
        created_at: Some(curr_time),
        updated_at: Some(curr_time),
        deleted_at: None,
    };

    let collection: Collection<StopActivity> =
        client.database("Trips").collection("StopActivities");
    match collection.insert_one(&stop_activity).await {
        Ok(_) => HttpResponse::Created().json(stop_activity),
        Err(err) => {
            eprintln!("Failed to insert document: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to add activity.")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStopActivityRequest {
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<String>,
    pub actual_cost: Option<f64>,
    pub is_completed: Option<bool>,
    pub notes: Option<String>,
}

/*
    PUT /api/stops/{stop_id}/activities/{id}
*/
pub async fn update_stop_activity(
    claims: web::ReqData<Claims>,
    path: web::Path<(String, String)>,
    data: web::Data<Arc<Client>>,
    input: web::Json<UpdateStopActivityRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let user_id = match parse_user_id(&claims) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let (stop_id, stop_activity_id) = path.into_inner();
    let stop_id = match ObjectId::parse_str(&stop_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };
    let stop_activity_id = match ObjectId::parse_str(&stop_activity_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    match find_owned_stop(&client, stop_id, user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().body("Stop not found"),
        Err(err) => {
            eprintln!("Failed to retrieve stop: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to update activity");
        }
    }

    let input = input.into_inner();
    let mut set = doc! { "updated_at": Utc::now().to_rfc3339() };
    if let Some(scheduled_date) = input.scheduled_date {
        set.insert("scheduled_date", scheduled_date.to_string());
    }
    if let Some(scheduled_time) = input.scheduled_time {
        set.insert("scheduled_time", scheduled_time);
    }
    if let Some(actual_cost) = input.actual_cost {
        if actual_cost < 0.0 {
            return HttpResponse::BadRequest().body("Actual cost must be non-negative");
        }
        set.insert("actual_cost", actual_cost);
    }
    if let Some(is_completed) = input.is_completed {
        set.insert("is_completed", is_completed);
    }
    if let Some(notes) = input.notes {
        set.insert("notes", notes);
    }

    let collection: Collection<StopActivity> =
        client.database("Trips").collection("StopActivities");
    match collection
        .update_one(
            doc! { "_id": stop_activity_id, "trip_stop_id": stop_id, "deleted_at": null },
            doc! { "$set": set },
        )
        .await
    {
        Ok(result) => {
            if result.matched_count == 0 {
                return HttpResponse::NotFound().body("Activity not found");
            }
            match collection.find_one(doc! { "_id": stop_activity_id }).await {
                Ok(Some(updated)) => HttpResponse::Ok().json(updated),
                Ok(None) => HttpResponse::NotFound().body("Activity not found"),
                Err(err) => {
                    eprintln!("Failed to re-fetch activity: {:?}", err);
                    HttpResponse::InternalServerError().body("Failed to update activity")
                }
            }
        }
        Err(err) => {
            eprintln!("Failed to update document: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to update activity")
        }
    }
}

/*
    DELETE /api/stops/{stop_id}/activities/{id} (soft delete)
*/
pub async fn remove_stop_activity(
    claims: web::ReqData<Claims>,
    path: web::Path<(String, String)>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let client = data.into_inner();
    let user_id = match parse_user_id(&claims) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let (stop_id, stop_activity_id) = path.into_inner();
    let stop_id = match ObjectId::parse_str(&stop_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };
    let stop_activity_id = match ObjectId::parse_str(&stop_activity_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    match find_owned_stop(&client, stop_id, user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().body("Stop not found"),
        Err(err) => {
            eprintln!("Failed to retrieve stop: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to remove activity");
        }
    }

    let collection: Collection<StopActivity> =
        client.database("Trips").collection("StopActivities");
    match collection
        .update_one(
            doc! { "_id": stop_activity_id, "trip_stop_id": stop_id },
            doc! { "$set": { "deleted_at": Utc::now().to_rfc3339() } },
        )
        .await
    {
        Ok(result) => {
            if result.matched_count == 0 {
                return HttpResponse::NotFound().body("Activity not found");
            }
            HttpResponse::Ok().body("Activity removed")
        }
        Err(err) => {
            eprintln!("Failed to update document: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to remove activity")
        }
    }
}
