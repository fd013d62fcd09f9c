use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use chrono::{NaiveDate, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson},
    options::FindOptions,
    Client, Collection,
};
use serde::{Deserialize, Serialize};

use crate::middleware::auth::Claims;
use crate::models::activity::Activity;
use crate::models::city::City;
use crate::models::trip::{StopActivity, Trip, TripStatus, TripStop};
use crate::services::pricing_service::PricingService;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

pub(crate) async fn find_owned_trip(
    client: &Client,
    trip_id: ObjectId,
    user_id: ObjectId,
) -> Result<Option<Trip>, mongodb::error::Error> {
    let collection: Collection<Trip> = client.database("Trips").collection("Trips");
    collection
        .find_one(doc! { "_id": trip_id, "user_id": user_id, "deleted_at": null })
        .await
}

fn parse_user_id(claims: &Claims) -> Result<ObjectId, HttpResponse> {
    ObjectId::parse_str(&claims.user_id)
        .map_err(|_| HttpResponse::BadRequest().body("Invalid user ID"))
}

#[derive(Deserialize)]
pub struct ListParams {
    page: Option<u32>,
    limit: Option<u32>,
    status: Option<String>,
}

#[derive(Serialize)]
struct TripSummary {
    id: ObjectId,
    name: String,
    description: Option<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: TripStatus,
    is_public: bool,
    total_estimated_cost: f64,
    currency: String,
    cover_photo_url: Option<String>,
    stop_count: usize,
    cities: Vec<String>,
}

/*
    GET /api/trips
*/
pub async fn get_trips(
    claims: web::ReqData<Claims>,
    data: web::Data<Arc<Client>>,
    params: web::Query<ListParams>,
) -> impl Responder {
    let client = data.into_inner();
    let user_id = match parse_user_id(&claims) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let page = params.page.unwrap_or(1).max(1) as i64;
    let limit = crate::routes::clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);

    let mut filter = doc! { "user_id": user_id, "deleted_at": null };
    if let Some(status) = &params.status {
        if !status.is_empty() {
            filter.insert("status", status.to_lowercase());
        }
    }

    let trips_collection: Collection<Trip> = client.database("Trips").collection("Trips");

    let total_items = match trips_collection.count_documents(filter.clone()).await {
        Ok(count) => count,
        Err(err) => {
            eprintln!("Failed to count trips: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch trips");
        }
    };

    let mut options = FindOptions::default();
    options.sort = Some(doc! { "created_at": -1 });
    options.skip = Some(((page - 1) * limit) as u64);
    options.limit = Some(limit);

    let trips: Vec<Trip> = match trips_collection.find(filter).with_options(options).await {
        Ok(cursor) => match cursor.try_collect().await {
            Ok(trips) => trips,
            Err(err) => {
                eprintln!("Failed to collect trips: {:?}", err);
                return HttpResponse::InternalServerError().body("Failed to fetch trips");
            }
        },
        Err(err) => {
            eprintln!("Failed to find trips: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch trips");
        }
    };

    let summaries = build_trip_summaries(&client, trips).await;

    let total_pages = if limit > 0 {
        (total_items as i64 + limit - 1) / limit
    } else {
        0
    };

    HttpResponse::Ok().json(serde_json::json!({
        "data": summaries,
        "pagination": {
            "page": page,
            "limit": limit,
            "total_pages": total_pages,
            "total_items": total_items,
        }
    }))
}

/// Stop counts and destination city names for a page of trips, fetched in
/// two batch queries. Lookup failures degrade to empty summaries rather
/// than failing the listing.
async fn build_trip_summaries(client: &Client, trips: Vec<Trip>) -> Vec<TripSummary> {
    let trip_ids: Vec<ObjectId> = trips.iter().filter_map(|t| t.id).collect();
    let stops_collection: Collection<TripStop> = client.database("Trips").collection("Stops");
    let stops: Vec<TripStop> = match stops_collection
        .find(doc! { "trip_id": { "$in": trip_ids.clone() }, "deleted_at": null })
        .await
    {
        Ok(cursor) => cursor.try_collect().await.unwrap_or_default(),
        Err(err) => {
            eprintln!("Failed to find stops: {:?}", err);
            Vec::new()
        }
    };

    let city_ids: Vec<ObjectId> = stops.iter().map(|s| s.city_id).collect();
    let cities_collection: Collection<City> = client.database("Catalog").collection("Cities");
    let city_names: HashMap<ObjectId, String> = match cities_collection
        .find(doc! { "_id": { "$in": city_ids.clone() } })
        .await
    {
        Ok(cursor) => cursor
            .try_collect::<Vec<City>>()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| c.id.map(|id| (id, c.name)))
            .collect(),
        Err(_) => HashMap::new(),
    };

    trips
        .into_iter()
        .filter_map(|trip| {
            let trip_id = trip.id?;
            let mut trip_stops: Vec<&TripStop> =
                stops.iter().filter(|s| s.trip_id == trip_id).collect();
            trip_stops.sort_by_key(|s| s.stop_order);
            Some(TripSummary {
                id: trip_id,
                name: trip.name,
                description: trip.description,
                start_date: trip.start_date,
                end_date: trip.end_date,
                status: trip.status,
                is_public: trip.is_public,
                total_estimated_cost: trip.total_estimated_cost,
                currency: trip.currency,
                cover_photo_url: trip.cover_photo_url,
                stop_count: trip_stops.len(),
                cities: trip_stops
                    .iter()
                    .filter_map(|s| city_names.get(&s.city_id).cloned())
                    .collect(),
            })
        })
        .collect()
}

/*
    GET /api/trips/public (no auth) - community feed of shared trips
*/
pub async fn get_public_trips(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: Collection<Trip> = client.database("Trips").collection("Trips");

    let mut options = FindOptions::default();
    options.sort = Some(doc! { "created_at": -1 });
    options.limit = Some(50);

    let filter = doc! {
        "is_public": true,
        "deleted_at": null,
        "status": { "$in": ["upcoming", "completed"] },
    };

    let trips: Vec<Trip> = match collection.find(filter).with_options(options).await {
        Ok(cursor) => match cursor.try_collect().await {
            Ok(trips) => trips,
            Err(err) => {
                eprintln!("Failed to collect public trips: {:?}", err);
                return HttpResponse::InternalServerError().body("Failed to fetch public trips");
            }
        },
        Err(err) => {
            eprintln!("Failed to find public trips: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch public trips");
        }
    };

    let summaries = build_trip_summaries(&client, trips).await;
    HttpResponse::Ok().json(serde_json::json!({ "data": summaries }))
}

#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cover_photo_url: Option<String>,
    pub total_estimated_cost: Option<f64>,
    pub currency: Option<String>,
    pub travel_style: Option<String>,
}

/*
    POST /api/trips
*/
pub async fn create_trip(
    claims: web::ReqData<Claims>,
    data: web::Data<Arc<Client>>,
    input: web::Json<CreateTripRequest>,
) -> impl Responder {
    let client = data.into_inner();
    let user_id = match parse_user_id(&claims) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let input = input.into_inner();
    if input.name.trim().is_empty() {
        return HttpResponse::BadRequest().body("Trip name is required");
    }
    if input.end_date < input.start_date {
        return HttpResponse::BadRequest().body("End date must be after start date");
    }

    let curr_time = Utc::now();
    let trip = Trip {
        id: Some(ObjectId::new()),
        user_id,
        name: input.name,
        description: input.description,
        start_date: input.start_date,
        end_date: input.end_date,
        status: TripStatus::Draft,
        is_public: false,
        total_estimated_cost: input.total_estimated_cost.unwrap_or(0.0).max(0.0),
        currency: input.currency.unwrap_or_else(|| "INR".to_string()),
        travel_style: input.travel_style,
        cover_photo_url: input.cover_photo_url,
        created_at: Some(curr_time),
        updated_at: Some(curr_time),
        deleted_at: None,
    };

    let collection: Collection<Trip> = client.database("Trips").collection("Trips");
    match collection.insert_one(&trip).await {
        Ok(_) => HttpResponse::Created().json(trip),
        Err(err) => {
            eprintln!("Failed to insert document: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create trip.")
        }
    }
}

#[derive(Serialize)]
struct StopActivityView {
    id: Option<ObjectId>,
    activity_id: ObjectId,
    name: String,
    category: Option<String>,
    estimated_cost: f64,
    actual_cost: Option<f64>,
    scheduled_date: NaiveDate,
    scheduled_time: Option<String>,
    is_completed: bool,
}

#[derive(Serialize)]
struct StopView {
    id: Option<ObjectId>,
    stop_order: i32,
    city: Option<City>,
    arrival_date: NaiveDate,
    departure_date: NaiveDate,
    accommodation_name: Option<String>,
    accommodation_cost: Option<f64>,
    notes: Option<String>,
    activities: Vec<StopActivityView>,
}

/*
    GET /api/trips/{id}
*/
pub async fn get_by_id(
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

    let trip = match find_owned_trip(&client, trip_id, user_id).await {
        Ok(Some(trip)) => trip,
        Ok(None) => return HttpResponse::NotFound().body("Trip not found"),
        Err(err) => {
            eprintln!("Failed to retrieve trip: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to retrieve trip");
        }
    };

    match build_trip_detail(&client, &trip).await {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(err) => {
            eprintln!("Failed to assemble trip detail: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve trip")
        }
    }
}

pub(crate) async fn build_trip_detail(
    client: &Client,
    trip: &Trip,
) -> Result<serde_json::Value, mongodb::error::Error> {
    let stops_collection: Collection<TripStop> = client.database("Trips").collection("Stops");
    let mut options = FindOptions::default();
    options.sort = Some(doc! { "stop_order": 1 });

    let stops: Vec<TripStop> = stops_collection
        .find(doc! { "trip_id": trip.id, "deleted_at": null })
        .with_options(options)
        .await?
        .try_collect()
        .await?;

    let stop_ids: Vec<ObjectId> = stops.iter().filter_map(|s| s.id).collect();
    let activities_collection: Collection<StopActivity> =
        client.database("Trips").collection("StopActivities");
    let stop_activities: Vec<StopActivity> = activities_collection
        .find(doc! { "trip_stop_id": { "$in": stop_ids.clone() }, "deleted_at": null })
        .await?
        .try_collect()
        .await?;

    let activity_ids: Vec<ObjectId> = stop_activities.iter().map(|sa| sa.activity_id).collect();
    let catalog_collection: Collection<Activity> =
        client.database("Catalog").collection("Activities");
    let catalog: HashMap<ObjectId, Activity> = catalog_collection
        .find(doc! { "_id": { "$in": activity_ids.clone() } })
        .await?
        .try_collect::<Vec<Activity>>()
        .await?
        .into_iter()
        .filter_map(|a| a.id.map(|id| (id, a)))
        .collect();

    let city_ids: Vec<ObjectId> = stops.iter().map(|s| s.city_id).collect();
    let cities_collection: Collection<City> = client.database("Catalog").collection("Cities");
    let cities: HashMap<ObjectId, City> = cities_collection
        .find(doc! { "_id": { "$in": city_ids.clone() } })
        .await?
        .try_collect::<Vec<City>>()
        .await?
        .into_iter()
        .filter_map(|c| c.id.map(|id| (id, c)))
        .collect();

    let accommodation_total = PricingService::accommodation_total(&stops);
    let activity_total = PricingService::activity_total(&stop_activities, &catalog);
    let per_day_average =
        PricingService::per_day_average(trip.total_estimated_cost, trip.start_date, trip.end_date);

    let stop_views: Vec<StopView> = stops
        .iter()
        .map(|stop| StopView {
            id: stop.id,
            stop_order: stop.stop_order,
            city: cities.get(&stop.city_id).cloned(),
            arrival_date: stop.arrival_date,
            departure_date: stop.departure_date,
            accommodation_name: stop.accommodation_name.clone(),
            accommodation_cost: stop.accommodation_cost,
            notes: stop.notes.clone(),
            activities: stop_activities
                .iter()
                .filter(|sa| Some(sa.trip_stop_id) == stop.id)
                .map(|sa| {
                    let catalog_entry = catalog.get(&sa.activity_id);
                    StopActivityView {
                        id: sa.id,
                        activity_id: sa.activity_id,
                        name: catalog_entry
                            .map(|a| a.name.clone())
                            .unwrap_or_default(),
                        category: catalog_entry
                            .and_then(|a| serde_json::to_value(&a.category).ok())
                            .and_then(|v| v.as_str().map(|s| s.to_string())),
                        estimated_cost: catalog_entry.map(|a| a.estimated_cost).unwrap_or(0.0),
                        actual_cost: sa.actual_cost,
                        scheduled_date: sa.scheduled_date,
                        scheduled_time: sa.scheduled_time.clone(),
                        is_completed: sa.is_completed,
                    }
                })
                .collect(),
        })
        .collect();

    Ok(serde_json::json!({
        "id": trip.id,
        "name": trip.name,
        "description": trip.description,
        "start_date": trip.start_date,
        "end_date": trip.end_date,
        "status": trip.status,
        "is_public": trip.is_public,
        "total_estimated_cost": trip.total_estimated_cost,
        "currency": trip.currency,
        "travel_style": trip.travel_style,
        "cover_photo_url": trip.cover_photo_url,
        "stops": stop_views,
        "budget_summary": {
            "accommodation": accommodation_total,
            "activities": activity_total,
            "per_day_average": per_day_average,
            "total": trip.total_estimated_cost,
        }
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTripRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub cover_photo_url: Option<String>,
    pub status: Option<TripStatus>,
    pub is_public: Option<bool>,
    pub total_estimated_cost: Option<f64>,
}

/*
    PUT /api/trips/{id}
*/
pub async fn update_trip(
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
    input: web::Json<UpdateTripRequest>,
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

    let existing = match find_owned_trip(&client, trip_id, user_id).await {
        Ok(Some(trip)) => trip,
        Ok(None) => return HttpResponse::NotFound().body("Trip not found"),
        Err(err) => {
            eprintln!("Failed to retrieve trip: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to update trip");
        }
    };

    let input = input.into_inner();
    let start = input.start_date.unwrap_or(existing.start_date);
    let end = input.end_date.unwrap_or(existing.end_date);
    if end < start {
        return HttpResponse::BadRequest().body("End date must be after start date");
    }

    let mut set = doc! { "updated_at": Utc::now().to_rfc3339() };
    if let Some(name) = input.name {
        if name.trim().is_empty() {
            return HttpResponse::BadRequest().body("Trip name is required");
        }
        set.insert("name", name);
    }
    if let Some(description) = input.description {
        set.insert("description", description);
    }
    if let Some(start_date) = input.start_date {
        set.insert("start_date", start_date.to_string());
    }
    if let Some(end_date) = input.end_date {
        set.insert("end_date", end_date.to_string());
    }
    if let Some(cover_photo_url) = input.cover_photo_url {
        set.insert("cover_photo_url", cover_photo_url);
    }
    if let Some(status) = input.status {
        match to_bson(&status) {
            Ok(value) => {
                set.insert("status", value);
            }
            Err(_) => return HttpResponse::BadRequest().body("Invalid status"),
        }
    }
    if let Some(is_public) = input.is_public {
        set.insert("is_public", is_public);
    }
    if let Some(total) = input.total_estimated_cost {
        if total < 0.0 {
            return HttpResponse::BadRequest().body("Total cost must be non-negative");
        }
        set.insert("total_estimated_cost", total);
    }

    let collection: Collection<Trip> = client.database("Trips").collection("Trips");
    match collection
        .update_one(doc! { "_id": trip_id }, doc! { "$set": set })
        .await
    {
        Ok(_) => match collection.find_one(doc! { "_id": trip_id }).await {
            Ok(Some(trip)) => HttpResponse::Ok().json(trip),
            Ok(None) => HttpResponse::NotFound().body("Trip not found"),
            Err(err) => {
                eprintln!("Failed to re-fetch trip: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to update trip")
            }
        },
        Err(err) => {
            eprintln!("Failed to update document: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to update trip")
        }
    }
}

/*
    DELETE /api/trips/{id} (soft delete)
*/
pub async fn delete_trip(
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
            return HttpResponse::InternalServerError().body("Failed to delete trip");
        }
    }

    let collection: Collection<Trip> = client.database("Trips").collection("Trips");
    match collection
        .update_one(
            doc! { "_id": trip_id },
            doc! { "$set": { "deleted_at": Utc::now().to_rfc3339() } },
        )
        .await
    {
        Ok(_) => HttpResponse::Ok().body("Trip deleted successfully"),
        Err(err) => {
            eprintln!("Failed to update document: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to delete trip")
        }
    }
}
