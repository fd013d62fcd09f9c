use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use mongodb::{bson::oid::ObjectId, Client};

use crate::middleware::auth::Claims;
use crate::models::wizard::WizardSession;
use crate::services::wizard_service::WizardService;

/*
    POST /api/trips/wizard/preview
*/
pub async fn preview(
    _claims: web::ReqData<Claims>,
    data: web::Data<Arc<Client>>,
    input: web::Json<WizardSession>,
) -> impl Responder {
    let service = WizardService::new(data.get_ref().clone());

    match service.preview(input.into_inner()).await {
        Ok(preview) => HttpResponse::Ok().json(preview),
        Err(err) => {
            eprintln!("Failed to build wizard preview: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to build preview")
        }
    }
}

/*
    POST /api/trips/wizard
*/
pub async fn complete(
    claims: web::ReqData<Claims>,
    data: web::Data<Arc<Client>>,
    input: web::Json<WizardSession>,
) -> impl Responder {
    let user_id = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    let service = WizardService::new(data.get_ref().clone());
    match service.complete(user_id, input.into_inner()).await {
        Ok(outcome) => HttpResponse::Created().json(outcome),
        Err(err) => {
            // Database failures are opaque; anything else is a validation message
            if err.downcast_ref::<mongodb::error::Error>().is_some() {
                eprintln!("Failed to complete wizard: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to create trip")
            } else {
                HttpResponse::BadRequest().body(err.to_string())
            }
        }
    }
}
