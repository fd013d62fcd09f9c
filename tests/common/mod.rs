use actix_web::{web, App, HttpResponse, Responder};

pub struct TestApp;

impl TestApp {
    pub async fn new() -> Self {
        Self
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .route("/", web::get().to(|| async { "GlobeTrotter API is running" }))
            .route("/health", web::get().to(health_check))
            .route("/cities", web::get().to(empty_list))
            .route("/cities/popular", web::get().to(empty_list))
            .route("/cities/{id}", web::get().to(city_not_found))
            .route("/trips/public", web::get().to(public_trips))
            .route("/activities", web::get().to(empty_list))
            .route("/hotels", web::get().to(empty_list))
            .route("/restaurants", web::get().to(empty_list))
            .route("/transport", web::get().to(empty_list))
            .route("/shared/{token}", web::get().to(share_not_found))
            .service(
                web::scope("/auth")
                    .route("/signin", web::post().to(signin))
                    .route("/signup", web::post().to(signup))
                    .route("/session", web::get().to(unauthorized_handler)),
            )
            .service(
                web::scope("/trips")
                    .route("", web::get().to(unauthorized_handler))
                    .route("", web::post().to(unauthorized_handler))
                    .route("/wizard", web::post().to(unauthorized_handler))
                    .route("/wizard/preview", web::post().to(unauthorized_handler))
                    .route("/{id}", web::get().to(unauthorized_handler))
                    .route("/{id}", web::put().to(unauthorized_handler))
                    .route("/{id}", web::delete().to(unauthorized_handler))
                    .route("/{id}/stops", web::get().to(unauthorized_handler))
                    .route("/{id}/stops", web::post().to(unauthorized_handler))
                    .route("/{id}/share", web::post().to(unauthorized_handler)),
            )
            .service(
                web::scope("/stops")
                    .route("/{stop_id}/activities", web::post().to(unauthorized_handler))
                    .route(
                        "/{stop_id}/activities/{id}",
                        web::put().to(unauthorized_handler),
                    )
                    .route(
                        "/{stop_id}/activities/{id}",
                        web::delete().to(unauthorized_handler),
                    ),
            )
            .service(
                web::scope("/admin")
                    .route("/cities", web::post().to(unauthorized_handler))
                    .route("/activities", web::post().to(unauthorized_handler))
                    .route("/hotels", web::post().to(unauthorized_handler))
                    .route("/restaurants", web::post().to(unauthorized_handler))
                    .route("/transport", web::post().to(unauthorized_handler)),
            )
    }
}

// Mock handler functions for testing
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "OK"}))
}

async fn empty_list() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!([]))
}

async fn city_not_found() -> impl Responder {
    HttpResponse::NotFound().json(serde_json::json!({"error": "City not found"}))
}

async fn public_trips() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"data": []}))
}

async fn share_not_found() -> impl Responder {
    HttpResponse::NotFound().json(serde_json::json!({"error": "Shared trip not found"}))
}

async fn signin() -> impl Responder {
    HttpResponse::Unauthorized().json(serde_json::json!({"error": "Invalid credentials"}))
}

async fn signup() -> impl Responder {
    HttpResponse::BadRequest().json(serde_json::json!({"error": "Invalid input"}))
}

async fn unauthorized_handler() -> impl Responder {
    HttpResponse::Unauthorized().json(serde_json::json!({"error": "Unauthorized"}))
}

pub fn get_test_email() -> String {
    "test@example.com".to_string()
}
