use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use globetrotter_api::middleware::auth::AuthMiddleware;
use globetrotter_api::middleware::role_auth::RequireRole;
use globetrotter_api::models::user::UserRole;
use globetrotter_api::{db, routes};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    println!("Logger initialized");

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    println!("Got MongoDB URI, attempting connection...");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;
    println!("MongoDB connection established");

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .route("/health", web::get().to(|| async { "OK" }))
            .app_data(web::Data::new(client.clone()))
            .service(
                web::scope("/api")
                    // Public routes
                    .service(
                        web::scope("/auth")
                            .route("/signup", web::post().to(routes::auth::signup))
                            .route("/signin", web::post().to(routes::auth::signin))
                            .service(
                                web::scope("")
                                    .wrap(AuthMiddleware)
                                    .route("/session", web::get().to(routes::auth::user_session)),
                            ),
                    )
                    .service(
                        web::scope("/cities")
                            .route("", web::get().to(routes::city::get_cities))
                            .route("/popular", web::get().to(routes::city::get_popular))
                            .route("/{id}", web::get().to(routes::city::get_by_id)),
                    )
                    .route(
                        "/trips/public",
                        web::get().to(routes::trip::get_public_trips),
                    )
                    .route(
                        "/activities",
                        web::get().to(routes::activity::get_activities),
                    )
                    .route("/hotels", web::get().to(routes::hotel::get_hotels))
                    .route(
                        "/restaurants",
                        web::get().to(routes::restaurant::get_restaurants),
                    )
                    .route(
                        "/transport",
                        web::get().to(routes::transport::get_transport),
                    )
                    .route(
                        "/shared/{token}",
                        web::get().to(routes::share::get_shared_trip),
                    )
                    // Protected routes
                    .service(
                        web::scope("/trips")
                            .wrap(AuthMiddleware)
                            .route("", web::get().to(routes::trip::get_trips))
                            .route("", web::post().to(routes::trip::create_trip))
                            .route("/wizard", web::post().to(routes::wizard::complete))
                            .route(
                                "/wizard/preview",
                                web::post().to(routes::wizard::preview),
                            )
                            .route("/{id}", web::get().to(routes::trip::get_by_id))
                            .route("/{id}", web::put().to(routes::trip::update_trip))
                            .route("/{id}", web::delete().to(routes::trip::delete_trip))
                            .route("/{id}/stops", web::get().to(routes::stop::get_stops))
                            .route("/{id}/stops", web::post().to(routes::stop::add_stop))
                            .route("/{id}/share", web::post().to(routes::share::create_share)),
                    )
                    .service(
                        web::scope("/stops")
                            .wrap(AuthMiddleware)
                            .route(
                                "/{stop_id}/activities",
                                web::post().to(routes::stop::add_stop_activity),
                            )
                            .route(
                                "/{stop_id}/activities/{id}",
                                web::put().to(routes::stop::update_stop_activity),
                            )
                            .route(
                                "/{stop_id}/activities/{id}",
                                web::delete().to(routes::stop::remove_stop_activity),
                            ),
                    )
                    // Admin catalog management
                    .service(
                        web::scope("/admin")
                            .wrap(RequireRole::new(UserRole::Admin))
                            .wrap(AuthMiddleware)
                            .route("/cities", web::post().to(routes::city::add))
                            .route("/activities", web::post().to(routes::activity::add))
                            .route("/hotels", web::post().to(routes::hotel::add))
                            .route("/restaurants", web::post().to(routes::restaurant::add))
                            .route("/transport", web::post().to(routes::transport::add)),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
