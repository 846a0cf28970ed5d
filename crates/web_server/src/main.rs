//! Main entry point for the travel booking server.
//! This crate wires the REST API and the server-rendered pages together.

use actix_files::Files;
use actix_web::{App, HttpResponse, HttpServer, Result, middleware::Logger, web};
use auth_services::middleware::AuthMiddleware;
use postgres::database::*;
use web_handlers::*;

async fn api_health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "service": "travel-booking",
        "status": "running"
    })))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting travel booking server...");

    // Create database connection pool
    let pool = match create_connection_pool().await {
        Ok(pool) => {
            log::info!("🗃️ Database pool created successfully");

            if let Err(e) = test_connection(&pool).await {
                log::error!("❌ Database connection test failed: {}", e);
            }
            pool
        }
        Err(e) => {
            log::error!("❌ Failed to create database pool: {}", e);
            log::error!("💡 Make sure PostgreSQL is running and DATABASE_URL is set");
            std::process::exit(1);
        }
    };

    // Apply schema migrations
    if let Err(e) = run_migrations(&pool).await {
        log::error!("❌ Failed to run migrations: {}", e);
        std::process::exit(1);
    }
    log::info!("🧭 Schema migrations applied");

    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    log::info!("🌐 Server will be available at: http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    // Public routes
                    .route("/health", web::get().to(api_health))
                    .service(
                        web::scope("/auth")
                            .route("/health", web::get().to(auth_health))
                            .route("/signup", web::post().to(signup))
                            .route("/login", web::post().to(login))
                            .route("/refresh", web::post().to(refresh)),
                    )
                    .route("/destinations", web::get().to(list_destinations))
                    .route("/destinations/{id}", web::get().to(get_destination))
                    .route("/guides", web::get().to(list_guides))
                    .route("/guides/{id}", web::get().to(get_guide))
                    .route("/trips", web::get().to(list_trips))
                    .route("/trips/{id}", web::get().to(get_trip))
                    // Protected routes (require authentication)
                    .service(
                        web::scope("/user")
                            .wrap(AuthMiddleware)
                            .route("/profile", web::get().to(get_profile))
                            .route("/profile/update", web::put().to(update_profile))
                            .route("/logout", web::post().to(logout))
                            .route("/registrations", web::get().to(get_my_registrations)),
                    )
                    .service(
                        web::scope("/registrations")
                            .wrap(AuthMiddleware)
                            .route("", web::post().to(create_registration))
                            .route("/{id}", web::get().to(get_registration))
                            .route("/{id}", web::delete().to(cancel_registration)),
                    )
                    // Catalog management and admin routes (admin role enforced
                    // per-handler by the AdminUser extractor)
                    .service(
                        web::scope("/admin")
                            .wrap(AuthMiddleware)
                            .route("/destinations", web::post().to(create_destination))
                            .route("/destinations/{id}", web::put().to(update_destination))
                            .route("/destinations/{id}", web::delete().to(delete_destination))
                            .route("/guides", web::post().to(create_guide))
                            .route("/guides/{id}", web::put().to(update_guide))
                            .route("/guides/{id}", web::delete().to(delete_guide))
                            .route("/trips", web::post().to(create_trip))
                            .route("/trips/{id}", web::put().to(update_trip))
                            .route("/trips/{id}", web::delete().to(delete_trip))
                            .route("/trips/{id}/guides", web::put().to(set_trip_guides))
                            .route(
                                "/trips/{id}/registrations",
                                web::get().to(list_trip_registrations),
                            )
                            .route("/users", web::get().to(list_users))
                            .route("/users/{id}", web::delete().to(delete_user)),
                    ),
            )
            .route(
                "/health",
                web::get().to(|| async { HttpResponse::Ok().body("OK") }),
            )
            // Server-rendered pages
            .route("/", web::get().to(home_page))
            .route("/destinations/{id}", web::get().to(destination_page))
            .route("/trips/{id}", web::get().to(trip_page))
            .route("/trips/{id}/register", web::post().to(register_submit))
            .route("/registrations/{id}/cancel", web::post().to(cancel_submit))
            .route("/login", web::get().to(login_page))
            .route("/login", web::post().to(login_submit))
            .route("/signup", web::get().to(signup_page))
            .route("/signup", web::post().to(signup_submit))
            .route("/logout", web::post().to(logout_submit))
            .route("/account", web::get().to(account_page))
            .service(Files::new("/static", "./static"))
    })
    .bind(bind_addr)?
    .run()
    .await
}
