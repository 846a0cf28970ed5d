//! Handlers for the server-rendered front-end.
//!
//! Pages share the service layer with the JSON API and authenticate with an
//! HTTP-only session cookie holding the access token. Failures are logged
//! and surfaced as a redirect with an `error` query parameter rather than an
//! error status page.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpRequest, HttpResponse, Result, web};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use auth_services::jwt::JwtService;
use auth_services::middleware::SESSION_COOKIE;
use auth_services::service::AuthService;
use auth_services::types::{Claims, LoginRequest, SignUpRequest};
use travel_services::destination_service::DestinationService;
use travel_services::registration_service::RegistrationService;
use travel_services::trip_service::TripService;
use travel_services::types::{CreateRegistrationRequest, TravelError};

use crate::page_templates;

/// Query parameters shared by the page handlers
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Error message to surface in the banner.
    pub error: Option<String>,
}

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Email address.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Signup form fields
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Registration form fields
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    /// Number of participants to register.
    pub participants: i32,
}

/// Reads and verifies the session cookie, if any.
fn current_user(req: &HttpRequest) -> Option<Claims> {
    let cookie = req.cookie(SESSION_COOKIE)?;
    JwtService::new().verify_token(cookie.value()).ok()
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(1))
        .finish()
}

fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(0))
        .finish()
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

fn redirect_with_error(base: &str, message: &str) -> HttpResponse {
    see_other(&format!("{}?error={}", base, urlencoding::encode(message)))
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// The destination catalog (home page)
pub async fn home_page(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let user = current_user(&req);
    let user_name = user.as_ref().map(|c| c.email.as_str());

    let service = DestinationService::new(pool.get_ref().clone());
    match service.list_destinations().await {
        Ok(destinations) => Ok(html(page_templates::destinations_page(
            &destinations,
            user_name,
            query.error.as_deref(),
        ))),
        Err(e) => {
            log::error!("Failed to load destinations: {}", e);
            Ok(html(page_templates::destinations_page(
                &[],
                user_name,
                Some("Something went wrong loading the catalog"),
            )))
        }
    }
}

/// A destination with its scheduled trips
pub async fn destination_page(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse> {
    let destination_id = path.into_inner();
    let user = current_user(&req);
    let user_name = user.as_ref().map(|c| c.email.as_str());

    let destinations = DestinationService::new(pool.get_ref().clone());
    let trips = TripService::new(pool.get_ref().clone());

    let destination = match destinations.get_destination(&destination_id).await {
        Ok(destination) => destination,
        Err(TravelError::DestinationNotFound) => {
            return Ok(redirect_with_error("/", "Destination not found"));
        }
        Err(e) => {
            log::error!("Failed to load destination {}: {}", destination_id, e);
            return Ok(redirect_with_error("/", "Something went wrong"));
        }
    };

    match trips.list_trips(Some(destination_id)).await {
        Ok(trips) => Ok(html(page_templates::destination_page(
            &destination,
            &trips,
            user_name,
        ))),
        Err(e) => {
            log::error!("Failed to load trips for {}: {}", destination_id, e);
            Ok(redirect_with_error("/", "Something went wrong"))
        }
    }
}

/// A trip detail page with the registration form
pub async fn trip_page(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<uuid::Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let trip_id = path.into_inner();
    let user = current_user(&req);
    let user_name = user.as_ref().map(|c| c.email.as_str());

    let service = TripService::new(pool.get_ref().clone());
    match service.get_trip(&trip_id).await {
        Ok(details) => Ok(html(page_templates::trip_page(
            &details,
            user_name,
            query.error.as_deref(),
        ))),
        Err(TravelError::TripNotFound) => Ok(redirect_with_error("/", "Trip not found")),
        Err(e) => {
            log::error!("Failed to load trip {}: {}", trip_id, e);
            Ok(redirect_with_error("/", "Something went wrong"))
        }
    }
}

/// The login form
pub async fn login_page(req: HttpRequest, query: web::Query<PageQuery>) -> Result<HttpResponse> {
    if current_user(&req).is_some() {
        return Ok(see_other("/"));
    }
    Ok(html(page_templates::login_page(query.error.as_deref())))
}

/// Handles the login form: verifies credentials, sets the session cookie
pub async fn login_submit(
    pool: web::Data<PgPool>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse> {
    let request = LoginRequest {
        email: form.email.clone(),
        password: form.password.clone(),
    };

    if request.validate().is_err() {
        return Ok(redirect_with_error("/login", "Please fill in both fields"));
    }

    let auth_service = AuthService::new(pool.get_ref().clone());
    let user = match auth_service
        .verify_password(&request.email, &request.password)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            log::warn!("Login failed for {}: {}", request.email, e);
            return Ok(redirect_with_error("/login", "Invalid email or password"));
        }
    };

    let token = match JwtService::new().generate_access_token(&user) {
        Ok(token) => token,
        Err(e) => {
            log::error!("Failed to issue session token: {}", e);
            return Ok(redirect_with_error("/login", "Something went wrong"));
        }
    };

    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/"))
        .cookie(session_cookie(token))
        .finish())
}

/// The signup form
pub async fn signup_page(req: HttpRequest, query: web::Query<PageQuery>) -> Result<HttpResponse> {
    if current_user(&req).is_some() {
        return Ok(see_other("/"));
    }
    Ok(html(page_templates::signup_page(query.error.as_deref())))
}

/// Handles the signup form: creates the account, sets the session cookie
pub async fn signup_submit(
    pool: web::Data<PgPool>,
    form: web::Form<SignupForm>,
) -> Result<HttpResponse> {
    let request = SignUpRequest {
        name: form.name.clone(),
        email: form.email.clone(),
        password: form.password.clone(),
    };

    if let Err(e) = request.validate() {
        log::debug!("Signup validation failed: {}", e);
        return Ok(redirect_with_error(
            "/signup",
            "Please check the form: name, a valid email, and a password of at least 8 characters are required",
        ));
    }

    let auth_service = AuthService::new(pool.get_ref().clone());
    let user = match auth_service.create_user(&request).await {
        Ok(user) => user,
        Err(auth_services::types::AuthError::EmailExists) => {
            return Ok(redirect_with_error(
                "/signup",
                "An account with this email already exists",
            ));
        }
        Err(e) => {
            log::error!("Signup failed: {}", e);
            return Ok(redirect_with_error("/signup", "Something went wrong"));
        }
    };

    let token = match JwtService::new().generate_access_token(&user) {
        Ok(token) => token,
        Err(e) => {
            log::error!("Failed to issue session token: {}", e);
            return Ok(redirect_with_error("/login", "Please log in"));
        }
    };

    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/"))
        .cookie(session_cookie(token))
        .finish())
}

/// Clears the session cookie and returns to the catalog
pub async fn logout_submit() -> Result<HttpResponse> {
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/"))
        .cookie(clear_session_cookie())
        .finish())
}

/// The signed-in user's registrations
pub async fn account_page(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let claims = match current_user(&req) {
        Some(claims) => claims,
        None => return Ok(see_other("/login")),
    };

    let user_id = match uuid::Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => return Ok(see_other("/login")),
    };

    let service = RegistrationService::new(pool.get_ref().clone());
    match service.get_user_registrations(&user_id).await {
        Ok(registrations) => Ok(html(page_templates::account_page(
            &claims.email,
            &registrations,
            query.error.as_deref(),
        ))),
        Err(e) => {
            log::error!("Failed to load registrations for {}: {}", user_id, e);
            Ok(redirect_with_error("/", "Something went wrong"))
        }
    }
}

/// Handles the registration form on a trip page
pub async fn register_submit(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<uuid::Uuid>,
    form: web::Form<RegisterForm>,
) -> Result<HttpResponse> {
    let trip_id = path.into_inner();
    let trip_url = format!("/trips/{}", trip_id);

    let claims = match current_user(&req) {
        Some(claims) => claims,
        None => return Ok(see_other("/login")),
    };

    let user_id = match uuid::Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => return Ok(see_other("/login")),
    };

    let request = CreateRegistrationRequest {
        trip_id,
        participants: form.participants,
    };

    if request.validate().is_err() {
        return Ok(redirect_with_error(
            &trip_url,
            "Participants must be between 1 and 50",
        ));
    }

    let service = RegistrationService::new(pool.get_ref().clone());
    match service.register(&user_id, &request).await {
        Ok(_) => Ok(see_other("/account")),
        Err(e) => {
            log::warn!("Registration for trip {} failed: {}", trip_id, e);
            Ok(redirect_with_error(&trip_url, &e.to_string()))
        }
    }
}

/// Handles the cancel button on the account page
pub async fn cancel_submit(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse> {
    let registration_id = path.into_inner();

    let claims = match current_user(&req) {
        Some(claims) => claims,
        None => return Ok(see_other("/login")),
    };

    let user_id = match uuid::Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => return Ok(see_other("/login")),
    };

    let service = RegistrationService::new(pool.get_ref().clone());
    match service.cancel_registration(&user_id, &registration_id).await {
        Ok(()) => Ok(see_other("/account")),
        Err(e) => {
            log::warn!("Cancel of registration {} failed: {}", registration_id, e);
            Ok(redirect_with_error("/account", &e.to_string()))
        }
    }
}
