use actix_web::{HttpResponse, Result, web};
use sqlx::PgPool;
use validator::Validate;

use auth_services::middleware::AuthenticatedUser;
use travel_services::registration_service::RegistrationService;
use travel_services::types::*;

/// Registers the authenticated user for a trip
pub async fn create_registration(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    request: web::Json<CreateRegistrationRequest>,
) -> Result<HttpResponse, TravelError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| TravelError::Validation(format!("Validation error: {}", e)))?;

    let service = RegistrationService::new(pool.get_ref().clone());
    let registration = service.register(&user.0, &request).await?;

    Ok(HttpResponse::Created().json(registration))
}

/// Gets all registrations for the authenticated user
pub async fn get_my_registrations(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, TravelError> {
    let service = RegistrationService::new(pool.get_ref().clone());
    let registrations = service.get_user_registrations(&user.0).await?;

    let response = RegistrationsResponse {
        total: registrations.len() as i64,
        registrations,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Gets a specific registration belonging to the authenticated user
pub async fn get_registration(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, TravelError> {
    let registration_id = path.into_inner();
    let service = RegistrationService::new(pool.get_ref().clone());
    let registration = service.get_user_registration(&user.0, &registration_id).await?;

    Ok(HttpResponse::Ok().json(registration))
}

/// Cancels a registration belonging to the authenticated user
pub async fn cancel_registration(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, TravelError> {
    let registration_id = path.into_inner();
    let service = RegistrationService::new(pool.get_ref().clone());
    service.cancel_registration(&user.0, &registration_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Registration cancelled",
        "deleted": true
    })))
}
