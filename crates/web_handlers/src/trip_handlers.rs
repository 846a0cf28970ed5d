use actix_web::{HttpResponse, Result, web};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use auth_services::middleware::AdminUser;
use travel_services::registration_service::RegistrationService;
use travel_services::trip_service::TripService;
use travel_services::types::*;

/// Query parameters accepted by the trip listing
#[derive(Debug, Deserialize)]
pub struct TripsQuery {
    /// Restricts the listing to trips going to this destination.
    pub destination_id: Option<uuid::Uuid>,
}

/// Lists trips, optionally filtered by destination
pub async fn list_trips(
    pool: web::Data<PgPool>,
    query: web::Query<TripsQuery>,
) -> Result<HttpResponse, TravelError> {
    let service = TripService::new(pool.get_ref().clone());
    let trips = service.list_trips(query.destination_id).await?;

    let response = TripsResponse {
        total: trips.len() as i64,
        trips,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Gets a trip with destination, guides, and seat information
pub async fn get_trip(
    pool: web::Data<PgPool>,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, TravelError> {
    let trip_id = path.into_inner();
    let service = TripService::new(pool.get_ref().clone());
    let trip = service.get_trip(&trip_id).await?;

    Ok(HttpResponse::Ok().json(trip))
}

/// Creates a new trip (admin only)
pub async fn create_trip(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    request: web::Json<CreateTripRequest>,
) -> Result<HttpResponse, TravelError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| TravelError::Validation(format!("Validation error: {}", e)))?;

    let service = TripService::new(pool.get_ref().clone());
    let trip = service.create_trip(&request).await?;

    Ok(HttpResponse::Created().json(trip))
}

/// Updates a trip, optionally replacing its guides (admin only)
pub async fn update_trip(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    path: web::Path<uuid::Uuid>,
    request: web::Json<UpdateTripRequest>,
) -> Result<HttpResponse, TravelError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| TravelError::Validation(format!("Validation error: {}", e)))?;

    let trip_id = path.into_inner();
    let service = TripService::new(pool.get_ref().clone());
    let trip = service.update_trip(&trip_id, &request).await?;

    Ok(HttpResponse::Ok().json(trip))
}

/// Replaces the guide set of a trip (admin only)
pub async fn set_trip_guides(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    path: web::Path<uuid::Uuid>,
    request: web::Json<SetGuidesRequest>,
) -> Result<HttpResponse, TravelError> {
    let trip_id = path.into_inner();
    let service = TripService::new(pool.get_ref().clone());
    let trip = service.set_guides(&trip_id, &request.guide_ids).await?;

    Ok(HttpResponse::Ok().json(trip))
}

/// Deletes a trip (admin only); rejected while registrations exist
pub async fn delete_trip(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, TravelError> {
    let trip_id = path.into_inner();
    let service = TripService::new(pool.get_ref().clone());
    service.delete_trip(&trip_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Trip deleted successfully",
        "deleted": true
    })))
}

/// Lists the registrations on a trip with user information (admin only)
pub async fn list_trip_registrations(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, TravelError> {
    let trip_id = path.into_inner();
    let service = RegistrationService::new(pool.get_ref().clone());
    let registrations = service.get_trip_registrations(&trip_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "total": registrations.len(),
        "registrations": registrations
    })))
}
