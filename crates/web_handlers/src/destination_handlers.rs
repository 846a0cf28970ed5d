use actix_web::{HttpResponse, Result, web};
use sqlx::PgPool;
use validator::Validate;

use auth_services::middleware::AdminUser;
use travel_services::destination_service::DestinationService;
use travel_services::types::*;

/// Lists every destination in the catalog
pub async fn list_destinations(pool: web::Data<PgPool>) -> Result<HttpResponse, TravelError> {
    let service = DestinationService::new(pool.get_ref().clone());
    let destinations = service.list_destinations().await?;

    let response = DestinationsResponse {
        total: destinations.len() as i64,
        destinations,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Gets a single destination by ID
pub async fn get_destination(
    pool: web::Data<PgPool>,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, TravelError> {
    let destination_id = path.into_inner();
    let service = DestinationService::new(pool.get_ref().clone());
    let destination = service.get_destination(&destination_id).await?;

    Ok(HttpResponse::Ok().json(destination))
}

/// Creates a new destination (admin only)
pub async fn create_destination(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    request: web::Json<DestinationRequest>,
) -> Result<HttpResponse, TravelError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| TravelError::Validation(format!("Validation error: {}", e)))?;

    let service = DestinationService::new(pool.get_ref().clone());
    let destination = service.create_destination(&request).await?;

    Ok(HttpResponse::Created().json(destination))
}

/// Updates an existing destination (admin only)
pub async fn update_destination(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    path: web::Path<uuid::Uuid>,
    request: web::Json<DestinationRequest>,
) -> Result<HttpResponse, TravelError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| TravelError::Validation(format!("Validation error: {}", e)))?;

    let destination_id = path.into_inner();
    let service = DestinationService::new(pool.get_ref().clone());
    let destination = service.update_destination(&destination_id, &request).await?;

    Ok(HttpResponse::Ok().json(destination))
}

/// Deletes a destination (admin only); rejected while trips reference it
pub async fn delete_destination(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, TravelError> {
    let destination_id = path.into_inner();
    let service = DestinationService::new(pool.get_ref().clone());
    service.delete_destination(&destination_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Destination deleted successfully",
        "deleted": true
    })))
}
