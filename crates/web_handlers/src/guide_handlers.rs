use actix_web::{HttpResponse, Result, web};
use sqlx::PgPool;
use validator::Validate;

use auth_services::middleware::AdminUser;
use travel_services::guide_service::GuideService;
use travel_services::types::*;

/// Lists every guide on the roster
pub async fn list_guides(pool: web::Data<PgPool>) -> Result<HttpResponse, TravelError> {
    let service = GuideService::new(pool.get_ref().clone());
    let guides = service.list_guides().await?;

    let response = GuidesResponse {
        total: guides.len() as i64,
        guides,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Gets a single guide by ID
pub async fn get_guide(
    pool: web::Data<PgPool>,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, TravelError> {
    let guide_id = path.into_inner();
    let service = GuideService::new(pool.get_ref().clone());
    let guide = service.get_guide(&guide_id).await?;

    Ok(HttpResponse::Ok().json(guide))
}

/// Creates a new guide (admin only)
pub async fn create_guide(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    request: web::Json<GuideRequest>,
) -> Result<HttpResponse, TravelError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| TravelError::Validation(format!("Validation error: {}", e)))?;

    let service = GuideService::new(pool.get_ref().clone());
    let guide = service.create_guide(&request).await?;

    Ok(HttpResponse::Created().json(guide))
}

/// Updates an existing guide (admin only)
pub async fn update_guide(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    path: web::Path<uuid::Uuid>,
    request: web::Json<GuideRequest>,
) -> Result<HttpResponse, TravelError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| TravelError::Validation(format!("Validation error: {}", e)))?;

    let guide_id = path.into_inner();
    let service = GuideService::new(pool.get_ref().clone());
    let guide = service.update_guide(&guide_id, &request).await?;

    Ok(HttpResponse::Ok().json(guide))
}

/// Deletes a guide (admin only); trip assignments cascade away
pub async fn delete_guide(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, TravelError> {
    let guide_id = path.into_inner();
    let service = GuideService::new(pool.get_ref().clone());
    service.delete_guide(&guide_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Guide deleted successfully",
        "deleted": true
    })))
}
