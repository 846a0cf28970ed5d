use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A place trips depart to.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Destination {
    /// Unique identifier for the destination.
    pub id: Uuid,
    /// Display name, e.g. "Amalfi Coast".
    pub name: String,
    /// Country the destination is in.
    pub country: String,
    /// City the destination is in or near.
    pub city: String,
    /// Free-form description shown on the detail page.
    pub description: Option<String>,
    /// URL of a hero image.
    pub image_url: Option<String>,
    /// When the destination was created.
    pub created_at: DateTime<Utc>,
    /// When the destination was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A tour guide who can be assigned to trips.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Guide {
    /// Unique identifier for the guide.
    pub id: Uuid,
    /// Full name of the guide.
    pub name: String,
    /// Contact email, unique per guide.
    pub email: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Short biography.
    pub bio: Option<String>,
    /// When the guide was created.
    pub created_at: DateTime<Utc>,
    /// When the guide was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A scheduled trip to a destination, as listed in the catalog.
#[derive(Debug, Serialize)]
pub struct TripSummary {
    /// Unique identifier for the trip.
    pub id: Uuid,
    /// Destination this trip goes to.
    pub destination_id: Uuid,
    /// Name of the destination, joined for display.
    pub destination_name: String,
    /// Display name of the trip.
    pub name: String,
    /// Departure date.
    pub start_date: NaiveDate,
    /// Return date.
    pub end_date: NaiveDate,
    /// Price per participant, in cents.
    pub price_cents: i64,
    /// Maximum number of participants.
    pub capacity: i32,
    /// Participants registered so far.
    pub seats_taken: i64,
    /// Seats still available.
    pub seats_left: i64,
}

/// A trip with its assigned guides, as shown on the detail page.
#[derive(Debug, Serialize)]
pub struct TripDetails {
    /// The trip itself.
    #[serde(flatten)]
    pub trip: TripSummary,
    /// Guides assigned to the trip.
    pub guides: Vec<Guide>,
}

/// A user's registration for a trip.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TripRegistration {
    /// Unique identifier for the registration.
    pub id: Uuid,
    /// The trip registered for.
    pub trip_id: Uuid,
    /// The registering user.
    pub user_id: Uuid,
    /// Number of participants covered by this registration.
    pub participants: i32,
    /// Total price in cents, fixed at registration time.
    pub total_cents: i64,
    /// Code quoted in correspondence about the booking.
    pub confirmation_code: String,
    /// When the registration was made.
    pub registered_at: DateTime<Utc>,
}

/// A registration joined with its trip and destination for display.
#[derive(Debug, Serialize)]
pub struct RegistrationWithTrip {
    /// Unique identifier for the registration.
    pub id: Uuid,
    /// The trip registered for.
    pub trip_id: Uuid,
    /// Name of the trip.
    pub trip_name: String,
    /// Name of the destination.
    pub destination_name: String,
    /// Departure date.
    pub start_date: NaiveDate,
    /// Return date.
    pub end_date: NaiveDate,
    /// Number of participants.
    pub participants: i32,
    /// Total price in cents.
    pub total_cents: i64,
    /// Confirmation code.
    pub confirmation_code: String,
    /// When the registration was made.
    pub registered_at: DateTime<Utc>,
}

/// A registration joined with the registering user, for admin listings.
#[derive(Debug, Serialize)]
pub struct RegistrationWithUser {
    /// Unique identifier for the registration.
    pub id: Uuid,
    /// The registering user.
    pub user_id: Uuid,
    /// Name of the user.
    pub user_name: String,
    /// Email of the user.
    pub user_email: String,
    /// Number of participants.
    pub participants: i32,
    /// Total price in cents.
    pub total_cents: i64,
    /// Confirmation code.
    pub confirmation_code: String,
    /// When the registration was made.
    pub registered_at: DateTime<Utc>,
}

/// Request structure for creating or updating a destination
#[derive(Debug, Deserialize, Validate)]
pub struct DestinationRequest {
    /// Display name of the destination.
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    /// Country the destination is in.
    #[validate(length(min = 1, max = 255, message = "Country is required"))]
    pub country: String,

    /// City the destination is in or near.
    #[validate(length(min = 1, max = 255, message = "City is required"))]
    pub city: String,

    /// Free-form description.
    pub description: Option<String>,

    /// URL of a hero image.
    #[validate(url(message = "Image must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Request structure for creating or updating a guide
#[derive(Debug, Deserialize, Validate)]
pub struct GuideRequest {
    /// Full name of the guide.
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    /// Contact email.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    /// Contact phone number.
    pub phone: Option<String>,

    /// Short biography.
    pub bio: Option<String>,
}

/// Request structure for creating a trip
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTripRequest {
    /// Destination the trip goes to.
    pub destination_id: Uuid,

    /// Display name of the trip.
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    /// Departure date.
    pub start_date: NaiveDate,

    /// Return date.
    pub end_date: NaiveDate,

    /// Price per participant, in cents.
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price_cents: i64,

    /// Maximum number of participants.
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: i32,

    /// Guides assigned to the trip.
    #[serde(default)]
    pub guide_ids: Vec<Uuid>,
}

/// Request structure for updating a trip
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTripRequest {
    /// New display name.
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    /// New departure date.
    pub start_date: NaiveDate,

    /// New return date.
    pub end_date: NaiveDate,

    /// New price per participant, in cents.
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price_cents: i64,

    /// New maximum number of participants.
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: i32,

    /// When present, replaces the trip's guide assignments.
    pub guide_ids: Option<Vec<Uuid>>,
}

/// Request structure for replacing a trip's guide set
#[derive(Debug, Deserialize)]
pub struct SetGuidesRequest {
    /// The full set of guides to assign.
    pub guide_ids: Vec<Uuid>,
}

/// Request structure for registering for a trip
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRegistrationRequest {
    /// The trip to register for.
    pub trip_id: Uuid,

    /// Number of participants to register.
    #[validate(range(min = 1, max = 50, message = "Participants must be between 1 and 50"))]
    pub participants: i32,
}

/// Response structure for listing destinations
#[derive(Debug, Serialize)]
pub struct DestinationsResponse {
    /// The destinations, ordered by name.
    pub destinations: Vec<Destination>,
    /// Total count.
    pub total: i64,
}

/// Response structure for listing guides
#[derive(Debug, Serialize)]
pub struct GuidesResponse {
    /// The guides, ordered by name.
    pub guides: Vec<Guide>,
    /// Total count.
    pub total: i64,
}

/// Response structure for listing trips
#[derive(Debug, Serialize)]
pub struct TripsResponse {
    /// The trips, ordered by departure date.
    pub trips: Vec<TripSummary>,
    /// Total count.
    pub total: i64,
}

/// Response structure for listing a user's registrations
#[derive(Debug, Serialize)]
pub struct RegistrationsResponse {
    /// The registrations, newest first.
    pub registrations: Vec<RegistrationWithTrip>,
    /// Total count.
    pub total: i64,
}

/// Custom error type for travel domain operations
#[derive(thiserror::Error, Debug)]
pub enum TravelError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Destination not found
    #[error("Destination not found")]
    DestinationNotFound,

    /// Trip not found
    #[error("Trip not found")]
    TripNotFound,

    /// Guide not found
    #[error("Guide not found")]
    GuideNotFound,

    /// Registration not found
    #[error("Registration not found")]
    RegistrationNotFound,

    /// Destination still has trips scheduled
    #[error("Destination has trips and cannot be deleted")]
    DestinationHasTrips,

    /// Trip still has registrations
    #[error("Trip has registrations and cannot be deleted")]
    TripHasRegistrations,

    /// User still has registrations
    #[error("User has registrations and cannot be deleted")]
    UserHasRegistrations,

    /// The user already registered for this trip
    #[error("Already registered for this trip")]
    DuplicateRegistration,

    /// Not enough seats left on the trip
    #[error("Trip is full: {available} seats available")]
    TripFull {
        /// Seats still available on the trip.
        available: i64,
    },

    /// Return date is not after the departure date
    #[error("Invalid date range: return date must be after departure date")]
    InvalidDateRange,

    /// A guide with this email already exists
    #[error("A guide with this email already exists")]
    GuideEmailExists,
}

impl actix_web::ResponseError for TravelError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            TravelError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            TravelError::DestinationNotFound => {
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": "destination_not_found",
                    "message": "Destination not found"
                }))
            }
            TravelError::TripNotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "trip_not_found",
                "message": "Trip not found"
            })),
            TravelError::GuideNotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "guide_not_found",
                "message": "Guide not found"
            })),
            TravelError::RegistrationNotFound => {
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": "registration_not_found",
                    "message": "Registration not found"
                }))
            }
            TravelError::DestinationHasTrips => {
                HttpResponse::Conflict().json(serde_json::json!({
                    "error": "destination_has_trips",
                    "message": "Destination has scheduled trips and cannot be deleted"
                }))
            }
            TravelError::TripHasRegistrations => {
                HttpResponse::Conflict().json(serde_json::json!({
                    "error": "trip_has_registrations",
                    "message": "Trip has registrations and cannot be deleted"
                }))
            }
            TravelError::UserHasRegistrations => {
                HttpResponse::Conflict().json(serde_json::json!({
                    "error": "user_has_registrations",
                    "message": "User has trip registrations and cannot be deleted"
                }))
            }
            TravelError::DuplicateRegistration => {
                HttpResponse::Conflict().json(serde_json::json!({
                    "error": "duplicate_registration",
                    "message": "You are already registered for this trip"
                }))
            }
            TravelError::TripFull { available } => {
                HttpResponse::Conflict().json(serde_json::json!({
                    "error": "trip_full",
                    "message": format!("Not enough seats available: {} remaining", available)
                }))
            }
            TravelError::InvalidDateRange => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "invalid_date_range",
                "message": "Return date must be after departure date"
            })),
            TravelError::GuideEmailExists => HttpResponse::Conflict().json(serde_json::json!({
                "error": "guide_email_exists",
                "message": "A guide with this email already exists"
            })),
            TravelError::Database(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "internal_error",
                    "message": "An internal error occurred"
                }))
            }
        }
    }
}

/// Whether a database error is a foreign key violation (SQLSTATE 23503).
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23503"))
}

/// Whether a database error is a unique constraint violation (SQLSTATE 23505).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(TravelError::TripNotFound.error_response().status(), 404);
        assert_eq!(
            TravelError::DestinationHasTrips.error_response().status(),
            409
        );
        assert_eq!(
            TravelError::TripHasRegistrations.error_response().status(),
            409
        );
        assert_eq!(
            TravelError::DuplicateRegistration.error_response().status(),
            409
        );
        assert_eq!(
            TravelError::TripFull { available: 2 }.error_response().status(),
            409
        );
        assert_eq!(TravelError::InvalidDateRange.error_response().status(), 400);
        assert_eq!(
            TravelError::Validation("bad".to_string())
                .error_response()
                .status(),
            400
        );
    }

    #[test]
    fn test_trip_request_validation() {
        let request = CreateTripRequest {
            destination_id: Uuid::new_v4(),
            name: "Coastal hike".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 8).unwrap(),
            price_cents: 149_900,
            capacity: 12,
            guide_ids: vec![],
        };
        assert!(validator::Validate::validate(&request).is_ok());

        let zero_capacity = CreateTripRequest {
            capacity: 0,
            ..request
        };
        assert!(validator::Validate::validate(&zero_capacity).is_err());
    }

    #[test]
    fn test_registration_request_validation() {
        let request = CreateRegistrationRequest {
            trip_id: Uuid::new_v4(),
            participants: 4,
        };
        assert!(validator::Validate::validate(&request).is_ok());

        let zero = CreateRegistrationRequest {
            trip_id: Uuid::new_v4(),
            participants: 0,
        };
        assert!(validator::Validate::validate(&zero).is_err());
    }
}
