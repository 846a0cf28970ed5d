//! # Travel Services
//!
//! Domain layer of the travel booking application: destinations, trips,
//! guides, and trip registrations, backed by PostgreSQL.

/// Destination CRUD operations.
pub mod destination_service;

/// Guide CRUD operations.
pub mod guide_service;

/// Trip CRUD operations and guide assignment.
pub mod trip_service;

/// Trip registrations: capacity enforcement and pricing.
pub mod registration_service;

/// Domain entities, request/response types, and the travel error type.
pub mod types;
