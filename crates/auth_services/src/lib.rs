//! # Auth Services
//!
//! Authentication and user management for the travel booking application:
//! JWT tokens, password hashing, session persistence, and actix middleware.

/// JWT issuing and verification.
pub mod jwt;

/// Request middleware and extractors for authenticated routes.
pub mod middleware;

/// User persistence and credential verification.
pub mod service;

/// Auth request/response types, the user model, and the auth error type.
pub mod types;
