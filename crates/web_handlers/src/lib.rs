//! # Web Handlers for the Travel Booking Web Application
//!
//! This crate provides the REST API handlers and the server-rendered pages
//! for the travel booking application.

/// Authentication handlers (signup, login, refresh, logout)
mod auth_handlers;
pub use auth_handlers::*;

/// User profile handlers (get/update profile)
mod profile_handlers;
pub use profile_handlers::*;

/// Destination catalog handlers
mod destination_handlers;
pub use destination_handlers::*;

/// Guide roster handlers
mod guide_handlers;
pub use guide_handlers::*;

/// Trip catalog handlers and guide assignment
mod trip_handlers;
pub use trip_handlers::*;

/// Trip registration handlers
mod registration_handlers;
pub use registration_handlers::*;

/// Admin and development handlers
mod admin_handlers;
pub use admin_handlers::*;

/// Server-rendered page handlers
mod page_handlers;
pub use page_handlers::*;

/// HTML rendering for the server-rendered pages
pub mod page_templates;
