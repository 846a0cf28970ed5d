//! # Postgres
//!
//! This crate provides a client for the travel booking application to interact with a PostgreSQL database.

/// Database client for the travel booking application.
pub mod database;
