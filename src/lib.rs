//! Civic Location Library
//!
//! This library backs the location-selection flow of the civic issue
//! reporting app: a headless map-picker state machine, reverse geocoding
//! against an external provider with a coordinate-string fallback, and the
//! schema change adding representative-info columns to the Issues table.
//!
//! # Modules
//!
//! - `core`: Core domain logic (namespace facade).
//! - `data`: Data access layer (namespace facade).
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `errors`: Error handling types.
//! - `geocode`: Reverse-geocoding provider client.
//! - `models`: Core data models.
//! - `picker`: Location-picker state machine.
//! - `schema_change`: Issues table mlaInfo/mpInfo schema change.

pub mod core;
pub mod data;

// Re-export primary modules for shared use in tests and other binaries
pub mod config;
pub mod db;
pub mod errors;
pub mod geocode;
pub mod models;
pub mod picker;
pub mod schema_change;
