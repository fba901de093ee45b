#![forbid(unsafe_code)]

//! Core domain model and business logic for the triage and bed-booking
//! system.
//!
//! This crate provides:
//! - Domain types (symptom reports, conditions, hospital pools, reservations)
//! - The diagnosis rule table and classifier
//! - A durable, lock-guarded capacity store
//! - Booking, withdrawal and capacity-reset operations

pub mod types;
pub mod error;
pub mod rules;
pub mod triage;
pub mod seed;
pub mod config;
pub mod logging;
pub mod store;
pub mod booking;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use rules::{rule_table, SYMPTOM_VOCABULARY};
pub use triage::{classify, MIN_MATCH_SCORE};
pub use seed::default_directory;
pub use config::Config;
pub use store::{BedRegistry, CapacityStore};
pub use booking::{book, book_first_available, list_candidates, reset_capacity, withdraw};
