//! Shared data models for the census participants API.
//!
//! This crate provides Serde-serializable types for:
//! - Participant records and their nested sections
//! - Read projections (summaries, details, work, home)
//! - Record validation

pub mod participant;
pub mod projection;
pub mod validation;

// Re-export common types
pub use participant::{is_truthy, Home, Participant, PersonalInfo, Work, SEED_EMAIL};
pub use projection::{HomeDetails, ParticipantDetails, PersonalSummary, WorkDetails};
pub use validation::{is_valid_dob, is_valid_email, validate_participant, ValidationError};
