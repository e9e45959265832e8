//! Domain services.

pub mod participants;

pub use participants::{ParticipantService, ParticipantStore, StoreError};
