//! Request handlers.

pub mod health;
pub mod participants;
pub mod views;

pub use health::*;
pub use participants::*;
pub use views::*;
