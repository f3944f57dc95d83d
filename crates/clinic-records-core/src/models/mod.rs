//! Domain models for the clinic record manager.

mod patient;

pub use patient::*;
