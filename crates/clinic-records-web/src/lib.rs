//! Web front end for the clinic patient record manager.
//!
//! Four routes over the record service, rendered as plain HTML pages with
//! one-shot status messages carried across redirects.

pub mod config;
pub mod error;
pub mod flash;
pub mod routes;
pub mod views;

pub use config::Config;
pub use error::AppError;
pub use flash::{Category, Flash, FlashSigner};
pub use routes::{router, AppState};
