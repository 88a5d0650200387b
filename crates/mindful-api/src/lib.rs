//! Mindful API crate - axum HTTP boundary for the presentation layer.
//!
//! Exposes session state (page, reminders, contacts, medical profile) and
//! diary reflection, typed or recorded, as a local JSON API.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::{AppState, SessionRegistry};
