pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::MindfulConfig;
pub use error::{MindfulError, Result};
pub use events::{StatusEvent, StatusLevel};
pub use types::*;
