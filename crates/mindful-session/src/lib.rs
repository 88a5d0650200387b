//! Mindful Session crate - ephemeral per-session state.
//!
//! A [`SessionStore`] owns the page navigator, the reminder and contact
//! collections, and the medical profile for one user session. Nothing here
//! touches disk: state lives exactly as long as the store.

pub mod collection;
pub mod navigator;
pub mod profile;
pub mod store;

pub use collection::{Collection, Record};
pub use navigator::Navigator;
pub use profile::ProfileStore;
pub use store::{SessionSnapshot, SessionStore};
