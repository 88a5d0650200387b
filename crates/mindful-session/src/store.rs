use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use mindful_core::types::{Contact, MedicalProfile, Page, Reminder};

use crate::collection::Collection;
use crate::navigator::Navigator;
use crate::profile::ProfileStore;

/// All state belonging to one user session.
///
/// Created when the session starts and dropped when it ends; there is no
/// other copy anywhere.
#[derive(Debug, Clone)]
pub struct SessionStore {
    id: Uuid,
    created_at: DateTime<Utc>,
    pub navigator: Navigator,
    pub reminders: Collection<Reminder>,
    pub contacts: Collection<Contact>,
    pub profile: ProfileStore,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let store = Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            navigator: Navigator::new(),
            reminders: Collection::new(),
            contacts: Collection::new(),
            profile: ProfileStore::new(),
        };
        tracing::debug!(session_id = %store.id, "Session started");
        store
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Everything the presentation layer needs to draw the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            created_at: self.created_at,
            page: self.navigator.current(),
            reminders: self.reminders.list().to_vec(),
            contacts: self.contacts.list().to_vec(),
            profile: self.profile.get().clone(),
        }
    }
}

/// Point-in-time copy of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub page: Page,
    pub reminders: Vec<Reminder>,
    pub contacts: Vec<Contact>,
    pub profile: MedicalProfile,
}
