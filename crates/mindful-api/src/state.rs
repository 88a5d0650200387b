//! Application state shared across all route handlers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use uuid::Uuid;

use mindful_core::config::MindfulConfig;
use mindful_core::error::MindfulError;
use mindful_sentiment::LexiconClassifier;
use mindful_session::SessionStore;
use mindful_speech::{InputAcquisition, Recognizer};

/// One session, locked for the duration of a single request.
pub type SharedSession = Arc<tokio::sync::Mutex<SessionStore>>;

struct Entry {
    session: SharedSession,
    last_seen: Instant,
}

/// Live sessions keyed by id.
///
/// The map lock is only held to look up, insert or remove an entry; work on a
/// session happens under that session's own lock. A session nobody has
/// touched for `idle` is dropped the next time the registry is used.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<Uuid, Entry>>>,
    limit: usize,
    idle: Duration,
}

impl SessionRegistry {
    pub fn new(limit: usize, idle: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            limit,
            idle,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Entry>>, MindfulError> {
        self.sessions
            .lock()
            .map_err(|e| MindfulError::Api(format!("Session registry lock poisoned: {}", e)))
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, Entry>, now: Instant) {
        let idle = self.idle;
        sessions.retain(|id, entry| {
            let alive = now.saturating_duration_since(entry.last_seen) < idle;
            if !alive {
                tracing::info!(session_id = %id, "Session expired after inactivity");
            }
            alive
        });
    }

    /// Start a new session, unless `limit` sessions are already live.
    pub fn create(&self) -> Result<(Uuid, SharedSession), MindfulError> {
        self.create_at(Instant::now())
    }

    fn create_at(&self, now: Instant) -> Result<(Uuid, SharedSession), MindfulError> {
        let store = SessionStore::new();
        let id = store.id();
        let session = Arc::new(tokio::sync::Mutex::new(store));

        let mut sessions = self.lock()?;
        self.evict_idle(&mut sessions, now);
        if sessions.len() >= self.limit {
            return Err(MindfulError::SessionLimit { limit: self.limit });
        }
        sessions.insert(
            id,
            Entry {
                session: Arc::clone(&session),
                last_seen: now,
            },
        );
        tracing::info!(session_id = %id, live = sessions.len(), "Session created");
        Ok((id, session))
    }

    /// Look a session up and mark it as active.
    pub fn get(&self, id: Uuid) -> Result<Option<SharedSession>, MindfulError> {
        self.get_at(id, Instant::now())
    }

    fn get_at(&self, id: Uuid, now: Instant) -> Result<Option<SharedSession>, MindfulError> {
        let mut sessions = self.lock()?;
        self.evict_idle(&mut sessions, now);
        Ok(sessions.get_mut(&id).map(|entry| {
            entry.last_seen = now;
            Arc::clone(&entry.session)
        }))
    }

    /// End a session, dropping its state. Returns false if it did not exist.
    pub fn remove(&self, id: Uuid) -> Result<bool, MindfulError> {
        let removed = self.lock()?.remove(&id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Session ended");
        }
        Ok(removed)
    }

    /// Number of live sessions.
    pub fn len(&self) -> Result<usize, MindfulError> {
        let mut sessions = self.lock()?;
        self.evict_idle(&mut sessions, Instant::now());
        Ok(sessions.len())
    }

    pub fn is_empty(&self) -> Result<bool, MindfulError> {
        Ok(self.len()? == 0)
    }
}

/// Shared application state.
///
/// Cloned into every handler; all fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<MindfulConfig>,
    /// Live user sessions.
    pub sessions: SessionRegistry,
    /// Diary sentiment classifier.
    pub classifier: Arc<LexiconClassifier>,
    /// Speech pipeline for recorded diary entries.
    pub acquisition: InputAcquisition<Recognizer>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: MindfulConfig, recognizer: Recognizer) -> Self {
        let sessions = SessionRegistry::new(
            config.api.max_sessions,
            Duration::from_secs(config.api.session_idle_secs),
        );
        let acquisition = InputAcquisition::new(recognizer, config.listen.clone());
        Self {
            config: Arc::new(config),
            sessions,
            classifier: Arc::new(LexiconClassifier::new()),
            acquisition,
            start_time: Instant::now(),
        }
    }
}
