//! Route handler functions for all API endpoints.
//!
//! Session handlers look the session up in the registry, lock it for the
//! duration of the request, and answer with JSON. Diary handlers do not
//! touch session state at all.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use mindful_core::events::{StatusEvent, StatusLevel};
use mindful_core::types::{Contact, MedicalProfile, Page, Reminder, REMINDER_TIME_FORMAT};
use mindful_sentiment::{reflect, Reflection};
use mindful_session::SessionSnapshot;
use mindful_speech::{text_or_empty, AudioInput};

use crate::error::ApiError;
use crate::state::{AppState, SharedSession};

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub page: Page,
}

/// Reminder form. `time` is `HH:MM` or `HH:MM:SS` on a 24-hour clock, or
/// already on a 12-hour clock (`08:00 PM`); it is stored on a 12-hour clock.
#[derive(Debug, Deserialize)]
pub struct ReminderRequest {
    #[serde(default)]
    pub medicine: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub time: String,
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: String,
}

#[derive(Debug, Deserialize)]
pub struct DiaryRequest {
    #[serde(default)]
    pub text: String,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub live_sessions: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageResponse {
    pub page: Page,
    pub title: String,
}

impl From<Page> for PageResponse {
    fn from(page: Page) -> Self {
        Self {
            page,
            title: page.title().to_string(),
        }
    }
}

/// Outcome of a form submission. `added` is false when the form was
/// skipped for an empty required field.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddResponse {
    pub added: bool,
    pub count: usize,
}

/// A status notification as shown to the user.
#[derive(Debug, Serialize)]
pub struct StatusNotice {
    #[serde(flatten)]
    pub event: StatusEvent,
    pub level: StatusLevel,
    pub message: String,
}

impl From<StatusEvent> for StatusNotice {
    fn from(event: StatusEvent) -> Self {
        Self {
            level: event.level(),
            message: event.message(),
            event,
        }
    }
}

/// Diary reflection result. `reflection` is null when there was no text.
#[derive(Debug, Serialize)]
pub struct DiaryResponse {
    pub text: String,
    pub reflection: Option<Reflection>,
    pub statuses: Vec<StatusNotice>,
}

// =============================================================================
// Helpers
// =============================================================================

const REMINDER_INPUT_FORMATS: [&str; 3] = ["%H:%M", "%H:%M:%S", REMINDER_TIME_FORMAT];

fn session(state: &AppState, id: Uuid) -> Result<SharedSession, ApiError> {
    state
        .sessions
        .get(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Session {} not found", id)))
}

fn reminder_from(req: ReminderRequest) -> Result<Reminder, ApiError> {
    let ReminderRequest {
        medicine,
        dosage,
        time,
    } = req;
    let parsed = REMINDER_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(time.trim(), fmt).ok());
    match parsed {
        Some(t) => Ok(Reminder::at(medicine, dosage, t)),
        None => Err(ApiError::BadRequest(format!(
            "Invalid reminder time '{}': expected HH:MM or hh:mm AM/PM",
            time
        ))),
    }
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        live_sessions: state.sessions.len()?,
    }))
}

/// POST /sessions
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionCreated>), ApiError> {
    let (session_id, session) = state.sessions.create()?;
    let created_at = session.lock().await.created_at();
    Ok((
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id,
            created_at,
        }),
    ))
}

/// GET /sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let session = session(&state, id)?;
    let store = session.lock().await;
    Ok(Json(store.snapshot()))
}

/// DELETE /sessions/{id}
pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Session {} not found", id)))
    }
}

/// GET /sessions/{id}/page
pub async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PageResponse>, ApiError> {
    let session = session(&state, id)?;
    let page = session.lock().await.navigator.current();
    Ok(Json(page.into()))
}

/// PUT /sessions/{id}/page
pub async fn navigate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PageRequest>,
) -> Result<Json<PageResponse>, ApiError> {
    let session = session(&state, id)?;
    let mut store = session.lock().await;
    store.navigator.navigate(req.page);
    Ok(Json(store.navigator.current().into()))
}

/// GET /sessions/{id}/reminders
pub async fn list_reminders(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Reminder>>, ApiError> {
    let session = session(&state, id)?;
    let store = session.lock().await;
    Ok(Json(store.reminders.list().to_vec()))
}

/// POST /sessions/{id}/reminders
pub async fn add_reminder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReminderRequest>,
) -> Result<Json<AddResponse>, ApiError> {
    let session = session(&state, id)?;
    let reminder = reminder_from(req)?;
    let mut store = session.lock().await;
    let added = store.reminders.add(reminder);
    Ok(Json(AddResponse {
        added,
        count: store.reminders.len(),
    }))
}

/// GET /sessions/{id}/contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let session = session(&state, id)?;
    let store = session.lock().await;
    Ok(Json(store.contacts.list().to_vec()))
}

/// POST /sessions/{id}/contacts
pub async fn add_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ContactRequest>,
) -> Result<Json<AddResponse>, ApiError> {
    let session = session(&state, id)?;
    let mut store = session.lock().await;
    let added = store.contacts.add(Contact::new(req.name, req.number));
    Ok(Json(AddResponse {
        added,
        count: store.contacts.len(),
    }))
}

/// GET /sessions/{id}/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MedicalProfile>, ApiError> {
    let session = session(&state, id)?;
    let store = session.lock().await;
    Ok(Json(store.profile.get().clone()))
}

/// PUT /sessions/{id}/profile
pub async fn set_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(profile): Json<MedicalProfile>,
) -> Result<Json<MedicalProfile>, ApiError> {
    let session = session(&state, id)?;
    let mut store = session.lock().await;
    store.profile.set(profile);
    Ok(Json(store.profile.get().clone()))
}

/// POST /diary
pub async fn diary_text(
    State(state): State<AppState>,
    Json(req): Json<DiaryRequest>,
) -> Json<DiaryResponse> {
    let reflection = reflect(state.classifier.as_ref(), &req.text);
    Json(DiaryResponse {
        text: req.text,
        reflection,
        statuses: Vec::new(),
    })
}

/// POST /diary/audio
///
/// The body is a WAV recording. Capture failures are reported through
/// `statuses` with empty text, not as HTTP errors.
pub async fn diary_audio(State(state): State<AppState>, body: Bytes) -> Json<DiaryResponse> {
    let (tx, mut rx) = broadcast::channel(16);
    let acquisition = state.acquisition.clone().with_status(tx);

    let text = text_or_empty(acquisition.acquire(AudioInput::recording(&body)).await);

    let mut statuses = Vec::new();
    while let Ok(event) = rx.try_recv() {
        statuses.push(StatusNotice::from(event));
    }

    let reflection = reflect(state.classifier.as_ref(), &text);
    Json(DiaryResponse {
        text,
        reflection,
        statuses,
    })
}
