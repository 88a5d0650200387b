//! Integration tests for the Mindful API.
//!
//! Each test builds its own router over fresh state with a scripted
//! recognizer, then drives it with `oneshot` requests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use mindful_api::create_router;
use mindful_api::handlers::{AddResponse, HealthResponse, PageResponse, SessionCreated};
use mindful_api::state::AppState;
use mindful_core::config::MindfulConfig;
use mindful_core::types::{Contact, MedicalProfile, Page, Reminder};
use mindful_speech::wav::encode_wav;
use mindful_speech::{AudioData, MockRecognizer, RecognitionError, Recognizer};

// =============================================================================
// Helpers
// =============================================================================

fn make_state(mock: &MockRecognizer) -> AppState {
    AppState::new(MindfulConfig::default(), Recognizer::Mock(mock.clone()))
}

fn make_app() -> axum::Router {
    create_router(make_state(&MockRecognizer::default()))
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, json: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(resp: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

/// Create a session and return its base path, e.g. `/sessions/<uuid>`.
async fn new_session(app: &axum::Router) -> String {
    let resp = app.clone().oneshot(post_empty("/sessions")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: SessionCreated = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    format!("/sessions/{}", created.session_id)
}

fn speech_wav() -> Vec<u8> {
    encode_wav(&AudioData::new(vec![4_000; 16_000], 16_000)).unwrap()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_happy_path() {
    let app = make_app();
    let resp = app.clone().oneshot(get("/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let health: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.live_sessions, 0);

    new_session(&app).await;
    let resp = app.oneshot(get("/health")).await.unwrap();
    let health: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(health.live_sessions, 1);
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_new_session_snapshot() {
    let app = make_app();
    let base = new_session(&app).await;

    let resp = app.oneshot(get(&base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let snap = body_json(resp).await;
    assert_eq!(snap["page"], "home");
    assert_eq!(snap["reminders"], Value::Array(vec![]));
    assert_eq!(snap["contacts"], Value::Array(vec![]));
    assert_eq!(snap["profile"]["blood_type"], "");
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = make_app();
    let uri = format!("/sessions/{}", uuid::Uuid::new_v4());

    let resp = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "not_found");

    let resp = app
        .oneshot(get(&format!("{}/reminders", uri)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_end_session_destroys_state() {
    let app = make_app();
    let base = new_session(&app).await;

    let resp = app
        .clone()
        .oneshot(Request::delete(&base).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.clone().oneshot(get(&base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .oneshot(Request::delete(&base).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_limit_is_service_unavailable() {
    let mut config = MindfulConfig::default();
    config.api.max_sessions = 1;
    let app = create_router(AppState::new(
        config,
        Recognizer::Mock(MockRecognizer::default()),
    ));

    new_session(&app).await;
    let resp = app.oneshot(post_empty("/sessions")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_abandoned_session_expires() {
    let mut config = MindfulConfig::default();
    config.api.max_sessions = 1;
    config.api.session_idle_secs = 0;
    let app = create_router(AppState::new(
        config,
        Recognizer::Mock(MockRecognizer::default()),
    ));

    let abandoned = new_session(&app).await;
    // The slot is free again without a DELETE.
    new_session(&app).await;

    let resp = app.oneshot(get(&abandoned)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let app = make_app();
    let a = new_session(&app).await;
    let b = new_session(&app).await;

    app.clone()
        .oneshot(send_json(
            "POST",
            &format!("{}/contacts", a),
            r#"{"name":"Alice","number":"555-0101"}"#,
        ))
        .await
        .unwrap();

    let resp = app
        .oneshot(get(&format!("{}/contacts", b)))
        .await
        .unwrap();
    let contacts: Vec<Contact> = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(contacts.is_empty());
}

// =============================================================================
// Navigation
// =============================================================================

#[tokio::test]
async fn test_navigate_pages() {
    let app = make_app();
    let base = new_session(&app).await;
    let uri = format!("{}/page", base);

    let resp = app.clone().oneshot(get(&uri)).await.unwrap();
    let page: PageResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(page.page, Page::Home);
    assert_eq!(page.title, "Home / AI Diary");

    for target in Page::ALL {
        let body = format!(r#"{{"page":"{}"}}"#, target);
        let resp = app
            .clone()
            .oneshot(send_json("PUT", &uri, &body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let page: PageResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert_eq!(page.page, target);
    }
}

#[tokio::test]
async fn test_navigate_to_unknown_page_is_rejected() {
    let app = make_app();
    let base = new_session(&app).await;

    let resp = app
        .oneshot(send_json(
            "PUT",
            &format!("{}/page", base),
            r#"{"page":"settings"}"#,
        ))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

// =============================================================================
// Reminders and contacts
// =============================================================================

#[tokio::test]
async fn test_add_reminder_scenario() {
    let app = make_app();
    let base = new_session(&app).await;
    let uri = format!("{}/reminders", base);

    let resp = app
        .clone()
        .oneshot(send_json(
            "POST",
            &uri,
            r#"{"medicine":"Aspirin","dosage":"1 pill","time":"08:00"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let added: AddResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(added.added);
    assert_eq!(added.count, 1);

    let resp = app.oneshot(get(&uri)).await.unwrap();
    let reminders: Vec<Reminder> = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(reminders, vec![Reminder::new("Aspirin", "1 pill", "08:00 AM")]);
}

#[tokio::test]
async fn test_empty_medicine_is_skipped() {
    let app = make_app();
    let base = new_session(&app).await;
    let uri = format!("{}/reminders", base);

    app.clone()
        .oneshot(send_json(
            "POST",
            &uri,
            r#"{"medicine":"Aspirin","dosage":"1 pill","time":"08:00"}"#,
        ))
        .await
        .unwrap();
    let resp = app
        .clone()
        .oneshot(send_json(
            "POST",
            &uri,
            r#"{"medicine":"","dosage":"2 pills","time":"21:00"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let added: AddResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(!added.added);
    assert_eq!(added.count, 1);
}

#[tokio::test]
async fn test_reminder_with_unreadable_time_is_rejected() {
    let app = make_app();
    let base = new_session(&app).await;
    let uri = format!("{}/reminders", base);

    let resp = app
        .clone()
        .oneshot(send_json(
            "POST",
            &uri,
            r#"{"medicine":"Aspirin","dosage":"1 pill","time":"banana"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "bad_request");

    let resp = app.oneshot(get(&uri)).await.unwrap();
    let reminders: Vec<Reminder> = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(reminders.is_empty());
}

#[tokio::test]
async fn test_reminder_time_on_12_hour_clock_is_kept() {
    let app = make_app();
    let base = new_session(&app).await;
    let uri = format!("{}/reminders", base);

    let resp = app
        .clone()
        .oneshot(send_json(
            "POST",
            &uri,
            r#"{"medicine":"Vitamin D","dosage":"1 tablet","time":"09:30 PM"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.oneshot(get(&uri)).await.unwrap();
    let reminders: Vec<Reminder> = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(reminders[0].time, "09:30 PM");
}

#[tokio::test]
async fn test_contacts_keep_insertion_order() {
    let app = make_app();
    let base = new_session(&app).await;
    let uri = format!("{}/contacts", base);

    for body in [
        r#"{"name":"Alice","number":"555-0101"}"#,
        r#"{"name":"","number":"555-0000"}"#,
        r#"{"name":"Bob","number":"555-0102"}"#,
    ] {
        app.clone()
            .oneshot(send_json("POST", &uri, body))
            .await
            .unwrap();
    }

    let resp = app.oneshot(get(&uri)).await.unwrap();
    let contacts: Vec<Contact> = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(
        contacts,
        vec![
            Contact::new("Alice", "555-0101"),
            Contact::new("Bob", "555-0102"),
        ]
    );
}

// =============================================================================
// Medical profile
// =============================================================================

#[tokio::test]
async fn test_profile_overwrite() {
    let app = make_app();
    let base = new_session(&app).await;
    let uri = format!("{}/profile", base);

    let resp = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &uri,
            r#"{"doctor_name":"Dr. Okafor","doctor_contact":"555-0199","blood_type":"O+","allergies":"Penicillin","conditions":"Asthma"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Fields missing from the second form are cleared, not merged.
    app.clone()
        .oneshot(send_json("PUT", &uri, r#"{"blood_type":"A-"}"#))
        .await
        .unwrap();

    let resp = app.oneshot(get(&uri)).await.unwrap();
    let profile: MedicalProfile = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(
        profile,
        MedicalProfile {
            blood_type: "A-".to_string(),
            ..MedicalProfile::default()
        }
    );
}

// =============================================================================
// Diary
// =============================================================================

#[tokio::test]
async fn test_diary_positive_text() {
    let app = make_app();
    let resp = app
        .oneshot(send_json("POST", "/diary", r#"{"text":"I feel great today!"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["text"], "I feel great today!");
    assert_eq!(body["reflection"]["message"]["band"], "positive");
    assert!(body["reflection"]["entry"]["polarity"].as_f64().unwrap() > 0.2);
}

#[tokio::test]
async fn test_diary_supportive_text() {
    let app = make_app();
    let resp = app
        .oneshot(send_json(
            "POST",
            "/diary",
            r#"{"text":"Everything is awful and I feel terrible"}"#,
        ))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["reflection"]["message"]["band"], "supportive");
}

#[tokio::test]
async fn test_diary_empty_text_has_no_reflection() {
    let app = make_app();
    let resp = app
        .oneshot(send_json("POST", "/diary", r#"{"text":""}"#))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["text"], "");
    assert!(body["reflection"].is_null());
}

#[tokio::test]
async fn test_diary_audio_recognized() {
    let mock = MockRecognizer::new("I am so happy my grandson visited");
    let app = create_router(make_state(&mock));

    let resp = app
        .oneshot(
            Request::post("/diary/audio")
                .header("content-type", "audio/wav")
                .body(Body::from(speech_wav()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["text"], "I am so happy my grandson visited");
    assert_eq!(body["reflection"]["message"]["band"], "positive");

    let kinds: Vec<&str> = body["statuses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["recognizing", "recognized"]);
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_diary_audio_empty_body_skips_recognizer() {
    let mock = MockRecognizer::new("unused");
    let app = create_router(make_state(&mock));

    let resp = app.oneshot(post_empty("/diary/audio")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["text"], "");
    assert!(body["reflection"].is_null());
    assert_eq!(body["statuses"], Value::Array(vec![]));
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_diary_audio_service_failure_is_not_http_error() {
    let mock = MockRecognizer::failing(RecognitionError::Service("HTTP 503".into()));
    let app = create_router(make_state(&mock));

    let resp = app
        .oneshot(
            Request::post("/diary/audio")
                .body(Body::from(speech_wav()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["text"], "");
    assert!(body["reflection"].is_null());

    let last = body["statuses"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["kind"], "service_unavailable");
    assert_eq!(last["level"], "error");
    assert_eq!(
        last["message"],
        "Could not connect to speech services; HTTP 503"
    );
}

#[tokio::test]
async fn test_diary_audio_garbage_is_not_understood() {
    let mock = MockRecognizer::new("unused");
    let app = create_router(make_state(&mock));

    let resp = app
        .oneshot(
            Request::post("/diary/audio")
                .body(Body::from("not a wav file"))
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["statuses"][0]["kind"], "not_understood");
    assert_eq!(mock.calls(), 0);
}

// =============================================================================
// Middleware
// =============================================================================

#[tokio::test]
async fn test_rate_limit_rejects_excess_requests() {
    let mut config = MindfulConfig::default();
    config.api.rate_limit_per_sec = 2;
    let app = create_router(AppState::new(
        config,
        Recognizer::Mock(MockRecognizer::default()),
    ));

    let mut statuses = Vec::new();
    for _ in 0..4 {
        let resp = app
            .clone()
            .oneshot(send_json("POST", "/diary", r#"{"text":"hello"}"#))
            .await
            .unwrap();
        statuses.push(resp.status());
    }
    assert!(statuses.contains(&StatusCode::TOO_MANY_REQUESTS));

    // Health stays reachable.
    let resp = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
