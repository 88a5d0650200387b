//! Router setup with all API routes and middleware.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use mindful_core::config::MindfulConfig;
use mindful_core::error::MindfulError;

use crate::handlers;
use crate::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Browser front ends are only expected on localhost, on the API port or
    // the next one up for a dev server.
    let port = state.config.general.port;
    let origins: Vec<HeaderValue> = [port, port.saturating_add(1)]
        .iter()
        .flat_map(|p| {
            [
                format!("http://127.0.0.1:{}", p),
                format!("http://localhost:{}", p),
            ]
        })
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let public_routes = Router::new().route("/health", get(handlers::health));

    let limiter = RateLimiter::new(state.config.api.rate_limit_per_sec);

    let rate_limited_routes = Router::new()
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::get_session).delete(handlers::end_session),
        )
        .route(
            "/sessions/{id}/page",
            get(handlers::get_page).put(handlers::navigate),
        )
        .route(
            "/sessions/{id}/reminders",
            get(handlers::list_reminders).post(handlers::add_reminder),
        )
        .route(
            "/sessions/{id}/contacts",
            get(handlers::list_contacts).post(handlers::add_contact),
        )
        .route(
            "/sessions/{id}/profile",
            get(handlers::get_profile).put(handlers::set_profile),
        )
        .route("/diary", post(handlers::diary_text))
        .route("/diary/audio", post(handlers::diary_audio))
        .layer(axum::middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ));

    let body_limit = state.config.api.body_limit_bytes;

    public_routes
        .merge(rate_limited_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve the API on 127.0.0.1 at the configured port until the process
/// exits.
pub async fn start_server(config: &MindfulConfig, state: AppState) -> Result<(), MindfulError> {
    let addr = format!("127.0.0.1:{}", config.general.port);
    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MindfulError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| MindfulError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
