//! HTTP routes

mod auth;
mod formations;

use std::any::Any;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use tower_cookies::{CookieManagerLayer, Cookies};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::provider::AuthProvider;
use crate::state::AppState;
use crate::store::{FormationStore, ProfileStore};

/// Create the router with all routes
pub fn create_router<A, P, F>(state: Arc<AppState<A, P, F>>) -> Router
where
    A: AuthProvider + 'static,
    P: ProfileStore + 'static,
    F: FormationStore + 'static,
{
    let frontend_origin = state
        .config
        .frontend_url
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000"));

    // Credentialed CORS restricted to the frontend origin
    let cors = CorsLayer::new()
        .allow_origin(frontend_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .route("/api/auth/me", get(auth::get_current_user))
        .route("/api/auth/refresh", post(auth::refresh))
        .route(
            "/api/formations",
            get(formations::list_formations).post(formations::create_formation),
        )
        .route(
            "/api/formations/:id",
            get(formations::get_formation)
                .put(formations::update_formation)
                .delete(formations::delete_formation),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

/// A panicking handler degrades to a generic 500 instead of tearing down
/// the connection; the panic itself is logged.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("handler panicked: {}", detail);

    let body = json!({ "success": false, "message": "Internal server error" });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// GET / — welcome message, personalized when a valid session is present
/// but never requiring one.
async fn index<A, P, F>(
    State(state): State<Arc<AppState<A, P, F>>>,
    cookies: Cookies,
) -> Json<serde_json::Value>
where
    A: AuthProvider,
    P: ProfileStore,
    F: FormationStore,
{
    let claims = crate::auth::optional_authenticate(&cookies, &state.config.jwt_secret);

    Json(json!({
        "message": "HR Training Management API",
        "authenticated_as": claims.map(|c| c.email),
    }))
}

/// GET /api/health
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK", "timestamp": Utc::now().to_rfc3339() }))
}
