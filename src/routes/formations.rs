//! Formation (training session) endpoints
//!
//! Reads are open to any authenticated user; create/update/delete require
//! the administrator role. Validation returns a single field-specific
//! message per call, first failing check wins.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::auth;
use crate::error::ApiError;
use crate::provider::AuthProvider;
use crate::state::AppState;
use crate::store::{DeliveryMode, Formation, FormationStore, ProfileStore};

#[derive(Deserialize)]
pub struct CreateFormationRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub objectives: Option<String>,
    pub delivery_mode: Option<String>,
    pub duration_hours: Option<f64>,
    pub instructor: Option<String>,
    pub scheduled_at: Option<String>,
    pub location: Option<String>,
    pub link: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateFormationRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub objectives: Option<String>,
    pub delivery_mode: Option<String>,
    pub duration_hours: Option<f64>,
    pub instructor: Option<String>,
    pub scheduled_at: Option<String>,
    // Double-option: absent keeps the stored value, explicit null clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub link: Option<Option<String>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Serialize)]
pub struct FormationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub formation: Formation,
}

#[derive(Serialize)]
pub struct FormationListResponse {
    pub success: bool,
    pub formations: Vec<Formation>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

fn validation(msg: &str) -> ApiError {
    ApiError::Validation(msg.to_string())
}

/// Treat empty strings like missing values.
fn non_empty(opt: Option<&String>) -> Option<&str> {
    opt.map(String::as_str).filter(|s| !s.is_empty())
}

fn parse_mode(raw: &str) -> Result<DeliveryMode, ApiError> {
    DeliveryMode::parse(raw)
        .ok_or_else(|| validation("Invalid delivery mode. Must be ON_SITE, ONLINE or HYBRID."))
}

fn parse_scheduled_at(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| validation("Scheduled date must be a valid ISO-8601 date-time."))
}

/// Mode-conditional requirements, checked against the record as it will be
/// stored: location before link.
fn validate_conditional_fields(
    mode: DeliveryMode,
    location: Option<&str>,
    link: Option<&str>,
) -> Result<(), ApiError> {
    if mode.requires_location() && location.map_or(true, str::is_empty) {
        return Err(validation(
            "Location is required for on-site and hybrid formations.",
        ));
    }
    if mode.requires_link() && link.map_or(true, str::is_empty) {
        return Err(validation(
            "Link is required for online and hybrid formations.",
        ));
    }
    Ok(())
}

/// POST /api/formations (admin only)
pub async fn create_formation<A, P, F>(
    State(state): State<Arc<AppState<A, P, F>>>,
    cookies: Cookies,
    Json(req): Json<CreateFormationRequest>,
) -> Result<(StatusCode, Json<FormationResponse>), ApiError>
where
    A: AuthProvider,
    P: ProfileStore,
    F: FormationStore,
{
    let claims = auth::authenticate(&cookies, &state.config.jwt_secret)?;
    auth::require_admin(&claims)?;

    let (title, description, objectives) = match (
        non_empty(req.title.as_ref()),
        non_empty(req.description.as_ref()),
        non_empty(req.objectives.as_ref()),
    ) {
        (Some(t), Some(d), Some(o)) => (t, d, o),
        _ => {
            return Err(validation(
                "Title, description and pedagogical objectives are required.",
            ))
        }
    };

    let mode = match non_empty(req.delivery_mode.as_ref()) {
        Some(raw) => parse_mode(raw)?,
        None => {
            return Err(validation(
                "Invalid delivery mode. Must be ON_SITE, ONLINE or HYBRID.",
            ))
        }
    };

    let duration_hours = match req.duration_hours {
        Some(d) if d > 0.0 => d,
        _ => return Err(validation("Duration must be greater than 0.")),
    };

    let instructor =
        non_empty(req.instructor.as_ref()).ok_or_else(|| validation("Instructor is required."))?;

    let scheduled_at = match non_empty(req.scheduled_at.as_ref()) {
        Some(raw) => parse_scheduled_at(raw)?,
        None => return Err(validation("Scheduled date is required.")),
    };

    let location = non_empty(req.location.as_ref());
    let link = non_empty(req.link.as_ref());
    validate_conditional_fields(mode, location, link)?;

    let now = Utc::now();
    let formation = Formation {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: description.to_string(),
        objectives: objectives.to_string(),
        delivery_mode: mode,
        duration_hours,
        instructor: instructor.to_string(),
        scheduled_at,
        location: location.map(str::to_string),
        link: link.map(str::to_string),
        created_by: claims.sub,
        created_at: now,
        updated_at: now,
    };

    let formation = state.formations.insert(formation).await?;

    Ok((
        StatusCode::CREATED,
        Json(FormationResponse {
            success: true,
            message: Some("Formation created successfully.".to_string()),
            formation,
        }),
    ))
}

/// GET /api/formations
pub async fn list_formations<A, P, F>(
    State(state): State<Arc<AppState<A, P, F>>>,
    cookies: Cookies,
) -> Result<Json<FormationListResponse>, ApiError>
where
    A: AuthProvider,
    P: ProfileStore,
    F: FormationStore,
{
    let claims = auth::authenticate(&cookies, &state.config.jwt_secret)?;
    auth::require_member(&claims)?;

    let formations = state.formations.list().await?;

    Ok(Json(FormationListResponse {
        success: true,
        formations,
    }))
}

/// GET /api/formations/:id
pub async fn get_formation<A, P, F>(
    State(state): State<Arc<AppState<A, P, F>>>,
    cookies: Cookies,
    Path(id): Path<Uuid>,
) -> Result<Json<FormationResponse>, ApiError>
where
    A: AuthProvider,
    P: ProfileStore,
    F: FormationStore,
{
    let claims = auth::authenticate(&cookies, &state.config.jwt_secret)?;
    auth::require_member(&claims)?;

    let formation = state
        .formations
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("Formation not found."))?;

    Ok(Json(FormationResponse {
        success: true,
        message: None,
        formation,
    }))
}

/// PUT /api/formations/:id (admin only)
///
/// Merges the partial body over the stored record and re-validates the
/// mode-conditional invariant against the result. A mode change does not
/// null out fields the new mode no longer requires.
pub async fn update_formation<A, P, F>(
    State(state): State<Arc<AppState<A, P, F>>>,
    cookies: Cookies,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateFormationRequest>,
) -> Result<Json<FormationResponse>, ApiError>
where
    A: AuthProvider,
    P: ProfileStore,
    F: FormationStore,
{
    let claims = auth::authenticate(&cookies, &state.config.jwt_secret)?;
    auth::require_admin(&claims)?;

    let existing = state
        .formations
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("Formation not found."))?;

    let mode = match non_empty(req.delivery_mode.as_ref()) {
        Some(raw) => parse_mode(raw)?,
        None => existing.delivery_mode,
    };

    let duration_hours = match req.duration_hours {
        Some(d) if d <= 0.0 => return Err(validation("Duration must be greater than 0.")),
        Some(d) => d,
        None => existing.duration_hours,
    };

    let scheduled_at = match non_empty(req.scheduled_at.as_ref()) {
        Some(raw) => parse_scheduled_at(raw)?,
        None => existing.scheduled_at,
    };

    let location = match &req.location {
        Some(value) => value.clone().filter(|s| !s.is_empty()),
        None => existing.location.clone(),
    };
    let link = match &req.link {
        Some(value) => value.clone().filter(|s| !s.is_empty()),
        None => existing.link.clone(),
    };
    validate_conditional_fields(mode, location.as_deref(), link.as_deref())?;

    let merged = Formation {
        id: existing.id,
        title: req.title.filter(|s| !s.is_empty()).unwrap_or(existing.title),
        description: req
            .description
            .filter(|s| !s.is_empty())
            .unwrap_or(existing.description),
        objectives: req
            .objectives
            .filter(|s| !s.is_empty())
            .unwrap_or(existing.objectives),
        delivery_mode: mode,
        duration_hours,
        instructor: req
            .instructor
            .filter(|s| !s.is_empty())
            .unwrap_or(existing.instructor),
        scheduled_at,
        location,
        link,
        created_by: existing.created_by,
        created_at: existing.created_at,
        updated_at: Utc::now(),
    };

    let formation = state.formations.update(merged).await?;

    Ok(Json(FormationResponse {
        success: true,
        message: Some("Formation updated successfully.".to_string()),
        formation,
    }))
}

/// DELETE /api/formations/:id (admin only)
pub async fn delete_formation<A, P, F>(
    State(state): State<Arc<AppState<A, P, F>>>,
    cookies: Cookies,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError>
where
    A: AuthProvider,
    P: ProfileStore,
    F: FormationStore,
{
    let claims = auth::authenticate(&cookies, &state.config.jwt_secret)?;
    auth::require_admin(&claims)?;

    state
        .formations
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("Formation not found."))?;

    state.formations.delete(id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        message: "Formation deleted successfully.".to_string(),
    }))
}
