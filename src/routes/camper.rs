// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Camper routes for signed-in users.

use crate::db::CamperStore;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{CamperRecord, SessionUser};
use crate::services::{Directive, DirectiveRecorder, Resolution};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Camper routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes<S: CamperStore>() -> Router<Arc<AppState<S>>> {
    Router::new()
        .route("/api/camper", get(get_camper::<S>))
        .route("/api/camper/resolve", post(resolve_camper::<S>))
}

// ─── Resolution ──────────────────────────────────────────────

/// Page the browser just loaded.
#[derive(Debug, Deserialize, Validate)]
pub struct ResolveRequest {
    #[validate(length(min = 1, max = 512), custom(function = "validate_app_path"))]
    pub path: String,
}

fn validate_app_path(path: &str) -> std::result::Result<(), validator::ValidationError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(validator::ValidationError::new("path must start with '/'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum ResolveStatus {
    Applied,
    Skipped,
    Failed,
}

/// What the client should do after a page load.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ResolveResponse {
    pub status: ResolveStatus,
    pub outcome: Option<String>,
    pub directives: Vec<Directive>,
}

/// Resolve the caller's record for the page they opened.
async fn resolve_camper<S: CamperStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>> {
    body.validate()
        .map_err(|e| AppError::BadRequest(format!("Invalid 'path': {}", e)))?;

    let session = SessionUser::from(&user);
    let recorder = DirectiveRecorder::new();
    let resolution = state
        .resolver
        .resolve(&session, &body.path, &recorder)
        .await;

    let (status, outcome) = match resolution {
        Resolution::Applied(outcome) => (ResolveStatus::Applied, Some(outcome.kind().to_string())),
        Resolution::Skipped => (ResolveStatus::Skipped, None),
        Resolution::Failed { .. } => (ResolveStatus::Failed, None),
    };

    Ok(Json(ResolveResponse {
        status,
        outcome,
        directives: recorder.into_directives(),
    }))
}

// ─── Record ──────────────────────────────────────────────────

/// Get the caller's camper record.
async fn get_camper<S: CamperStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<CamperRecord>> {
    let record = state
        .store()
        .get_camper(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No camper record for {}", user.user_id)))?;

    Ok(Json(record))
}
