//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::actor::Actor;
use super::dto::{
    ConducteurListQuery, ConducteurListResponse, ConducteurResponse, ConflictsResponse,
    GridResponse, HealthResponse, NotificationListResponse, ProgramListResponse, RejectRequest,
    ResolveRequest, SaveConducteurRequest, UpdateProgramRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::algorithms::conflicting_program_ids;
use crate::db::services as db_services;
use crate::models::{ConducteurId, Notification, NotificationId, ProgramCandidate, ProgramId};
use crate::services::{
    conducteurs, notifications, scheduling, ProgramUpdate, ResolutionOutcome, ScheduleAttempt,
};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Result type for handlers whose status code depends on the outcome.
pub type StatusResult<T> = Result<(StatusCode, Json<T>), AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repo_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        repository: repo_status,
    }))
}

// =============================================================================
// Program grid
// =============================================================================

/// GET /v1/programs
pub async fn list_programs(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> HandlerResult<ProgramListResponse> {
    let programs = db_services::list_programs(state.repository.as_ref(), &actor.tenant).await?;
    let total = programs.len();
    Ok(Json(ProgramListResponse { programs, total }))
}

/// GET /v1/programs/grid
pub async fn weekly_grid(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> HandlerResult<GridResponse> {
    let grid = db_services::weekly_grid(state.repository.as_ref(), &actor.tenant).await?;
    let total = grid.program_count();
    Ok(Json(GridResponse { grid, total }))
}

/// POST /v1/programs/conflicts
///
/// Dry run: report what a candidate would overlap. Nothing is written.
pub async fn detect_conflicts(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(candidate): Json<ProgramCandidate>,
) -> HandlerResult<ConflictsResponse> {
    let conflicts =
        scheduling::detect_candidate_conflicts(state.repository.as_ref(), &actor, &candidate)
            .await?;
    let conflicting_program_ids = conflicting_program_ids(&conflicts);
    Ok(Json(ConflictsResponse {
        conflicts,
        conflicting_program_ids,
    }))
}

/// POST /v1/programs
///
/// 201 when every day was created, 207 when some creations failed, 409 with
/// the conflicts when the candidate overlaps the grid.
pub async fn create_programs(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(candidate): Json<ProgramCandidate>,
) -> StatusResult<ScheduleAttempt> {
    let attempt =
        scheduling::schedule_programs(state.repository.as_ref(), &actor, &candidate).await?;
    let status = match &attempt {
        ScheduleAttempt::Created { report } if report.is_complete() => StatusCode::CREATED,
        ScheduleAttempt::Created { .. } => StatusCode::MULTI_STATUS,
        ScheduleAttempt::Conflicts { .. } => StatusCode::CONFLICT,
    };
    Ok((status, Json(attempt)))
}

/// POST /v1/programs/resolve
pub async fn resolve_conflicts(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<ResolveRequest>,
) -> StatusResult<ResolutionOutcome> {
    let outcome = scheduling::resolve_conflicts(
        state.repository.as_ref(),
        &actor,
        &request.candidate,
        request.resolution,
    )
    .await?;
    let status = match &outcome {
        ResolutionOutcome::Applied { report } if !report.is_complete() => StatusCode::MULTI_STATUS,
        _ => StatusCode::OK,
    };
    Ok((status, Json(outcome)))
}

/// PUT /v1/programs/{id}
pub async fn update_program(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
    Json(request): Json<UpdateProgramRequest>,
) -> StatusResult<ProgramUpdate> {
    let update = scheduling::update_program(
        state.repository.as_ref(),
        &actor,
        ProgramId::new(id),
        &request.program,
        request.force,
    )
    .await?;
    let status = match &update {
        ProgramUpdate::Updated { .. } => StatusCode::OK,
        ProgramUpdate::Conflicts { .. } => StatusCode::CONFLICT,
    };
    Ok((status, Json(update)))
}

/// DELETE /v1/programs/{id}
pub async fn delete_program(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    scheduling::delete_program(state.repository.as_ref(), &actor, ProgramId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Run-sheets
// =============================================================================

/// GET /v1/conducteurs?status=
pub async fn list_conducteurs(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Query(query): Query<ConducteurListQuery>,
) -> HandlerResult<ConducteurListResponse> {
    let conducteurs =
        conducteurs::list_conducteurs(state.repository.as_ref(), &actor, query.status).await?;
    let total = conducteurs.len();
    Ok(Json(ConducteurListResponse { conducteurs, total }))
}

/// POST /v1/conducteurs
pub async fn create_conducteur(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<SaveConducteurRequest>,
) -> StatusResult<ConducteurResponse> {
    let conducteur = conducteurs::create_conducteur(
        state.repository.as_ref(),
        &actor,
        request.draft,
        request.submit,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(conducteur.into())))
}

/// GET /v1/conducteurs/{id}
pub async fn get_conducteur(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
) -> HandlerResult<ConducteurResponse> {
    let conducteur =
        conducteurs::get_conducteur(state.repository.as_ref(), &actor, ConducteurId::new(id))
            .await?;
    Ok(Json(conducteur.into()))
}

/// PUT /v1/conducteurs/{id}
pub async fn save_conducteur(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
    Json(request): Json<SaveConducteurRequest>,
) -> HandlerResult<ConducteurResponse> {
    let conducteur = conducteurs::save_conducteur(
        state.repository.as_ref(),
        &actor,
        ConducteurId::new(id),
        request.draft,
        request.submit,
    )
    .await?;
    Ok(Json(conducteur.into()))
}

/// DELETE /v1/conducteurs/{id}
pub async fn delete_conducteur(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    conducteurs::delete_conducteur(state.repository.as_ref(), &actor, ConducteurId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/conducteurs/{id}/validate
pub async fn validate_conducteur(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
) -> HandlerResult<ConducteurResponse> {
    let conducteur =
        conducteurs::validate_conducteur(state.repository.as_ref(), &actor, ConducteurId::new(id))
            .await?;
    Ok(Json(conducteur.into()))
}

/// POST /v1/conducteurs/{id}/reject
pub async fn reject_conducteur(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
    Json(request): Json<RejectRequest>,
) -> HandlerResult<ConducteurResponse> {
    let conducteur = conducteurs::reject_conducteur(
        state.repository.as_ref(),
        &actor,
        ConducteurId::new(id),
        request.comment,
    )
    .await?;
    Ok(Json(conducteur.into()))
}

// =============================================================================
// Notifications
// =============================================================================

/// GET /v1/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> HandlerResult<NotificationListResponse> {
    let notifications = notifications::inbox(state.repository.as_ref(), &actor).await?;
    let unread = notifications.iter().filter(|n| !n.read).count();
    Ok(Json(NotificationListResponse {
        notifications,
        unread,
    }))
}

/// POST /v1/notifications/{id}/read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
) -> HandlerResult<Notification> {
    let notification =
        notifications::mark_read(state.repository.as_ref(), &actor, NotificationId::new(id))
            .await?;
    Ok(Json(notification))
}
