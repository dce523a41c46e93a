//! Program scheduling and conflict resolution.
//!
//! A candidate program is checked against the tenant's grid before anything
//! is written. When it overlaps existing programs the caller picks exactly one
//! [`Resolution`]; nothing is ever resolved implicitly.
//!
//! Creations (one per selected day) and deletions (one per conflicting
//! program) run as concurrent batches with no rollback. A deletion failure
//! skips the creation step so a half-cleared slot is not double-booked.

use chrono::Utc;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::batch::{run_batch, BatchOutcome};
use super::error::{ServiceError, ServiceResult};
use super::require_director;
use crate::algorithms::{conflicting_program_ids, detect_conflicts, detect_conflicts_excluding};
use crate::db::FullRepository;
use crate::models::{
    ActorContext, DayOfWeek, Program, ProgramCandidate, ProgramConflict, ProgramId, TenantId,
    ValidationErrors,
};

/// Programs created for a candidate, keyed by the day each call was for.
pub type CreationReport = BatchOutcome<Program, DayOfWeek>;

/// Result of submitting a candidate.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScheduleAttempt {
    /// No overlap: one program was created per selected day.
    Created { report: CreationReport },
    /// Overlaps found. Nothing was written.
    Conflicts { conflicts: Vec<ProgramConflict> },
}

/// The caller's choice once conflicts are shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Resolution {
    /// Delete every conflicting program, then create the candidate.
    Replace,
    /// Edit the first conflicting program instead. No writes.
    Modify,
    /// Delete the chosen programs (all conflicting ones by default), then
    /// create the candidate when `recreate` is set.
    DeleteConflicting {
        #[serde(default)]
        program_ids: Option<Vec<ProgramId>>,
        #[serde(default = "default_recreate")]
        recreate: bool,
    },
    /// Create the candidate despite the overlaps.
    ContinueAnyway,
}

fn default_recreate() -> bool {
    true
}

impl Resolution {
    pub fn name(&self) -> &'static str {
        match self {
            Resolution::Replace => "replace",
            Resolution::Modify => "modify",
            Resolution::DeleteConflicting { .. } => "delete_conflicting",
            Resolution::ContinueAnyway => "continue_anyway",
        }
    }
}

/// Every store call a resolution made.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolutionReport {
    pub deleted: BatchOutcome<ProgramId>,
    pub created: CreationReport,
    /// Creation was due but not attempted because a deletion failed.
    pub creation_skipped: bool,
}

impl ResolutionReport {
    pub fn is_complete(&self) -> bool {
        self.deleted.is_complete() && self.created.is_complete() && !self.creation_skipped
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    Applied { report: ResolutionReport },
    /// The caller should open this program for editing.
    EditRequested { program: Program },
}

/// Result of editing an existing program.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProgramUpdate {
    Updated { program: Program },
    Conflicts { conflicts: Vec<ProgramConflict> },
}

/// Validate a candidate and compute its conflicts against a fresh read.
pub async fn detect_candidate_conflicts<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &ActorContext,
    candidate: &ProgramCandidate,
) -> ServiceResult<Vec<ProgramConflict>> {
    require_director(actor, "manage programs")?;
    let range = candidate.validate()?;
    let existing = repo.list_programs(&actor.tenant).await?;
    Ok(detect_conflicts(
        &existing,
        &candidate.unique_days(),
        range.start(),
        range.end(),
    ))
}

/// Create the candidate on every selected day, unless it conflicts.
pub async fn schedule_programs<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &ActorContext,
    candidate: &ProgramCandidate,
) -> ServiceResult<ScheduleAttempt> {
    let conflicts = detect_candidate_conflicts(repo, actor, candidate).await?;
    if !conflicts.is_empty() {
        info!(
            "Program '{}' conflicts on {} day(s) for tenant {}",
            candidate.name,
            conflicts.len(),
            actor.tenant
        );
        return Ok(ScheduleAttempt::Conflicts { conflicts });
    }

    let report = create_for_days(repo, &actor.tenant, candidate).await;
    info!(
        "Scheduled '{}' for tenant {}: {} created, {} failed",
        candidate.name,
        actor.tenant,
        report.succeeded.len(),
        report.failed.len()
    );
    Ok(ScheduleAttempt::Created { report })
}

/// Apply one resolution to a conflicting candidate.
///
/// Conflicts are recomputed first; the grid may have changed since they
/// were shown.
pub async fn resolve_conflicts<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &ActorContext,
    candidate: &ProgramCandidate,
    resolution: Resolution,
) -> ServiceResult<ResolutionOutcome> {
    let conflicts = detect_candidate_conflicts(repo, actor, candidate).await?;
    let conflicting = conflicting_program_ids(&conflicts);
    info!(
        "Resolving '{}' with {} ({} conflicting program(s))",
        candidate.name,
        resolution.name(),
        conflicting.len()
    );

    let (to_delete, recreate) = match resolution {
        Resolution::Modify => {
            let program = conflicts
                .into_iter()
                .flat_map(|c| c.existing)
                .next()
                .ok_or_else(|| {
                    ValidationErrors::single("resolution", "There is no conflicting program to edit")
                })?;
            return Ok(ResolutionOutcome::EditRequested { program });
        }
        Resolution::ContinueAnyway => (Vec::new(), true),
        Resolution::Replace => (conflicting, true),
        Resolution::DeleteConflicting {
            program_ids,
            recreate,
        } => {
            let chosen = match program_ids {
                None => conflicting,
                Some(ids) => {
                    check_selection(&ids, &conflicting)?;
                    dedup(ids)
                }
            };
            (chosen, recreate)
        }
    };

    let mut report = ResolutionReport::default();
    if !to_delete.is_empty() {
        let tenant = &actor.tenant;
        report.deleted = run_batch("delete_program", to_delete, |id| async move {
            repo.delete_program(id, tenant).await.map(|_| id)
        })
        .await;
    }

    if recreate {
        if report.deleted.is_complete() {
            report.created = create_for_days(repo, &actor.tenant, candidate).await;
        } else {
            warn!(
                "Skipping creation of '{}': {} deletion(s) failed",
                candidate.name,
                report.deleted.failed.len()
            );
            report.creation_skipped = true;
        }
    }

    Ok(ResolutionOutcome::Applied { report })
}

/// Edit one program, re-checking its day against the rest of the grid.
///
/// Conflicts block the update unless `force` is set.
pub async fn update_program<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &ActorContext,
    id: ProgramId,
    candidate: &ProgramCandidate,
    force: bool,
) -> ServiceResult<ProgramUpdate> {
    require_director(actor, "manage programs")?;
    let range = candidate.validate()?;
    let day = candidate.single_day()?;

    let current = repo.get_program(id, &actor.tenant).await?;
    let existing = repo.list_programs(&actor.tenant).await?;
    let conflicts =
        detect_conflicts_excluding(&existing, &[day], range.start(), range.end(), Some(id));
    if !conflicts.is_empty() && !force {
        return Ok(ProgramUpdate::Conflicts { conflicts });
    }

    let mut program = candidate.for_day(&actor.tenant, day, Utc::now());
    program.id = Some(id);
    program.created_at = current.created_at;
    repo.update_program(&program, &actor.tenant).await?;
    info!("Updated program {} for tenant {}", id, actor.tenant);
    Ok(ProgramUpdate::Updated { program })
}

pub async fn delete_program<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &ActorContext,
    id: ProgramId,
) -> ServiceResult<()> {
    require_director(actor, "manage programs")?;
    repo.delete_program(id, &actor.tenant).await?;
    info!("Deleted program {} for tenant {}", id, actor.tenant);
    Ok(())
}

async fn create_for_days<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    candidate: &ProgramCandidate,
) -> CreationReport {
    let now = Utc::now();
    run_batch("create_program", candidate.unique_days(), |day| {
        let program = candidate.for_day(tenant, day, now);
        async move {
            let id = repo.create_program(&program, tenant).await?;
            Ok(Program {
                id: Some(id),
                ..program
            })
        }
    })
    .await
}

fn check_selection(ids: &[ProgramId], conflicting: &[ProgramId]) -> Result<(), ServiceError> {
    if ids.is_empty() {
        return Err(ValidationErrors::single("program_ids", "Select at least one program to delete").into());
    }
    let mut errors = ValidationErrors::new();
    for id in ids {
        if !conflicting.contains(id) {
            errors.push(
                "program_ids",
                format!("Program {} does not conflict with this slot", id),
            );
        }
    }
    errors.into_result().map_err(ServiceError::from)
}

fn dedup(ids: Vec<ProgramId>) -> Vec<ProgramId> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}
