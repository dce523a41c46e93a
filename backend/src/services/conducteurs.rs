//! Persisting run-sheets through the workflow.
//!
//! Every write goes through [`plan_transition`] first, so validation and
//! authorization failures never reach the store. Segments are synchronised
//! as one concurrent batch before the header, so a run-sheet only leaves
//! the editable states once its segments are stored. The planned
//! notification comes last. Later failures do not undo earlier writes.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::batch::run_batch;
use super::error::{ServiceError, ServiceResult};
use super::workflow::{plan_transition, TransitionPlan, WorkflowAction};
use crate::db::{FullRepository, RepositoryError};
use crate::models::{
    ActorContext, Conducteur, ConducteurElement, ConducteurId, ConducteurStatus, ElementId,
    ProgramId, Role, RunSheet, TimeOfDay, ValidationErrors,
};

/// Editable content of a run-sheet, as sent by the author's form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConducteurDraft {
    #[serde(default)]
    pub program_id: Option<ProgramId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub broadcast_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<TimeOfDay>,
    #[serde(default)]
    pub end_time: Option<TimeOfDay>,
    #[serde(default)]
    pub elements: Vec<ConducteurElement>,
}

impl ConducteurDraft {
    fn apply_to(self, conducteur: &mut Conducteur) {
        conducteur.program_id = self.program_id;
        conducteur.title = self.title.trim().to_string();
        conducteur.broadcast_date = self.broadcast_date;
        conducteur.start_time = self.start_time;
        conducteur.end_time = self.end_time;
        conducteur.elements = RunSheet::from_elements(self.elements).into_elements();
    }
}

/// One segment write of a save.
#[derive(Debug, Clone)]
enum ElementWrite {
    Create(ConducteurElement),
    Update(ConducteurElement),
    Delete(ElementId),
}

fn save_action(submit: bool) -> WorkflowAction {
    if submit {
        WorkflowAction::Submit
    } else {
        WorkflowAction::SaveDraft
    }
}

/// Create a run-sheet authored by the calling host, as a draft or submitted.
pub async fn create_conducteur<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &ActorContext,
    draft: ConducteurDraft,
    submit: bool,
) -> ServiceResult<Conducteur> {
    if actor.role != Role::Host {
        return Err(ServiceError::forbidden("Only hosts author run-sheets"));
    }

    let now = Utc::now();
    let mut conducteur = Conducteur {
        id: None,
        tenant: actor.tenant.clone(),
        host_id: actor.user_id.clone(),
        program_id: None,
        title: String::new(),
        broadcast_date: None,
        start_time: None,
        end_time: None,
        status: ConducteurStatus::Draft,
        rejection_comment: None,
        version: 0,
        created_at: now,
        updated_at: now,
        elements: Vec::new(),
    };
    draft.apply_to(&mut conducteur);

    let action = save_action(submit);
    let plan = plan_transition(actor, &conducteur, &action)?;
    ensure_program(repo, &conducteur).await?;

    // Stored as an unsaved draft until its segments are in place.
    let id = repo.create_conducteur(&conducteur).await?;
    conducteur.id = Some(id);

    let writes = conducteur
        .elements
        .iter()
        .cloned()
        .map(ElementWrite::Create)
        .collect();
    sync_elements(repo, id, writes).await?;

    plan.apply(&mut conducteur, now);
    repo.update_conducteur(&conducteur).await?;
    info!(
        "Created conducteur {} ({}) by {}",
        id, conducteur.status, actor.user_id
    );
    notify(repo, plan, Some(id)).await?;

    with_stored_elements(repo, id, conducteur).await
}

/// Save the author's edits, as a draft or submitted for validation.
///
/// Last write wins: the stored version is not compared, only bumped.
pub async fn save_conducteur<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &ActorContext,
    id: ConducteurId,
    draft: ConducteurDraft,
    submit: bool,
) -> ServiceResult<Conducteur> {
    let mut conducteur = load(repo, actor, id).await?;
    let previous: HashSet<ElementId> = conducteur.elements.iter().filter_map(|e| e.id).collect();
    draft.apply_to(&mut conducteur);

    let action = save_action(submit);
    let plan = plan_transition(actor, &conducteur, &action)?;
    ensure_program(repo, &conducteur).await?;
    plan.apply(&mut conducteur, Utc::now());

    let writes = element_writes(&previous, &conducteur.elements);
    sync_elements(repo, id, writes).await?;

    repo.update_conducteur(&conducteur).await?;
    info!(
        "Saved conducteur {} as {} (version {})",
        id, conducteur.status, conducteur.version
    );
    notify(repo, plan, Some(id)).await?;

    with_stored_elements(repo, id, conducteur).await
}

/// Director decision on a pending run-sheet. Only the status is written.
async fn decide<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &ActorContext,
    id: ConducteurId,
    action: WorkflowAction,
) -> ServiceResult<Conducteur> {
    let mut conducteur = load(repo, actor, id).await?;
    let plan = plan_transition(actor, &conducteur, &action)?;

    repo.update_status(id, plan.to, plan.rejection_comment.clone())
        .await?;
    plan.apply(&mut conducteur, Utc::now());
    info!(
        "Conducteur {} moved {} -> {} by {}",
        id, plan.from, plan.to, actor.user_id
    );

    notify(repo, plan, Some(id)).await?;
    Ok(conducteur)
}

pub async fn validate_conducteur<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &ActorContext,
    id: ConducteurId,
) -> ServiceResult<Conducteur> {
    decide(repo, actor, id, WorkflowAction::Validate).await
}

pub async fn reject_conducteur<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &ActorContext,
    id: ConducteurId,
    comment: impl Into<String>,
) -> ServiceResult<Conducteur> {
    let action = WorkflowAction::Reject {
        comment: comment.into(),
    };
    decide(repo, actor, id, action).await
}

/// Directors delete anything in their tenant; authors only while editable.
pub async fn delete_conducteur<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &ActorContext,
    id: ConducteurId,
) -> ServiceResult<()> {
    let conducteur = load(repo, actor, id).await?;
    if !actor.is_director() && !conducteur.status.is_editable() {
        return Err(ServiceError::InvalidTransition {
            from: conducteur.status,
            action: "delete",
        });
    }
    repo.delete_conducteur(id).await?;
    info!("Deleted conducteur {} by {}", id, actor.user_id);
    Ok(())
}

/// A run-sheet with its segments, visible to the tenant's director and its author.
pub async fn get_conducteur<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &ActorContext,
    id: ConducteurId,
) -> ServiceResult<Conducteur> {
    load(repo, actor, id).await
}

/// Directors see the whole tenant, hosts their own run-sheets. Newest first.
pub async fn list_conducteurs<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &ActorContext,
    status: Option<ConducteurStatus>,
) -> ServiceResult<Vec<Conducteur>> {
    let conducteurs = match (actor.role, status) {
        (Role::Director, Some(status)) => repo.list_by_status(&actor.tenant, status).await?,
        (Role::Director, None) => repo.list_conducteurs(&actor.tenant).await?,
        (Role::Host, _) => repo
            .list_by_host(&actor.user_id)
            .await?
            .into_iter()
            .filter(|c| c.tenant == actor.tenant)
            .filter(|c| status.map_or(true, |s| c.status == s))
            .collect(),
    };
    Ok(conducteurs)
}

async fn load<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &ActorContext,
    id: ConducteurId,
) -> ServiceResult<Conducteur> {
    let conducteur = repo.get_with_elements(id).await?;
    if conducteur.tenant != actor.tenant {
        return Err(ServiceError::not_found(format!("Conducteur {}", id)));
    }
    if !actor.is_director() && conducteur.host_id != actor.user_id {
        return Err(ServiceError::forbidden(
            "Run-sheets are visible to their author and the director",
        ));
    }
    Ok(conducteur)
}

/// The linked program must exist in the author's tenant.
async fn ensure_program<R: FullRepository + ?Sized>(
    repo: &R,
    conducteur: &Conducteur,
) -> ServiceResult<()> {
    let Some(program_id) = conducteur.program_id else {
        return Ok(());
    };
    match repo.get_program(program_id, &conducteur.tenant).await {
        Ok(_) => Ok(()),
        Err(e) if e.is_not_found() => Err(ValidationErrors::single(
            "program_id",
            format!("Program {} does not exist", program_id),
        )
        .into()),
        Err(e) => Err(e.into()),
    }
}

/// Writes that turn the `previous` segment ids into `elements`.
///
/// An id is updated at most once. Repeats and ids foreign to the sheet are
/// created afresh.
fn element_writes(
    previous: &HashSet<ElementId>,
    elements: &[ConducteurElement],
) -> Vec<ElementWrite> {
    let mut claimed = HashSet::new();
    let mut writes = Vec::with_capacity(elements.len());
    for element in elements {
        match element.id {
            Some(element_id) if previous.contains(&element_id) && claimed.insert(element_id) => {
                writes.push(ElementWrite::Update(element.clone()))
            }
            _ => {
                let mut fresh = element.clone();
                fresh.id = None;
                writes.push(ElementWrite::Create(fresh));
            }
        }
    }
    writes.extend(
        previous
            .difference(&claimed)
            .copied()
            .map(ElementWrite::Delete),
    );
    writes
}

/// Replace the in-memory segments with what the store holds.
async fn with_stored_elements<R: FullRepository + ?Sized>(
    repo: &R,
    id: ConducteurId,
    mut conducteur: Conducteur,
) -> ServiceResult<Conducteur> {
    conducteur.elements = repo.list_elements(id).await?;
    Ok(conducteur)
}

async fn sync_elements<R: FullRepository + ?Sized>(
    repo: &R,
    conducteur_id: ConducteurId,
    writes: Vec<ElementWrite>,
) -> ServiceResult<()> {
    if writes.is_empty() {
        return Ok(());
    }
    let outcome = run_batch("sync_elements", writes, |write| async move {
        match write {
            ElementWrite::Create(element) => repo
                .create_element(conducteur_id, &element)
                .await
                .map(|_| ()),
            ElementWrite::Update(element) => repo.update_element(&element).await,
            ElementWrite::Delete(id) => repo.delete_element(id).await,
        }
    })
    .await;

    match outcome.failed.first() {
        None => Ok(()),
        Some(first) => {
            warn!(
                "{} of {} segment writes failed for conducteur {}",
                outcome.failed.len(),
                outcome.failed.len() + outcome.succeeded.len(),
                conducteur_id
            );
            Err(ServiceError::Repository(first.source.clone()))
        }
    }
}

async fn notify<R: FullRepository + ?Sized>(
    repo: &R,
    plan: TransitionPlan,
    conducteur_id: Option<ConducteurId>,
) -> ServiceResult<()> {
    let Some(planned) = plan.notification else {
        return Ok(());
    };
    let notification = planned.into_notification(conducteur_id);
    repo.create_notification(&notification)
        .await
        .map_err(|e: RepositoryError| {
            warn!(
                "Status of conducteur {:?} stored but notification failed: {}",
                conducteur_id, e
            );
            ServiceError::Repository(e)
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::models::{ElementField, ProgramCandidate, ProgramCategory, DayOfWeek};

    fn seeded() -> (LocalRepository, ProgramId) {
        let repo = LocalRepository::new();
        let candidate = ProgramCandidate {
            name: "Matinale".to_string(),
            hosts: vec![],
            days: vec![DayOfWeek::Monday],
            start_time: "06:00".parse().unwrap(),
            end_time: "09:00".parse().unwrap(),
            category: ProgramCategory::News,
            description: String::new(),
        };
        let program = candidate.for_day(&"dir-1".into(), DayOfWeek::Monday, Utc::now());
        let id = repo.seed_programs(vec![program])[0];
        (repo, id)
    }

    fn draft(program_id: ProgramId, titles: &[&str]) -> ConducteurDraft {
        let mut sheet = RunSheet::new();
        for title in titles {
            let index = sheet.add_element();
            sheet
                .update_element(index, ElementField::Title(title.to_string()))
                .unwrap();
            sheet
                .update_element(index, ElementField::DurationMinutes(Some(5)))
                .unwrap();
        }
        ConducteurDraft {
            program_id: Some(program_id),
            title: "Matinale du 19".to_string(),
            broadcast_date: NaiveDate::from_ymd_opt(2026, 10, 19),
            start_time: None,
            end_time: None,
            elements: sheet.into_elements(),
        }
    }

    #[tokio::test]
    async fn test_save_syncs_segments_by_id() {
        let (repo, program) = seeded();
        let host = ActorContext::host("host-1", "dir-1");
        let created = create_conducteur(&repo, &host, draft(program, &["A", "B", "C"]), false)
            .await
            .unwrap();
        assert_eq!(created.version, 1);
        assert_eq!(created.elements.len(), 3);

        // Drop B, move C first, append D.
        let mut elements = created.elements.clone();
        elements.remove(1);
        elements.swap(0, 1);
        elements[0].order = 1;
        elements[1].order = 2;
        let mut d = ConducteurElement::blank(3);
        d.title = "D".to_string();
        elements.push(d);

        let mut edit = draft(program, &[]);
        edit.elements = elements;
        let saved = save_conducteur(&repo, &host, created.id.unwrap(), edit, false)
            .await
            .unwrap();

        let titles: Vec<&str> = saved.elements.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "D"]);
        let orders: Vec<u32> = saved.elements.iter().map(|e| e.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(saved.elements[0].id, created.elements[2].id);
        assert_eq!(saved.version, 2);
    }

    #[test]
    fn test_element_writes_claim_each_id_once() {
        let previous: HashSet<ElementId> = [ElementId(1), ElementId(2)].into_iter().collect();
        let mut kept = ConducteurElement::blank(1);
        kept.id = Some(ElementId(1));
        let mut repeat = ConducteurElement::blank(2);
        repeat.id = Some(ElementId(1));
        let mut foreign = ConducteurElement::blank(3);
        foreign.id = Some(ElementId(7));

        let writes = element_writes(&previous, &[kept, repeat, foreign]);
        assert_eq!(writes.len(), 4);
        assert!(matches!(&writes[0], ElementWrite::Update(e) if e.id == Some(ElementId(1))));
        assert!(matches!(&writes[1], ElementWrite::Create(e) if e.id.is_none() && e.order == 2));
        assert!(matches!(&writes[2], ElementWrite::Create(e) if e.id.is_none() && e.order == 3));
        assert!(matches!(writes[3], ElementWrite::Delete(ElementId(2))));
    }

    #[tokio::test]
    async fn test_unknown_program_is_validation_error() {
        let (repo, _) = seeded();
        let host = ActorContext::host("host-1", "dir-1");
        let err = create_conducteur(&repo, &host, draft(ProgramId(99), &["A"]), true)
            .await
            .unwrap_err();
        match err {
            ServiceError::Validation(errors) => assert!(errors.has_field("program_id")),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(repo.notification_count(), 0);
    }

    #[tokio::test]
    async fn test_director_cannot_author() {
        let (repo, program) = seeded();
        let err = create_conducteur(
            &repo,
            &ActorContext::director("dir-1"),
            draft(program, &["A"]),
            false,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_host_lists_only_own() {
        let (repo, program) = seeded();
        let alice = ActorContext::host("alice", "dir-1");
        let bob = ActorContext::host("bob", "dir-1");
        create_conducteur(&repo, &alice, draft(program, &["A"]), false)
            .await
            .unwrap();
        create_conducteur(&repo, &bob, draft(program, &["B"]), true)
            .await
            .unwrap();

        assert_eq!(list_conducteurs(&repo, &alice, None).await.unwrap().len(), 1);
        let director = ActorContext::director("dir-1");
        assert_eq!(list_conducteurs(&repo, &director, None).await.unwrap().len(), 2);
        let pending = list_conducteurs(&repo, &director, Some(ConducteurStatus::Pending))
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].host_id, bob.user_id);
    }

    #[tokio::test]
    async fn test_author_cannot_delete_pending() {
        let (repo, program) = seeded();
        let host = ActorContext::host("host-1", "dir-1");
        let created = create_conducteur(&repo, &host, draft(program, &["A"]), true)
            .await
            .unwrap();
        let id = created.id.unwrap();

        let err = delete_conducteur(&repo, &host, id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { action: "delete", .. }));
        delete_conducteur(&repo, &ActorContext::director("dir-1"), id)
            .await
            .unwrap();
    }
}
