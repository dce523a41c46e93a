//! Editorial workflow of a run-sheet.
//!
//! ```text
//!   draft ──submit──▶ pending ──validate──▶ validated
//!     ▲                  │
//!     │ save          reject(comment)
//!     │                  ▼
//!     └───────save──── rejected ──submit──▶ pending
//! ```
//!
//! Planning is pure: [`plan_transition`] checks authorization, then the
//! current state, then the content, and only returns a plan when all three
//! pass. Nothing is written until a plan exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{ServiceError, ServiceResult};
use crate::models::{
    ActorContext, Conducteur, ConducteurId, ConducteurStatus, Notification, NotificationType,
    UserId, ValidationErrors,
};

/// What the caller asks the workflow to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WorkflowAction {
    /// Author saves without submitting.
    SaveDraft,
    /// Author submits for review.
    Submit,
    /// Director approves a pending run-sheet.
    Validate,
    /// Director sends a pending run-sheet back with a comment.
    Reject { comment: String },
}

impl WorkflowAction {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowAction::SaveDraft => "save",
            WorkflowAction::Submit => "submit",
            WorkflowAction::Validate => "validate",
            WorkflowAction::Reject { .. } => "reject",
        }
    }

    fn is_author_action(&self) -> bool {
        matches!(self, WorkflowAction::SaveDraft | WorkflowAction::Submit)
    }
}

/// A notification to create once the transition is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedNotification {
    pub recipient: UserId,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
}

impl PlannedNotification {
    pub fn into_notification(self, conducteur_id: Option<ConducteurId>) -> Notification {
        Notification::new(
            self.recipient,
            self.kind,
            self.title,
            self.message,
            conducteur_id,
        )
    }
}

/// The checked effect of one workflow action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub from: ConducteurStatus,
    pub to: ConducteurStatus,
    /// Comment to store; `None` clears any previous one.
    pub rejection_comment: Option<String>,
    pub bump_version: bool,
    pub notification: Option<PlannedNotification>,
}

impl TransitionPlan {
    /// Apply the plan to an in-memory run-sheet.
    pub fn apply(&self, conducteur: &mut Conducteur, now: DateTime<Utc>) {
        conducteur.status = self.to;
        conducteur.rejection_comment = self.rejection_comment.clone();
        if self.bump_version {
            conducteur.version += 1;
        }
        conducteur.updated_at = now;
    }
}

/// Check an action against a run-sheet and describe its effect.
///
/// The run-sheet is taken as it would be saved: for author actions it already
/// carries the edited content.
pub fn plan_transition(
    actor: &ActorContext,
    conducteur: &Conducteur,
    action: &WorkflowAction,
) -> ServiceResult<TransitionPlan> {
    if actor.tenant != conducteur.tenant {
        return Err(ServiceError::not_found(describe(conducteur)));
    }
    authorize(actor, conducteur, action)?;

    let from = conducteur.status;
    let allowed = if action.is_author_action() {
        from.is_editable()
    } else {
        from == ConducteurStatus::Pending
    };
    if !allowed {
        return Err(ServiceError::InvalidTransition {
            from,
            action: action.name(),
        });
    }

    let plan = match action {
        WorkflowAction::SaveDraft => {
            conducteur.validate_for_save()?;
            TransitionPlan {
                from,
                to: ConducteurStatus::Draft,
                rejection_comment: None,
                bump_version: true,
                notification: None,
            }
        }
        WorkflowAction::Submit => {
            conducteur.validate_for_save()?;
            TransitionPlan {
                from,
                to: ConducteurStatus::Pending,
                rejection_comment: None,
                bump_version: true,
                notification: Some(PlannedNotification {
                    recipient: conducteur.tenant.director(),
                    kind: NotificationType::ConducteurSubmitted,
                    title: "Run-sheet awaiting validation".to_string(),
                    message: format!(
                        "{} submitted \"{}\"{} for validation",
                        conducteur.host_id,
                        conducteur.title.trim(),
                        broadcast_suffix(conducteur)
                    ),
                }),
            }
        }
        WorkflowAction::Validate => TransitionPlan {
            from,
            to: ConducteurStatus::Validated,
            rejection_comment: None,
            bump_version: false,
            notification: Some(PlannedNotification {
                recipient: conducteur.host_id.clone(),
                kind: NotificationType::ConducteurValidated,
                title: "Run-sheet validated".to_string(),
                message: format!("\"{}\" has been validated", conducteur.title.trim()),
            }),
        },
        WorkflowAction::Reject { comment } => {
            let comment = comment.trim();
            if comment.is_empty() {
                return Err(ValidationErrors::single("comment", "A rejection needs a comment").into());
            }
            TransitionPlan {
                from,
                to: ConducteurStatus::Rejected,
                rejection_comment: Some(comment.to_string()),
                bump_version: false,
                notification: Some(PlannedNotification {
                    recipient: conducteur.host_id.clone(),
                    kind: NotificationType::ConducteurRejected,
                    title: "Run-sheet rejected".to_string(),
                    message: format!(
                        "\"{}\" was rejected: {}",
                        conducteur.title.trim(),
                        comment
                    ),
                }),
            }
        }
    };

    log::debug!(
        "Planned {} on {}: {} -> {}",
        action.name(),
        describe(conducteur),
        plan.from,
        plan.to
    );
    Ok(plan)
}

fn authorize(
    actor: &ActorContext,
    conducteur: &Conducteur,
    action: &WorkflowAction,
) -> ServiceResult<()> {
    if action.is_author_action() {
        if actor.user_id != conducteur.host_id {
            return Err(ServiceError::forbidden(format!(
                "Only the author may {} this run-sheet",
                action.name()
            )));
        }
    } else if !actor.is_director() {
        return Err(ServiceError::forbidden(format!(
            "Only a director may {} a run-sheet",
            action.name()
        )));
    }
    Ok(())
}

fn describe(conducteur: &Conducteur) -> String {
    match conducteur.id {
        Some(id) => format!("Conducteur {}", id),
        None => "New conducteur".to_string(),
    }
}

fn broadcast_suffix(conducteur: &Conducteur) -> String {
    conducteur
        .broadcast_date
        .map(|date| format!(" (broadcast {})", date.format("%Y-%m-%d")))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConducteurElement, ElementField, ProgramId, TenantId};
    use chrono::NaiveDate;

    fn sheet(status: ConducteurStatus) -> Conducteur {
        let mut element = ConducteurElement::blank(1);
        element.apply(ElementField::Title("Ouverture".to_string()));
        Conducteur {
            id: Some(ConducteurId(7)),
            tenant: TenantId::new("dir-1"),
            host_id: UserId::new("host-1"),
            program_id: Some(ProgramId(3)),
            title: "Matinale du lundi".to_string(),
            broadcast_date: NaiveDate::from_ymd_opt(2026, 10, 19),
            start_time: None,
            end_time: None,
            status,
            rejection_comment: None,
            version: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            elements: vec![element],
        }
    }

    fn director() -> ActorContext {
        ActorContext::director("dir-1")
    }

    fn author() -> ActorContext {
        ActorContext::host("host-1", "dir-1")
    }

    #[test]
    fn test_submit_notifies_director_and_bumps_version() {
        let mut conducteur = sheet(ConducteurStatus::Draft);
        let plan = plan_transition(&author(), &conducteur, &WorkflowAction::Submit).unwrap();
        assert_eq!(plan.to, ConducteurStatus::Pending);
        let notification = plan.notification.clone().unwrap();
        assert_eq!(notification.recipient, UserId::new("dir-1"));
        assert_eq!(notification.kind, NotificationType::ConducteurSubmitted);

        plan.apply(&mut conducteur, Utc::now());
        assert_eq!(conducteur.version, 3);
        assert_eq!(conducteur.status, ConducteurStatus::Pending);
    }

    #[test]
    fn test_reject_requires_comment() {
        let conducteur = sheet(ConducteurStatus::Pending);
        let err = plan_transition(
            &director(),
            &conducteur,
            &WorkflowAction::Reject {
                comment: "   ".to_string(),
            },
        )
        .unwrap_err();
        match err {
            ServiceError::Validation(errors) => assert!(errors.has_field("comment")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_reject_carries_comment_to_host() {
        let mut conducteur = sheet(ConducteurStatus::Pending);
        let plan = plan_transition(
            &director(),
            &conducteur,
            &WorkflowAction::Reject {
                comment: " Trop long ".to_string(),
            },
        )
        .unwrap();
        let notification = plan.notification.clone().unwrap();
        assert_eq!(notification.recipient, UserId::new("host-1"));
        assert!(notification.message.contains("Trop long"));

        plan.apply(&mut conducteur, Utc::now());
        assert_eq!(conducteur.rejection_comment.as_deref(), Some("Trop long"));
        assert_eq!(conducteur.version, 2);
    }

    #[test]
    fn test_host_cannot_validate() {
        let conducteur = sheet(ConducteurStatus::Pending);
        let err =
            plan_transition(&author(), &conducteur, &WorkflowAction::Validate).unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[test]
    fn test_director_acts_only_on_pending() {
        for status in [
            ConducteurStatus::Draft,
            ConducteurStatus::Validated,
            ConducteurStatus::Rejected,
        ] {
            let err = plan_transition(&director(), &sheet(status), &WorkflowAction::Validate)
                .unwrap_err();
            assert!(matches!(
                err,
                ServiceError::InvalidTransition { from, action: "validate" } if from == status
            ));
        }
    }

    #[test]
    fn test_author_cannot_edit_pending_or_validated() {
        for status in [ConducteurStatus::Pending, ConducteurStatus::Validated] {
            let err = plan_transition(&author(), &sheet(status), &WorkflowAction::SaveDraft)
                .unwrap_err();
            assert!(matches!(err, ServiceError::InvalidTransition { .. }));
        }
    }

    #[test]
    fn test_resubmitting_rejected_clears_comment() {
        let mut conducteur = sheet(ConducteurStatus::Rejected);
        conducteur.rejection_comment = Some("Refaire l'intro".to_string());
        let plan = plan_transition(&author(), &conducteur, &WorkflowAction::Submit).unwrap();
        plan.apply(&mut conducteur, Utc::now());
        assert_eq!(conducteur.status, ConducteurStatus::Pending);
        assert!(conducteur.rejection_comment.is_none());
    }

    #[test]
    fn test_other_host_is_forbidden_before_state_check() {
        let conducteur = sheet(ConducteurStatus::Validated);
        let other = ActorContext::host("host-2", "dir-1");
        let err = plan_transition(&other, &conducteur, &WorkflowAction::SaveDraft).unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[test]
    fn test_other_tenant_sees_not_found() {
        let conducteur = sheet(ConducteurStatus::Pending);
        let err = plan_transition(
            &ActorContext::director("dir-2"),
            &conducteur,
            &WorkflowAction::Validate,
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn test_draft_save_validates_like_submit() {
        let mut conducteur = sheet(ConducteurStatus::Draft);
        conducteur.elements.clear();
        let err =
            plan_transition(&author(), &conducteur, &WorkflowAction::SaveDraft).unwrap_err();
        match err {
            ServiceError::Validation(errors) => assert!(errors.has_field("elements")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
