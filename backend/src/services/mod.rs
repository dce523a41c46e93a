//! Service layer for business logic and orchestration.
//!
//! Services sit between the outer surfaces (HTTP) and the repository traits.
//! Every operation takes the caller's [`ActorContext`] explicitly and checks
//! it before touching the store.
//!
//! - [`scheduling`]: conflict detection and resolution for the program grid
//! - [`workflow`]: the run-sheet state machine, as pure transition plans
//! - [`conducteurs`]: persisting run-sheets and their notifications
//! - [`notifications`]: the notification inbox
//! - [`batch`]: per-item results of concurrent store calls

pub mod batch;
pub mod conducteurs;
pub mod error;
pub mod notifications;
pub mod scheduling;
pub mod workflow;

pub use batch::{BatchFailure, BatchOutcome};
pub use conducteurs::ConducteurDraft;
pub use error::{ServiceError, ServiceResult};
pub use scheduling::{
    ProgramUpdate, Resolution, ResolutionOutcome, ResolutionReport, ScheduleAttempt,
};
pub use workflow::{plan_transition, TransitionPlan, WorkflowAction};

use crate::models::ActorContext;

pub(crate) fn require_director(actor: &ActorContext, what: &str) -> ServiceResult<()> {
    if actor.is_director() {
        Ok(())
    } else {
        Err(ServiceError::forbidden(format!("Only a director may {}", what)))
    }
}
